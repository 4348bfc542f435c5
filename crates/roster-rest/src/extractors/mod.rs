//! Request extractors shared by the controllers.

mod pagination;
mod validated;

pub use pagination::PaginationQuery;
pub use validated::{ValidatedJson, ValidatedJsonRejection};
