//! HTTP middleware.

mod logging;
mod request_counter;
mod request_id;

pub use logging::*;
pub use request_counter::*;
pub use request_id::*;
