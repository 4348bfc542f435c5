//! JSON body extractor that runs `validator` rules before the handler.
//!
//! A body that does not parse is answered with 400 `INVALID_JSON`; one that
//! parses but breaks a rule with 400 `VALIDATION_ERROR`, listing each field.

use crate::responses::error_response;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{field_errors, ErrorResponse};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// A deserialized body that has passed its `Validate` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// Why a body was refused.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    Malformed(JsonRejection),
    Invalid(ValidationErrors),
}

impl ValidatedJsonRejection {
    fn body(&self) -> ErrorResponse {
        match self {
            Self::Malformed(rejection) => ErrorResponse {
                code: "INVALID_JSON".to_string(),
                message: format!("Invalid JSON: {}", rejection.body_text()),
                details: None,
                request_id: None,
            },
            Self::Invalid(errors) => ErrorResponse {
                code: "VALIDATION_ERROR".to_string(),
                message: "Request validation failed".to_string(),
                details: Some(field_errors(errors)),
                request_id: None,
            },
        }
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        error_response(StatusCode::BAD_REQUEST, self.body())
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;
        body.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(Self(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_invalid_body_lists_each_field() {
        let errors = Probe {
            name: "ab".to_string(),
            email: "nope".to_string(),
        }
        .validate()
        .unwrap_err();

        let body = ValidatedJsonRejection::Invalid(errors).body();
        let details = body.details.unwrap();

        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].field, "email");
        assert_eq!(details[1].field, "name");
        assert_eq!(details[1].message, "too short");
    }
}
