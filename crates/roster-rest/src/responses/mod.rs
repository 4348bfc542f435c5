//! Response envelope and error rendering.
//!
//! Every body, success or failure, is wrapped as
//! `{"success": bool, "data": ..., "error": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::{ErrorResponse, RosterError};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(error: ErrorResponse) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Wraps `error` in the envelope and attaches `status`.
pub fn error_response(status: StatusCode, error: ErrorResponse) -> Response {
    (status, Json(ApiResponse::failure(error))).into_response()
}

/// Handler-side error; the status comes from [`RosterError::status_code`].
#[derive(Debug)]
pub struct AppError(pub RosterError);

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Self(err) = self;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", err);
        }
        error_response(status, ErrorResponse::from_error(&err))
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: RosterError) -> StatusCode {
        AppError(err).into_response().status()
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(status_of(RosterError::not_found("User", 7)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(RosterError::conflict("duplicate username")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RosterError::store_unavailable("down")),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_failure_envelope_omits_data() {
        let body = serde_json::to_value(ApiResponse::failure(ErrorResponse::from_error(
            &RosterError::validation("email: invalid"),
        )))
        .unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body.get("data").is_none());
    }
}
