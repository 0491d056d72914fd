//! JSON error body and HTTP status mapping for service errors.
//!
//! Extractor rejections share the same body so clients parse one shape.

use adcopy_rs_core::{GenerationError, error_code};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Error body returned by every route: `{ok:false, code, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub ok: bool,
    pub code: &'static str,
    pub error: String,
    /// Generated copy that could not be recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, error: impl Into<String>) -> Self {
        Self {
            status,
            ok: false,
            code,
            error: error.into(),
            text: None,
        }
    }

    pub fn invalid_argument(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_code::INVALID_ARGUMENT, error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        let status = match &err {
            GenerationError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            GenerationError::Unconfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            GenerationError::GatewayUnconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GenerationError::GenerationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GenerationError::GenerationTimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
            GenerationError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GenerationError::PersistenceFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let mut api = Self::new(status, err.code(), err.to_string());
        api.text = err.generated_text().map(str::to_string);
        api
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        Self::new(status, error_code::INVALID_ARGUMENT, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(
            rejection.status(),
            error_code::INVALID_ARGUMENT,
            rejection.body_text(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn maps_each_generation_error_to_a_status() {
        let cases = [
            (GenerationError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (GenerationError::Unconfigured("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (
                GenerationError::GatewayUnconfigured("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (GenerationError::GenerationFailed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                GenerationError::GenerationTimedOut(Duration::from_secs(1)),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (GenerationError::StorageUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, status) in cases {
            let code = err.code();
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
            assert_eq!(api.text, None);
        }
    }

    #[test]
    fn persistence_failure_carries_text() {
        let api = ApiError::from(GenerationError::PersistenceFailed {
            text: "Buy now".to_string(),
            detail: "disk full".to_string(),
        });
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::to_value(&api).expect("json");
        assert_eq!(
            body,
            serde_json::json!({
                "ok": false,
                "code": "PERSISTENCE_FAILED",
                "error": api.error,
                "text": "Buy now",
            })
        );
    }
}
