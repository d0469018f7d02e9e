use axum::http::header::WWW_AUTHENTICATE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub const REALM: &str = r#"Basic realm="API Gateway""#;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("missing Authorization header")]
    AuthMissing,
    #[error("malformed Basic credentials")]
    AuthMalformed,
    #[error("credentials do not match")]
    AuthInvalid,
    #[error("backend unreachable: {0}")]
    UpstreamUnreachable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            // the caller never learns which auth check failed
            GatewayError::AuthMissing | GatewayError::AuthMalformed | GatewayError::AuthInvalid => (
                StatusCode::UNAUTHORIZED,
                [(WWW_AUTHENTICATE, REALM)],
                Json(ErrorBody {
                    error: "Unauthorized",
                    details: None,
                }),
            )
                .into_response(),
            GatewayError::UpstreamUnreachable(details) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    error: "Failed to connect to backend API",
                    details: Some(details.as_str()),
                }),
            )
                .into_response(),
        }
    }
}
