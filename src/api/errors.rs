use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Converts AppError into plain-text HTTP responses.
///
/// Client errors echo their reason. Server errors only expose a fixed message;
/// the underlying detail goes to the log.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Operation { message, source } => {
                tracing::error!(error = %source, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            other => {
                tracing::error!(error = %other, "unhandled request failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}
