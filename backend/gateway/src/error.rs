//! Handler errors and their HTTP mapping.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use smilecheck_core::SmileError;
use tracing::error;

pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno ao processar a solicitação.";

#[derive(Debug)]
pub enum ApiError {
    /// The multipart body could not be read (malformed or over the size limit).
    Multipart(MultipartError),
    Internal(SmileError),
}

impl From<SmileError> for ApiError {
    fn from(err: SmileError) -> Self {
        Self::Internal(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Multipart(err) => {
                tracing::warn!(error = %err, "Rejected multipart body");
                err.into_response()
            }
            Self::Internal(err) => {
                error!(error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}
