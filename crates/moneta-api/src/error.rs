//! Error types for moneta-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use moneta_core::{CoreError, ErrorCode};
use thiserror::Error;

/// Errors surfaced to HTTP clients
///
/// The response body is plain text so the page scripts can show it to the
/// user verbatim.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Forbidden { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => match e.code() {
                ErrorCode::CategoryNotFound => StatusCode::NOT_FOUND,
                ErrorCode::CategoryNotOwned => StatusCode::FORBIDDEN,
                ErrorCode::CategoryInUse
                | ErrorCode::CategoryHasChildren
                | ErrorCode::DuplicateCategory => StatusCode::CONFLICT,
                ErrorCode::InvalidParent | ErrorCode::ValidationError => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Core(e) = &self {
            e.log("http");
        }
        (status, self.to_string()).into_response()
    }
}

// ==================== Tests ====================
