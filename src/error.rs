use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Invalid request: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    InvalidSelector(String),

    #[error("{0}")]
    UpstreamFetch(String),

    #[error("{0}")]
    UpstreamGeneration(String),

    #[error("{0}")]
    StorageWrite(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput(_) | AppError::InvalidBody(_) | AppError::InvalidSelector(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UpstreamFetch(_)
            | AppError::UpstreamGeneration(_)
            | AppError::StorageWrite(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        response::error(status, self.to_string()).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageWrite(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
