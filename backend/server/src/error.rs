use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Message store unavailable: {0}")]
    Store(String),

    #[error("Backups unavailable: {0}")]
    Backups(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{self}");

        match self {
            // feed consumers always get a list, even on failure
            AppError::Store { .. } | AppError::Backups { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::<()>::new())).into_response()
            }
            AppError::Config { .. } | AppError::Io { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
