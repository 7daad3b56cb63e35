use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::despacho::form::FormError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Service closed outside operating hours")]
    ServiceClosed,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::UltimoItem => AppError::Conflict(e.to_string()),
            FormError::ItemInexistente(_) | FormError::SemItens => {
                AppError::BadRequest(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::ServiceClosed => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(erros) => {
                // Structured per-field map so the client can mark inputs inline.
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "error": "validation failed", "campos": erros })),
                )
                    .into_response();
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
