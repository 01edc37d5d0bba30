use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::error;

use crate::domain::services::date_filter::DateFilterError;
use crate::domain::services::password_policy::PasswordPolicyError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    PasswordPolicy(#[from] PasswordPolicyError),
    #[error("The {field} ({value}) provided is invalid.")]
    InvalidReference { field: &'static str, value: String },
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

/// Rejections produced while turning query parameters into an event query.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Unsupported filter parameter: {0}")]
    UnknownKey(String),
    #[error("Invalid value for {key}: {value}")]
    InvalidInteger { key: String, value: String },
    #[error("Invalid value for {key}: {source}")]
    InvalidDate {
        key: String,
        #[source]
        source: DateFilterError,
    },
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("At least one filter parameter is required")]
    Empty,
}

impl AppError {
    pub fn invalid_reference(field: &'static str, value: impl ToString) -> Self {
        AppError::InvalidReference { field, value: value.to_string() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    match db_err.kind() {
                        ErrorKind::UniqueViolation => {
                            return conflict("Resource already exists (duplicate entry)".to_string());
                        }
                        ErrorKind::ForeignKeyViolation => {
                            return conflict("A referenced resource does not exist".to_string());
                        }
                        _ => {}
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::InvalidReference { .. } => (StatusCode::CONFLICT, self.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Filter(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::PasswordPolicy(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

fn conflict(message: String) -> Response {
    (StatusCode::CONFLICT, Json(json!({ "error": message }))).into_response()
}
