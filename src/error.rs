use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Errors surfaced to API clients as `{"key", "message"}` JSON bodies.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid or already used reset token")]
    InvalidResetToken,

    #[error("Reset token has expired")]
    ExpiredResetToken,

    #[error("Email delivery failed: {0}")]
    Mail(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidResetToken | AppError::ExpiredResetToken => StatusCode::BAD_REQUEST,
            AppError::Mail(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error_key",
            AppError::Unauthorized(_) => "unauthorized_error_key",
            AppError::InvalidCredentials => "invalid_credentials_error_key",
            AppError::Forbidden(_) => "forbidden_permissions_error_key",
            AppError::NotFound(_) => "not_found_error_key",
            AppError::Conflict(_) => "conflict_error_key",
            AppError::InvalidResetToken => "invalid_token_error_key",
            AppError::ExpiredResetToken => "expired_token_error_key",
            AppError::Mail(_) => "email_delivery_error_key",
            AppError::Database(_) => "database_error_key",
            AppError::Internal(_) => "internal_server_error_key",
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                let msg = match db.constraint() {
                    Some("users_email_key") => "Email already registered",
                    Some("users_username_key") => "Username already taken",
                    _ => "Resource already exists",
                };
                return AppError::Conflict(msg.into());
            }
        }
        AppError::Database(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                error!(error = %e, "database error");
                "A database error occurred.".to_string()
            }
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "Internal Server Error".to_string()
            }
            AppError::Mail(e) => {
                error!(error = %e, "mail delivery failed");
                self.to_string()
            }
            other => {
                warn!(key = other.key(), status = %status, "request rejected: {other}");
                other.to_string()
            }
        };

        let body = Json(json!({
            "key": self.key(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
