use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// No authenticated session.
    Unauthorized,
    /// Session present, but role/ownership checks failed.
    Forbidden(String),
    NotFound,
    /// Requested edge does not exist from the entity's current status.
    InvalidTransition(String),
    /// A companion field required by the requested transition is absent.
    MissingRequiredField(String),
    /// Malformed or out-of-range input.
    Validation(String),
    /// Duplicate slug, stale version, or similar collision.
    Conflict(String),
    Db(sqlx::Error),
    Hash(String),
}

impl AppError {
    /// A stored value failed to parse into its closed enum. Treated as a
    /// storage-layer fault (500), not a client error.
    pub fn decode(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        AppError::Db(sqlx::Error::Decode(msg.into()))
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Db(_) | AppError::Hash(_) => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthorized => write!(f, "Not authenticated"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::InvalidTransition(msg) => write!(f, "Invalid transition: {msg}"),
            AppError::MissingRequiredField(msg) => write!(f, "Missing required field: {msg}"),
            AppError::Validation(msg) => write!(f, "Invalid input: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
        }
    }
}

fn error_body(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message, "code": code })
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized => {
                HttpResponse::Unauthorized().json(error_body(self.code(), "Not authenticated"))
            }
            AppError::Forbidden(msg) => {
                HttpResponse::Forbidden().json(error_body(self.code(), msg))
            }
            AppError::NotFound => {
                HttpResponse::NotFound().json(error_body(self.code(), "Not found"))
            }
            AppError::InvalidTransition(msg) | AppError::Conflict(msg) => {
                HttpResponse::Conflict().json(error_body(self.code(), msg))
            }
            AppError::MissingRequiredField(msg) | AppError::Validation(msg) => {
                HttpResponse::UnprocessableEntity().json(error_body(self.code(), msg))
            }
            // Storage and hashing failures are logged and masked; no
            // internal detail reaches the client.
            AppError::Db(_) | AppError::Hash(_) => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(error_body(self.code(), "Something went wrong"))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}
