//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! the failures that can occur, from database issues to ownership violations.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it
//! directly. Every error body has the shape `{"isSuccess": false, "message": ...}`.
//! Store and hashing failures are logged in full but reach the client only as a
//! generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::AuthError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// A request that needs an authenticated user arrived without one (HTTP 401).
    Unauthorized(String),
    /// Failure inside the session lifecycle. The response is deliberately vague.
    Auth(AuthError),
    /// Authenticated, but the resource belongs to someone else (HTTP 403).
    AccessDenied(String),
    /// Malformed request, e.g. an undecodable JSON body (HTTP 400).
    BadRequest(String),
    /// Input failed validation (HTTP 400).
    ValidationError(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// The resource already exists, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Error raised by the database driver (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::AccessDenied(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Auth(err) => err.public_message().to_string(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Auth(err) => write!(f, "Authentication failed: {}", err),
            AppError::AccessDenied(msg) => write!(f, "Access Denied: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Auth(err) => err.status_code(),
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self)
            }
            AppError::Auth(err) => log::warn!("rejected request: {}", err),
            _ => log::debug!("{}", self),
        }

        HttpResponse::build(self.status_code()).json(json!({
            "isSuccess": false,
            "message": self.public_message(),
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`; unique violations become `Conflict`;
/// everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Record already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// A blocking task that panicked or was cancelled.
impl From<actix_web::error::BlockingError> for AppError {
    fn from(error: actix_web::error::BlockingError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        AppError::Auth(error)
    }
}
