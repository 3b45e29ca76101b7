//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the error type returned by the services and handlers.
//! Its variants form the application's failure taxonomy: bad input, authentication
//! failures, ownership misses, and storage failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` so that handlers can return
//! it directly; each variant maps to one HTTP status and a `{"error": ...}` JSON body.
//! Storage and internal failures are reported to the client with a generic message,
//! the detail is only written to the log.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all failures a request can end in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Request content failed validation (HTTP 400).
    Validation(String),
    /// The request body could not be decoded (HTTP 400).
    BadRequest(String),
    /// An identifier could not be parsed as a UUID.
    /// Surfaces as HTTP 404: a malformed id cannot name any task.
    InvalidInput(String),
    /// Unknown email or wrong password (HTTP 401). Deliberately carries no detail.
    InvalidCredentials,
    /// Registration with an email that already belongs to a user (HTTP 409).
    EmailInUse,
    /// Token signature, algorithm, or claims are invalid (HTTP 401).
    InvalidToken,
    /// Token signature is valid but it is past its expiry (HTTP 401).
    ExpiredToken,
    /// Missing or malformed authentication context (HTTP 401).
    Unauthorized(String),
    /// The resource does not exist for the caller (HTTP 404).
    NotFound(String),
    /// Unexpected persistence failure (HTTP 500).
    Storage(String),
    /// Unexpected failure outside storage, e.g. hashing or signing (HTTP 500).
    Internal(String),
}

const GENERIC_SERVER_ERROR: &str = "Internal server error";
const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::EmailInUse => write!(f, "Email already in use"),
            AppError::InvalidToken => write!(f, "Invalid token"),
            AppError::ExpiredToken => write!(f, "Token has expired"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl AppError {
    /// The message shown to the client. Server-side detail is withheld.
    fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidInput(_) => "Task not found".to_string(),
            AppError::InvalidCredentials | AppError::EmailInUse => self.to_string(),
            AppError::InvalidToken | AppError::ExpiredToken => INVALID_TOKEN_MESSAGE.to_string(),
            AppError::Storage(_) | AppError::Internal(_) => GENERIC_SERVER_ERROR.to_string(),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::ExpiredToken
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::EmailInUse => StatusCode::CONFLICT,
            AppError::InvalidInput(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.client_message()
        }))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
