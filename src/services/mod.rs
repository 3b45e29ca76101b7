//! Business rules on top of the stores.
//!
//! Services receive identifiers as text, exactly as they arrive from the outside, and
//! parse them here so that a malformed id is always `AppError::InvalidInput` and never
//! reaches storage. Store failures are logged with the operation and identifiers and
//! surfaced as `AppError::Storage`.

pub mod auth;
pub mod tasks;

use log::error;
use std::fmt::Display;
use uuid::Uuid;

use crate::error::AppError;
use crate::storage::StoreError;

pub use auth::AuthService;
pub use tasks::TaskService;

/// Parses a textual identifier, naming the offending field on failure.
pub(crate) fn parse_id(raw: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|e| AppError::InvalidInput(format!("{} '{}': {}", field, raw, e)))
}

/// Logs an unexpected store failure and converts it for the caller.
pub(crate) fn storage_failure(
    operation: &str,
    context: impl Display,
    err: StoreError,
) -> AppError {
    error!("{} failed ({}): {}", operation, context, err);
    AppError::Storage(format!("{}: {}", operation, err))
}
