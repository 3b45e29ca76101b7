//! Persistence capabilities used by the services.
//!
//! `TaskStore` and `UserStore` are the only way the services touch durable state.
//! Every task operation takes the owner's id alongside the task id so that rows owned
//! by someone else never match. Two implementations exist: [`postgres`] for the
//! running server and [`memory`] for tests and local experiments.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Task, User};

pub use memory::{InMemoryTaskStore, InMemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

/// Raw failures reported by a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row matched the lookup.
    #[error("record not found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[error("conflicting record: {0}")]
    Conflict(String),
    /// Any other failure from the database driver.
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.message().to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Owner-scoped task persistence.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, task: &Task) -> Result<(), StoreError>;

    /// Fetches a task only if it belongs to `user_id`.
    async fn get_by_id(&self, task_id: Uuid, user_id: Uuid) -> Result<Task, StoreError>;

    /// Fetches the newest of the owner's tasks whose title matches exactly.
    async fn get_by_title(&self, title: &str, user_id: Uuid) -> Result<Task, StoreError>;

    /// Overwrites the mutable fields of an owned task. Returns the number of rows
    /// affected, zero when the task does not exist for that owner.
    async fn update(&self, task_id: Uuid, user_id: Uuid, task: &Task) -> Result<u64, StoreError>;

    /// All tasks of the owner, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError>;

    /// Returns the number of rows deleted.
    async fn delete(&self, task_id: Uuid, user_id: Uuid) -> Result<u64, StoreError>;
}

/// User account persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. A taken email yields `StoreError::Conflict`.
    async fn create(&self, user: &User) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<User, StoreError>;

    async fn get_by_email(&self, email: &str) -> Result<User, StoreError>;
}
