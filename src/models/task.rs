use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Input structure for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// The title of the task.
    /// Must be between 1 and 255 characters.
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// An optional description for the task.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the task starts out completed. Defaults to `false`.
    #[serde(default)]
    pub is_done: bool,
}

/// Partial update of a task. Every field is independently optional; absent fields are
/// left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title, validated like on creation when present.
    #[validate(length(min = 1, max = 255))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// `None` leaves the description alone, `Some(None)` (JSON `null`) clears it.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,

    /// New completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
}

/// Marks a field as present even when its value is `null`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// Owner of the task. Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` owned by `user_id` with a fresh id and both timestamps set
    /// to now.
    pub fn new(input: CreateTaskRequest, user_id: Uuid) -> Self {
        let now = now_micros();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            description: input.description,
            is_done: input.is_done,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges the fields present in `update` and stamps `updated_at`.
    pub fn apply(&mut self, update: UpdateTaskRequest) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(is_done) = update.is_done {
            self.is_done = is_done;
        }
        self.updated_at = now_micros();
    }
}

/// Current time at the microsecond precision PostgreSQL stores, so a returned task
/// equals the one read back later.
fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
