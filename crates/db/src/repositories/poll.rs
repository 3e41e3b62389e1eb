//! Poll repository.

use std::sync::Arc;

use crate::entities::{poll, Poll};
use pollcast_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Poll repository for database operations.
#[derive(Clone)]
pub struct PollRepository {
    db: Arc<DatabaseConnection>,
}

impl PollRepository {
    /// Create a new poll repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a poll by message timestamp.
    pub async fn find_by_timestamp(&self, timestamp: &str) -> AppResult<Option<poll::Model>> {
        Poll::find_by_id(timestamp)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a poll by message timestamp, returning an error if not found.
    pub async fn get_by_timestamp(&self, timestamp: &str) -> AppResult<poll::Model> {
        self.find_by_timestamp(timestamp)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Poll not found: {timestamp}")))
    }

    /// Create a new poll.
    pub async fn create(&self, model: poll::ActiveModel) -> AppResult<poll::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a poll.
    pub async fn update(&self, model: poll::ActiveModel) -> AppResult<poll::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
