//! Distributed poll repository.

use std::sync::Arc;

use crate::entities::{distributed_poll, DistributedPoll};
use pollcast_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter,
};

/// Distributed poll repository for database operations.
#[derive(Clone)]
pub struct DistributedPollRepository {
    db: Arc<DatabaseConnection>,
}

impl DistributedPollRepository {
    /// Create a new distributed poll repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a survey by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<distributed_poll::Model>> {
        DistributedPoll::find()
            .filter(distributed_poll::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a survey by name, returning an error if not found.
    pub async fn get_by_name(&self, name: &str) -> AppResult<distributed_poll::Model> {
        self.find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Distributed poll not found: {name}")))
    }

    /// Check whether a survey name is taken.
    pub async fn name_exists(&self, name: &str) -> AppResult<bool> {
        let count = DistributedPoll::find()
            .filter(distributed_poll::Column::Name.eq(name))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a new survey.
    pub async fn create(
        &self,
        model: distributed_poll::ActiveModel,
    ) -> AppResult<distributed_poll::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a survey; blocks, questions, and responses cascade.
    pub async fn delete(&self, model: distributed_poll::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
