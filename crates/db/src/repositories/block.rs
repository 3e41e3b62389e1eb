//! Block repository.

use std::sync::Arc;

use crate::entities::{block, Block};
use pollcast_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Block repository for database operations.
#[derive(Clone)]
pub struct BlockRepository {
    db: Arc<DatabaseConnection>,
}

impl BlockRepository {
    /// Create a new block repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List a survey's blocks in file order.
    pub async fn find_by_poll(&self, distributed_poll_id: &str) -> AppResult<Vec<block::Model>> {
        Block::find()
            .filter(block::Column::DistributedPollId.eq(distributed_poll_id))
            .order_by_asc(block::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new block.
    pub async fn create(&self, model: block::ActiveModel) -> AppResult<block::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
