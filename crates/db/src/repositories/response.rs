//! Response repository.

use std::sync::Arc;

use crate::entities::{response, Response};
use pollcast_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Response repository for database operations.
#[derive(Clone)]
pub struct ResponseRepository {
    db: Arc<DatabaseConnection>,
}

impl ResponseRepository {
    /// Create a new response repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Delete all of a user's responses to one question. Returns the
    /// number of rows removed.
    pub async fn delete_for_question_and_user(
        &self,
        question_id: &str,
        user_id: &str,
    ) -> AppResult<u64> {
        let result = Response::delete_many()
            .filter(response::Column::QuestionId.eq(question_id))
            .filter(response::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Get all responses to a question, ordered by option index.
    pub async fn find_by_question(&self, question_id: &str) -> AppResult<Vec<response::Model>> {
        Response::find()
            .filter(response::Column::QuestionId.eq(question_id))
            .order_by_asc(response::Column::Option)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new response.
    pub async fn create(&self, model: response::ActiveModel) -> AppResult<response::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
