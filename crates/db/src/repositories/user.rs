//! User repository.

use std::sync::Arc;

use crate::entities::{user, User};
use pollcast_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find a user by display name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by name, creating them on first reference.
    ///
    /// `id` is the chat-platform user ID when the payload carries one;
    /// web-only voters get a generated ULID.
    pub async fn find_or_create(&self, id: Option<&str>, name: &str) -> AppResult<user::Model> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let model = user::ActiveModel {
            id: Set(id.map_or_else(|| self.id_gen.generate(), ToString::to_string)),
            name: Set(name.to_string()),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find users by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        User::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
