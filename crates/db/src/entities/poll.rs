//! Poll entity for single-question broadcast polls.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "poll")]
pub struct Model {
    /// Chat message timestamp; also the creation-order key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub timestamp: String,

    /// Channel the poll message lives in.
    pub channel: String,

    /// Question text.
    pub question: String,

    /// Option strings (JSON array, append-only).
    #[sea_orm(column_type = "Json")]
    pub options: JsonValue,
}

impl Model {
    /// Decode the options JSON array.
    pub fn option_list(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_value(self.options.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vote::Entity")]
    Vote,
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
