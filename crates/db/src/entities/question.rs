//! Question entity within a survey block.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    /// 8-char random lowercase ID, globally unique. Short enough to ride
    /// inside interactive callback IDs (`qo_<id>`).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning block.
    #[sea_orm(indexed)]
    pub block_id: String,

    /// Question text.
    pub question: String,

    /// Option strings (JSON array).
    #[sea_orm(column_type = "Json")]
    pub options: JsonValue,

    /// File order within the block.
    pub position: i32,
}

impl Model {
    /// Decode the options JSON array.
    pub fn option_list(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_value(self.options.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::block::Entity",
        from = "Column::BlockId",
        to = "super::block::Column::Id",
        on_delete = "Cascade"
    )]
    Block,

    #[sea_orm(has_many = "super::response::Entity")]
    Response,
}

impl Related<super::block::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Block.def()
    }
}

impl Related<super::response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Response.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
