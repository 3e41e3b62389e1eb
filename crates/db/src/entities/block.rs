//! Block entity: a named group of questions within a distributed poll.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "block")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning distributed poll.
    #[sea_orm(indexed)]
    pub distributed_poll_id: String,

    /// Block name.
    pub name: String,

    /// File order within the poll; blocks are never reordered.
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::distributed_poll::Entity",
        from = "Column::DistributedPollId",
        to = "super::distributed_poll::Column::Id",
        on_delete = "Cascade"
    )]
    DistributedPoll,

    #[sea_orm(has_many = "super::question::Entity")]
    Question,
}

impl Related<super::distributed_poll::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DistributedPoll.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
