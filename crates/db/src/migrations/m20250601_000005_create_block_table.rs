//! Create block table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Block::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Block::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Block::DistributedPollId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Block::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Block::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_block_distributed_poll")
                            .from(Block::Table, Block::DistributedPollId)
                            .to(DistributedPoll::Table, DistributedPoll::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: distributed_poll_id (listing a survey's blocks)
        manager
            .create_index(
                Index::create()
                    .name("idx_block_distributed_poll_id")
                    .table(Block::Table)
                    .col(Block::DistributedPollId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Block::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Block {
    Table,
    Id,
    DistributedPollId,
    Name,
    Position,
}

#[derive(Iden)]
enum DistributedPoll {
    Table,
    Id,
}
