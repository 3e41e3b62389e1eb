//! Create distributed poll table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DistributedPoll::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DistributedPoll::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DistributedPoll::Name)
                            .string_len(50)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name (survey names are the external handle)
        manager
            .create_index(
                Index::create()
                    .name("idx_distributed_poll_name")
                    .table(DistributedPoll::Table)
                    .col(DistributedPoll::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DistributedPoll::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DistributedPoll {
    Table,
    Id,
    Name,
}
