//! Create vote table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Vote::PollTimestamp)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Vote::Option).integer().not_null())
                    .col(ColumnDef::new(Vote::UserId).string_len(50).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_poll")
                            .from(Vote::Table, Vote::PollTimestamp)
                            .to(Poll::Table, Poll::Timestamp)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_user")
                            .from(Vote::Table, Vote::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: poll_timestamp (tallying a poll)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_poll_timestamp")
                    .table(Vote::Table)
                    .col(Vote::PollTimestamp)
                    .to_owned(),
            )
            .await?;

        // Index: user_id (toggle lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_user_id")
                    .table(Vote::Table)
                    .col(Vote::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vote {
    Table,
    Id,
    PollTimestamp,
    Option,
    UserId,
}

#[derive(Iden)]
enum Poll {
    Table,
    Timestamp,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
