//! Create response table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Response::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Response::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Response::QuestionId)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Response::Option).integer().not_null())
                    .col(ColumnDef::new(Response::UserId).string_len(50).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_question")
                            .from(Response::Table, Response::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_user")
                            .from(Response::Table, Response::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (question_id, option, user_id) - single response copy
        manager
            .create_index(
                Index::create()
                    .name("idx_response_question_option_user")
                    .table(Response::Table)
                    .col(Response::QuestionId)
                    .col(Response::Option)
                    .col(Response::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: question_id (tallying a question)
        manager
            .create_index(
                Index::create()
                    .name("idx_response_question_id")
                    .table(Response::Table)
                    .col(Response::QuestionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Response::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Response {
    Table,
    Id,
    QuestionId,
    Option,
    UserId,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
