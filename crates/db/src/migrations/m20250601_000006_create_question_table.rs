//! Create question table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Question::Id)
                            .string_len(8)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Question::BlockId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Question::Question)
                            .string_len(1000)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Question::Options).json_binary().not_null())
                    .col(ColumnDef::new(Question::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_block")
                            .from(Question::Table, Question::BlockId)
                            .to(Block::Table, Block::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: block_id (listing a block's questions)
        manager
            .create_index(
                Index::create()
                    .name("idx_question_block_id")
                    .table(Question::Table)
                    .col(Question::BlockId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
    BlockId,
    Question,
    Options,
    Position,
}

#[derive(Iden)]
enum Block {
    Table,
    Id,
}
