use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuestionAnswer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionAnswer::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuestionAnswer::Question).text().not_null())
                    .col(ColumnDef::new(QuestionAnswer::Answer).text().not_null())
                    .col(ColumnDef::new(QuestionAnswer::Options).text().null())
                    .col(ColumnDef::new(QuestionAnswer::Type).string_len(50).null())
                    .col(
                        ColumnDef::new(QuestionAnswer::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 题目文本是缓存的唯一键，upsert 依赖该唯一索引
        manager
            .create_index(
                Index::create()
                    .name("idx_question_answer_question")
                    .table(QuestionAnswer::Table)
                    .col(QuestionAnswer::Question)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_question_answer_created_at")
                    .table(QuestionAnswer::Table)
                    .col(QuestionAnswer::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuestionAnswer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum QuestionAnswer {
    Table,
    Id,
    Question,
    Answer,
    Options,
    Type,
    CreatedAt,
}
