use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HashedApiKeys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HashedApiKeys::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HashedApiKeys::Name).string_len(100).not_null())
                    .col(ColumnDef::new(HashedApiKeys::KeyValue).string_len(100).not_null())
                    .col(
                        ColumnDef::new(HashedApiKeys::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HashedApiKeys::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HashedApiKeys {
    Table,
    Id,
    Name,
    KeyValue,
    CreatedAt,
}
