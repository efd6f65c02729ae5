//! Create `customers` table. Optional email is unique when present.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_auto(Customers::Id))
                    .col(string_len(Customers::Name, 255))
                    .col(string_len_null(Customers::Email, 255).unique_key())
                    .col(string_len_null(Customers::Phone, 64))
                    .col(string_len_null(Customers::Company, 255))
                    .col(string_len_null(Customers::Address, 512))
                    .col(string_len_null(Customers::City, 128))
                    .col(string_len_null(Customers::Country, 128))
                    .col(text_null(Customers::Notes))
                    .col(timestamp_with_time_zone(Customers::CreatedAt))
                    .col(timestamp_with_time_zone(Customers::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customers::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Company,
    Address,
    City,
    Country,
    Notes,
    CreatedAt,
    UpdatedAt,
}
