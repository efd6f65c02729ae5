//! Create `products` table. SKU is optional and unique when present.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string_len(Products::Name, 255))
                    .col(text_null(Products::Description))
                    .col(double(Products::Price))
                    .col(double(Products::Cost))
                    .col(string_len_null(Products::Sku, 64).unique_key())
                    .col(string_len_null(Products::Category, 128))
                    .col(integer(Products::StockQuantity).default(0))
                    .col(boolean(Products::IsActive).default(true))
                    .col(timestamp_with_time_zone(Products::CreatedAt))
                    .col(timestamp_with_time_zone(Products::UpdatedAt))
                    .check(Expr::col(Products::Price).gte(0))
                    .check(Expr::col(Products::Cost).gte(0))
                    .check(Expr::col(Products::StockQuantity).gte(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Products::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Description,
    Price,
    Cost,
    Sku,
    Category,
    StockQuantity,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
