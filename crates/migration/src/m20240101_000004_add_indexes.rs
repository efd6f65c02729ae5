use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing orders by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_customers_created_at")
                    .table(Customers::Table)
                    .col(Customers::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_products_created_at")
                    .table(Products::Table)
                    .col(Products::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Category filters
        manager
            .create_index(
                Index::create()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .col(Products::Category)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_customers_country")
                    .table(Customers::Table)
                    .col(Customers::Country)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_customers_created_at").table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_products_created_at").table(Products::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_products_category").table(Products::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_customers_country").table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customers { Table, CreatedAt, Country }

#[derive(DeriveIden)]
enum Products { Table, CreatedAt, Category }
