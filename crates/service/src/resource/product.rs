use async_trait::async_trait;
use chrono::Utc;
use models::errors::ModelError;
use models::product;
use models::query::ListFilter;
use models::validation::{non_negative, non_negative_int, optional, required};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;

use super::{Resource, ResourceRepository, ResourceService};
use crate::errors::StoreError;

pub struct Products;

/// Create/update payload for a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub cost: f64,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
}

fn required_number(field: &str, value: Option<f64>) -> Result<f64, ModelError> {
    let value = value.ok_or_else(|| ModelError::Validation(format!("{field} is required")))?;
    non_negative(field, value)
}

impl Resource for Products {
    type Record = product::Model;
    type Input = ProductInput;
    type Fields = ProductFields;

    const NAME: &'static str = "product";
    const LABEL: &'static str = "Product";
    const DUPLICATE_MESSAGE: &'static str = "sku already exists";

    fn validate(input: ProductInput) -> Result<ProductFields, ModelError> {
        Ok(ProductFields {
            name: required("name", input.name.as_deref().unwrap_or_default())?,
            description: optional(input.description),
            price: required_number("price", input.price)?,
            cost: required_number("cost", input.cost)?,
            sku: optional(input.sku),
            category: optional(input.category),
            stock_quantity: non_negative_int("stock_quantity", input.stock_quantity.unwrap_or(0))?,
            is_active: input.is_active.unwrap_or(true),
        })
    }
}

pub type ProductService<R = SeaOrmProductRepository> = ResourceService<Products, R>;

pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ResourceRepository<Products> for SeaOrmProductRepository {
    async fn list(&self, filter: &ListFilter, limit: u64, offset: u64) -> Result<(Vec<product::Model>, u64), StoreError> {
        let cond = product::list_condition(filter);
        let total = product::Entity::find().filter(cond.clone()).count(&self.db).await?;
        let items = product::Entity::find()
            .filter(cond)
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;
        Ok((items, total))
    }

    async fn get(&self, id: i32) -> Result<Option<product::Model>, StoreError> {
        Ok(product::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn insert(&self, f: ProductFields) -> Result<product::Model, StoreError> {
        let now = Utc::now();
        let am = product::ActiveModel {
            name: Set(f.name),
            description: Set(f.description),
            price: Set(f.price),
            cost: Set(f.cost),
            sku: Set(f.sku),
            category: Set(f.category),
            stock_quantity: Set(f.stock_quantity),
            is_active: Set(f.is_active),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn update(&self, id: i32, f: ProductFields) -> Result<Option<product::Model>, StoreError> {
        let am = product::ActiveModel {
            id: Set(id),
            name: Set(f.name),
            description: Set(f.description),
            price: Set(f.price),
            cost: Set(f.cost),
            sku: Set(f.sku),
            category: Set(f.category),
            stock_quantity: Set(f.stock_quantity),
            is_active: Set(f.is_active),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        match am.update(&self.db).await {
            Ok(model) => Ok(Some(model)),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let res = product::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
