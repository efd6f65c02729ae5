use sea_orm::entity::prelude::*;
use sea_orm::Condition;
use serde::{Deserialize, Serialize};

use crate::query::{filter_condition, ListFilter};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub cost: f64,
    #[sea_orm(unique)]
    pub sku: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const SEARCHABLE: [Column; 3] = [Column::Name, Column::Sku, Column::Description];

pub fn list_condition(filter: &ListFilter) -> Condition {
    filter_condition(filter, &SEARCHABLE, Column::Category)
}
