use async_trait::async_trait;
use chrono::Utc;
use models::customer;
use models::errors::ModelError;
use models::query::ListFilter;
use models::validation::{normalize_email, optional, required, validate_email};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;

use super::{Resource, ResourceRepository, ResourceService};
use crate::errors::StoreError;

pub struct Customers;

/// Create/update payload for a customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFields {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
}

impl Resource for Customers {
    type Record = customer::Model;
    type Input = CustomerInput;
    type Fields = CustomerFields;

    const NAME: &'static str = "customer";
    const LABEL: &'static str = "Customer";
    const DUPLICATE_MESSAGE: &'static str = "email already exists";

    fn validate(input: CustomerInput) -> Result<CustomerFields, ModelError> {
        let name = required("name", input.name.as_deref().unwrap_or_default())?;
        let email = optional(input.email).map(|e| normalize_email(&e));
        if let Some(email) = &email {
            validate_email(email)?;
        }
        Ok(CustomerFields {
            name,
            email,
            phone: optional(input.phone),
            company: optional(input.company),
            address: optional(input.address),
            city: optional(input.city),
            country: optional(input.country),
            notes: optional(input.notes),
        })
    }
}

pub type CustomerService<R = SeaOrmCustomerRepository> = ResourceService<Customers, R>;

pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ResourceRepository<Customers> for SeaOrmCustomerRepository {
    async fn list(&self, filter: &ListFilter, limit: u64, offset: u64) -> Result<(Vec<customer::Model>, u64), StoreError> {
        let cond = customer::list_condition(filter);
        let total = customer::Entity::find().filter(cond.clone()).count(&self.db).await?;
        let items = customer::Entity::find()
            .filter(cond)
            .order_by_desc(customer::Column::CreatedAt)
            .order_by_desc(customer::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;
        Ok((items, total))
    }

    async fn get(&self, id: i32) -> Result<Option<customer::Model>, StoreError> {
        Ok(customer::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn insert(&self, f: CustomerFields) -> Result<customer::Model, StoreError> {
        let now = Utc::now();
        let am = customer::ActiveModel {
            name: Set(f.name),
            email: Set(f.email),
            phone: Set(f.phone),
            company: Set(f.company),
            address: Set(f.address),
            city: Set(f.city),
            country: Set(f.country),
            notes: Set(f.notes),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn update(&self, id: i32, f: CustomerFields) -> Result<Option<customer::Model>, StoreError> {
        let am = customer::ActiveModel {
            id: Set(id),
            name: Set(f.name),
            email: Set(f.email),
            phone: Set(f.phone),
            company: Set(f.company),
            address: Set(f.address),
            city: Set(f.city),
            country: Set(f.country),
            notes: Set(f.notes),
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
        let res = customer::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
