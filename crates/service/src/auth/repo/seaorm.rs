use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::auth::domain::{Account, NewAccount};
use crate::auth::repository::AuthRepository;
use crate::errors::StoreError;
use models::account;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let res = account::Entity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(res.map(Account::from))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError> {
        Ok(account::Entity::find_by_id(id).one(&self.db).await?.map(Account::from))
    }

    async fn create(&self, new: NewAccount) -> Result<Account, StoreError> {
        let am = account::ActiveModel {
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            full_name: Set(new.full_name),
            role: Set(new.role),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?.into())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let rows = account::Entity::find()
            .order_by_asc(account::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Account::from).collect())
    }
}
