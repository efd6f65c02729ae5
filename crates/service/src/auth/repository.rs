use async_trait::async_trait;

use super::domain::{Account, NewAccount};
use crate::errors::StoreError;

/// Repository abstraction over the credential store.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError>;
    /// Insert a new account. A taken email surfaces as `StoreError::UniqueViolation`.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;
    async fn list(&self) -> Result<Vec<Account>, StoreError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        accounts: Mutex<Vec<Account>>,
    }

    impl MockAuthRepository {
        fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Account>>, StoreError> {
            self.accounts.lock().map_err(|e| StoreError::Db(e.to_string()))
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
            Ok(self.lock()?.iter().find(|a| a.email == email).cloned())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Account>, StoreError> {
            Ok(self.lock()?.iter().find(|a| a.id == id).cloned())
        }

        async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
            let mut accounts = self.lock()?;
            if accounts.iter().any(|a| a.email == account.email) {
                return Err(StoreError::UniqueViolation);
            }
            let created = Account {
                id: accounts.len() as i32 + 1,
                email: account.email,
                password_hash: account.password_hash,
                full_name: account.full_name,
                role: account.role,
                created_at: chrono::Utc::now().into(),
            };
            accounts.push(created.clone());
            Ok(created)
        }

        async fn list(&self) -> Result<Vec<Account>, StoreError> {
            Ok(self.lock()?.clone())
        }
    }
}
