use chrono::{DateTime, FixedOffset};
use models::account::Role;
use serde::{Deserialize, Serialize};

/// Registration input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Option<String>,
}

/// Login input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Account as held by the credential store, hash included.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<FixedOffset>,
}

impl Account {
    pub fn public(&self) -> PublicAccount {
        PublicAccount {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

impl From<models::account::Model> for Account {
    fn from(m: models::account::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            password_hash: m.password_hash,
            full_name: m.full_name,
            role: m.role,
            created_at: m.created_at,
        }
    }
}

/// Account fields safe to return to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicAccount {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<FixedOffset>,
}

/// Values for a new credential-store row.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
}

/// Register/login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicAccount,
}
