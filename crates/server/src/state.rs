use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::{AuthService, TokenIssuer};
use service::resource::customer::{CustomerService, SeaOrmCustomerRepository};
use service::resource::product::{ProductService, SeaOrmProductRepository};

/// Shared handles passed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
    pub customers: Arc<CustomerService>,
    pub products: Arc<ProductService>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, auth: &configs::AuthConfig) -> Self {
        let tokens = TokenIssuer::new(&auth.jwt_secret, auth.token_ttl_secs);
        Self {
            auth: Arc::new(AuthService::new(Arc::new(SeaOrmAuthRepository::new(db.clone())), tokens)),
            customers: Arc::new(CustomerService::new(Arc::new(SeaOrmCustomerRepository::new(db.clone())))),
            products: Arc::new(ProductService::new(Arc::new(SeaOrmProductRepository::new(db.clone())))),
            db,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer { self.auth.tokens() }
}
