use std::sync::Arc;

use models::account::Role;
use models::validation::{normalize_email, required, validate_email};
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, LoginInput, NewAccount, PublicAccount, RegisterInput};
use super::errors::AuthError;
use super::password::{blocking, hash_password, verify_password};
use super::repository::AuthRepository;
use super::token::TokenIssuer;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    tokens: TokenIssuer,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenIssuer) -> Self { Self { repo, tokens } }

    pub fn tokens(&self) -> &TokenIssuer { &self.tokens }

    /// Register a new account and open a session for it.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenIssuer, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MockAuthRepository::default()), TokenIssuer::new("secret", 3600));
    /// let input = RegisterInput { email: "User@Example.com".into(), password: "Secret1".into(), full_name: "Test".into(), role: None };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let full_name = required("full_name", &input.full_name)?;
        let role = match input.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            None => Role::default(),
            Some(raw) => Role::parse(raw)
                .ok_or_else(|| AuthError::Validation("role must be one of admin, manager, user".into()))?,
        };

        if self.repo.find_by_email(&email).await?.is_some() {
            debug!("email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password = input.password;
        let password_hash = blocking(move || hash_password(&password)).await?;
        // A concurrent registration can still win the insert; the store's
        // unique constraint maps to DuplicateEmail via From<StoreError>.
        let account = self
            .repo
            .create(NewAccount { email, password_hash, full_name, role })
            .await?;

        let user = account.public();
        let token = self.tokens.issue(&user)?;
        info!(account_id = user.id, role = %user.role, "account_registered");
        Ok(AuthSession { token, user })
    }

    /// Authenticate and issue a fresh token. Unknown email and wrong
    /// password are indistinguishable to the caller.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::Validation("email and password are required".into()));
        }

        let Some(account) = self.repo.find_by_email(&email).await? else {
            debug!("unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let password = input.password;
        let digest = account.password_hash.clone();
        if !blocking(move || verify_password(&password, &digest)).await? {
            debug!(account_id = account.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let user = account.public();
        let token = self.tokens.issue(&user)?;
        info!(account_id = user.id, "account_logged_in");
        Ok(AuthSession { token, user })
    }

    /// Resolve the account behind a verified token.
    #[instrument(skip(self))]
    pub async fn who_am_i(&self, account_id: i32) -> Result<PublicAccount, AuthError> {
        self.repo
            .find_by_id(account_id)
            .await?
            .map(|a| a.public())
            .ok_or(AuthError::NotFound)
    }

    pub async fn list_accounts(&self) -> Result<Vec<PublicAccount>, AuthError> {
        Ok(self.repo.list().await?.iter().map(|a| a.public()).collect())
    }
}
