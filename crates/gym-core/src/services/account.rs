//! Registration and sign-in.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::domain::{Role, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

pub const MIN_PASSWORD_LEN: usize = 8;

/// A freshly issued access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub user_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<RepoError> for AccountError {
    fn from(err: RepoError) -> Self {
        AccountError::Domain(err.into())
    }
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Create a member account and sign it in.
    pub async fn register(&self, req: Registration) -> Result<IssuedToken, AccountError> {
        let email = req.email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()).into());
        }
        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ))
            .into());
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()).into());
        }

        let password_hash = self.passwords.hash(&req.password)?;
        let mut user = User::new(email, password_hash);
        if let Some(name) = req.user_name.map(|n| n.trim().to_string()) {
            if !name.is_empty() {
                user = user.with_user_name(name);
            }
        }

        let user = self.users.save(user).await?;
        self.users.set_roles(user.id, &[Role::Member]).await?;
        tracing::info!(user_id = %user.id, "Member registered");

        self.issue(user, vec![Role::Member])
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AccountError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .filter(User::is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        if user.is_locked(Utc::now()) {
            tracing::warn!(user_id = %user.id, "Sign-in attempt on locked account");
            return Err(AuthError::AccountLocked.into());
        }

        let roles = self.users.roles_of(user.id).await?;
        self.issue(user, roles)
    }

    /// Startup seeding: make sure an administrator account exists for `email`.
    /// An existing account is granted the Admin role; its password is left alone.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let email = email.trim();
        if let Some(user) = self.users.find_by_email(email).await? {
            let mut roles = self.users.roles_of(user.id).await?;
            if !roles.contains(&Role::Admin) {
                roles.push(Role::Admin);
                self.users.set_roles(user.id, &roles).await?;
                tracing::info!(user_id = %user.id, "Admin role granted to existing account");
            }
            return Ok(user);
        }

        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ))
            .into());
        }

        let password_hash = self.passwords.hash(password)?;
        let user = self
            .users
            .save(User::new(email.to_string(), password_hash))
            .await?;
        self.users.set_roles(user.id, &[Role::Admin]).await?;
        tracing::info!(user_id = %user.id, "Administrator account created");
        Ok(user)
    }

    fn issue(&self, user: User, roles: Vec<Role>) -> Result<IssuedToken, AccountError> {
        let access_token = self.tokens.generate_token(user.id, &user.email, &roles)?;
        Ok(IssuedToken {
            access_token,
            expires_in: self.tokens.expiration_seconds(),
            user,
            roles,
        })
    }
}
