//! Administration of member, trainer and admin accounts.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Role, Session, User};
use crate::error::DomainError;
use crate::ports::{SessionRepository, UserRepository, UserSearch};

use super::validation::FieldCheck;

/// Rows shown on the dashboard.
pub const DASHBOARD_LIMIT: u64 = 20;

/// A user together with their roles.
#[derive(Debug, Clone)]
pub struct UserOverview {
    pub user: User,
    pub roles: Vec<Role>,
    pub is_locked: bool,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub total_users: u64,
    pub members: u64,
    pub trainers: u64,
    pub users: Vec<UserOverview>,
    pub search_term: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TrainerOverview {
    pub trainer: UserOverview,
    pub sessions: Vec<Session>,
}

/// Editable account fields.
#[derive(Debug, Clone)]
pub struct UserDetailsUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

#[derive(Clone)]
pub struct UserAdminService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl UserAdminService {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { users, sessions }
    }

    pub async fn dashboard(&self, search: Option<&str>) -> Result<Dashboard, DomainError> {
        let term = search
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let total_users = self.users.count_all().await?;
        let members = self.users.count_in_role(Role::Member).await?;
        let trainers = self.users.count_in_role(Role::Trainer).await?;

        let filter = UserSearch {
            roles: Role::ALL.to_vec(),
            term: term.clone(),
            limit: DASHBOARD_LIMIT,
        };
        let mut users = Vec::new();
        for user in self.users.search(&filter).await? {
            users.push(self.overview(user).await?);
        }

        Ok(Dashboard {
            total_users,
            members,
            trainers,
            users,
            search_term: term,
        })
    }

    pub async fn details(&self, id: Uuid) -> Result<UserOverview, DomainError> {
        let user = self.find(id).await?;
        self.overview(user).await
    }

    /// A trainer's account plus the sessions they instruct.
    pub async fn trainer_details(&self, id: Uuid) -> Result<TrainerOverview, DomainError> {
        let trainer = self.details(id).await?;
        let sessions = self.sessions.by_instructor(id).await?;
        Ok(TrainerOverview { trainer, sessions })
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        input: UserDetailsUpdate,
    ) -> Result<User, DomainError> {
        FieldCheck::new()
            .required("First name", &input.first_name)
            .max_len("First name", &input.first_name, 100)
            .required("Last name", &input.last_name)
            .max_len("Last name", &input.last_name, 100)
            .required("Email", &input.email)
            .email("Email address", &input.email)
            .required("Address", &input.address)
            .max_len("Address", &input.address, 200)
            .required("City", &input.city)
            .max_len("City", &input.city, 100)
            .required("Country", &input.country)
            .max_len("Country", &input.country, 100)
            .finish()?;

        let mut user = self.find(id).await?;

        let email = input.email.trim().to_string();
        if let Some(other) = self.users.find_by_email(&email).await? {
            if other.id != id {
                return Err(DomainError::Duplicate("Email already registered".to_string()));
            }
        }

        user.first_name = input.first_name.trim().to_string();
        user.last_name = input.last_name.trim().to_string();
        user.email = email;
        user.address = input.address.trim().to_string();
        user.city = input.city.trim().to_string();
        user.country = input.country.trim().to_string();
        user.updated_at = Utc::now();

        let saved = self.users.save(user).await?;
        tracing::info!(user_id = %id, "Account details updated");
        Ok(saved)
    }

    pub async fn lock(&self, id: Uuid) -> Result<(), DomainError> {
        let mut user = self.find(id).await?;
        user.lock(Utc::now());
        self.users.save(user).await?;
        tracing::info!(user_id = %id, "Account locked");
        Ok(())
    }

    pub async fn unlock(&self, id: Uuid) -> Result<(), DomainError> {
        let mut user = self.find(id).await?;
        user.unlock(Utc::now());
        self.users.save(user).await?;
        tracing::info!(user_id = %id, "Account unlocked");
        Ok(())
    }

    /// Mark the account deleted; the row and its history are kept.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut user = self.find(id).await?;
        if user.is_deleted {
            return Ok(());
        }
        user.soft_delete(Utc::now());
        self.users.save(user).await?;
        tracing::info!(user_id = %id, "Account deleted");
        Ok(())
    }

    /// Replace all of the user's roles with `role`.
    pub async fn change_role(&self, id: Uuid, role: &str) -> Result<Role, DomainError> {
        if role.trim().is_empty() {
            return Err(DomainError::Validation("Please select a role.".to_string()));
        }
        let user = self.find(id).await?;
        let role: Role = role.parse()?;

        self.users.set_roles(user.id, &[role]).await?;
        tracing::info!(user_id = %id, %role, "Role changed");
        Ok(role)
    }

    async fn find(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn overview(&self, user: User) -> Result<UserOverview, DomainError> {
        let roles = self.users.roles_of(user.id).await?;
        let is_locked = user.is_locked(Utc::now());
        Ok(UserOverview {
            user,
            roles,
            is_locked,
        })
    }
}
