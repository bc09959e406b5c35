use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How far into the future an administrative lock reaches.
const LOCKOUT_YEARS: i64 = 100;

/// User entity - a gym account (member, trainer or administrator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub phone: String,
    pub membership_type_id: Option<i32>,
    pub is_deleted: bool,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    ///
    /// The user name defaults to the email address, as the sign-up form only asks for an email.
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_name: email.clone(),
            email,
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            postal_code: String::new(),
            city: String::new(),
            country: String::new(),
            phone: String::new(),
            membership_type_id: None,
            is_deleted: false,
            locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self
    }

    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Lock the account for the foreseeable future.
    pub fn lock(&mut self, now: DateTime<Utc>) {
        self.locked_until = Some(now + Duration::days(365 * LOCKOUT_YEARS));
        self.updated_at = now;
    }

    pub fn unlock(&mut self, now: DateTime<Utc>) {
        self.locked_until = None;
        self.updated_at = now;
    }

    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.updated_at = now;
    }

    /// Email addresses match regardless of case and surrounding whitespace.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }

    /// Whether this account may sign in or make bookings.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.user_name.clone()
        } else {
            full.to_string()
        }
    }
}
