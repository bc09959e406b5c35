//! Membership plans, checkout and member profiles.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{ContactDetails, MembershipPurchase, MembershipType, Role, User};
use crate::error::DomainError;
use crate::ports::{MembershipRepository, UserRepository};

use super::validation::FieldCheck;

/// Checkout preview shown before a purchase is confirmed.
#[derive(Debug, Clone)]
pub struct MembershipSummary {
    pub membership: MembershipType,
    pub contact: ContactDetails,
    pub start_date: Option<NaiveDate>,
}

/// Details a signed-in user supplies when taking a membership.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub roles: Vec<Role>,
    pub membership: Option<MembershipType>,
}

#[derive(Clone)]
pub struct MembershipService {
    memberships: Arc<dyn MembershipRepository>,
    users: Arc<dyn UserRepository>,
}

impl MembershipService {
    pub fn new(memberships: Arc<dyn MembershipRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { memberships, users }
    }

    pub async fn list_types(&self) -> Result<Vec<MembershipType>, DomainError> {
        Ok(self.memberships.list_types().await?)
    }

    pub async fn get_type(&self, id: i32) -> Result<MembershipType, DomainError> {
        self.memberships
            .find_type(id)
            .await?
            .ok_or_else(|| DomainError::not_found("MembershipType", id))
    }

    pub async fn summary(
        &self,
        type_id: i32,
        contact: ContactDetails,
        start_date: Option<NaiveDate>,
    ) -> Result<MembershipSummary, DomainError> {
        let membership = self.get_type(type_id).await?;
        Ok(MembershipSummary {
            membership,
            contact,
            start_date,
        })
    }

    /// Record a purchase. One purchase per email and start date.
    pub async fn purchase(
        &self,
        type_id: i32,
        contact: ContactDetails,
        start_date: NaiveDate,
    ) -> Result<MembershipPurchase, DomainError> {
        let membership = self.get_type(type_id).await?;

        check_contact(&contact)?;
        if start_date < Utc::now().date_naive() {
            return Err(DomainError::Validation(
                "Start date cannot be in the past.".to_string(),
            ));
        }

        let email = contact.email.trim().to_string();
        if self.memberships.purchase_exists(&email, start_date).await? {
            return Err(DomainError::Duplicate(format!(
                "A membership starting {} is already registered for this email",
                start_date
            )));
        }

        let contact = ContactDetails { email, ..contact };
        let purchase = self
            .memberships
            .save_purchase(MembershipPurchase::new(membership.id, contact, start_date))
            .await?;

        tracing::info!(
            purchase_id = %purchase.id,
            membership = %membership.name,
            %start_date,
            "Membership purchased"
        );
        Ok(purchase)
    }

    /// Attach a membership plan to an account and update its contact details.
    pub async fn sign_up(
        &self,
        user_id: Uuid,
        type_id: i32,
        form: SignupForm,
    ) -> Result<User, DomainError> {
        let membership = self.get_type(type_id).await?;

        FieldCheck::new()
            .required("First name", &form.first_name)
            .required("Last name", &form.last_name)
            .required("Email", &form.email)
            .email("Email address", &form.email)
            .finish()?;

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        let email = form.email.trim().to_string();
        if !user.has_email(&email) {
            if let Some(other) = self.users.find_by_email(&email).await? {
                if other.id != user.id {
                    return Err(DomainError::Duplicate("Email already registered".to_string()));
                }
            }
        }

        user.membership_type_id = Some(membership.id);
        user.first_name = form.first_name;
        user.last_name = form.last_name;
        user.address = form.address;
        user.postal_code = form.postal_code;
        user.city = form.city;
        user.phone = form.phone;
        user.email = email;
        user.updated_at = Utc::now();

        let saved = self.users.save(user).await?;
        tracing::info!(user_id = %saved.id, membership = %membership.name, "Membership assigned");
        Ok(saved)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<Profile, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        let membership = match user.membership_type_id {
            Some(id) => self.memberships.find_type(id).await?,
            None => None,
        };
        let roles = self.users.roles_of(user_id).await?;

        Ok(Profile {
            user,
            roles,
            membership,
        })
    }
}

fn check_contact(contact: &ContactDetails) -> Result<(), DomainError> {
    FieldCheck::new()
        .required("First name", &contact.first_name)
        .required("Last name", &contact.last_name)
        .required("Email", &contact.email)
        .email("Email address", &contact.email)
        .required("Address", &contact.address)
        .required("Phone", &contact.phone)
        .finish()
}
