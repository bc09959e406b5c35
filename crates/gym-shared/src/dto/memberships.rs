use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipTypeResponse {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Contact details entered at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

/// Checkout preview; the start date may still be undecided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(flatten)]
    pub contact: ContactRequest,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    #[serde(flatten)]
    pub contact: ContactRequest,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipSummaryResponse {
    pub membership: MembershipTypeResponse,
    pub contact: ContactRequest,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub id: Uuid,
    pub membership_type_id: i32,
    pub email: String,
    pub start_date: NaiveDate,
    pub purchase_date: NaiveDate,
}

/// Attach a plan to the signed-in account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub membership: Option<MembershipTypeResponse>,
}
