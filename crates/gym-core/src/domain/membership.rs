use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A membership plan that can be purchased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipType {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl MembershipType {
    /// Plans every fresh installation starts with.
    pub fn defaults() -> Vec<MembershipType> {
        vec![
            MembershipType {
                id: 1,
                name: "Adult Membership".to_string(),
                price: Decimal::new(399, 0),
                description: Some("Unlimited access to all classes and gym facilities.".to_string()),
                image_url: Some("/Gym_Tem/img/memberships/adult.jpg".to_string()),
            },
            MembershipType {
                id: 2,
                name: "Student Membership".to_string(),
                price: Decimal::new(299, 0),
                description: Some("Discounted membership for students with valid ID.".to_string()),
                image_url: Some("/Gym_Tem/img/memberships/student.jpg".to_string()),
            },
            MembershipType {
                id: 3,
                name: "Senior Membership".to_string(),
                price: Decimal::new(249, 0),
                description: Some(
                    "Full gym access with flexible hours for seniors aged 65+.".to_string(),
                ),
                image_url: Some("/Gym_Tem/img/memberships/senior.jpg".to_string()),
            },
        ]
    }
}

/// Contact details captured by the membership checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

/// A completed membership purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipPurchase {
    pub id: Uuid,
    pub membership_type_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub purchase_date: NaiveDate,
}

impl MembershipPurchase {
    pub fn new(membership_type_id: i32, contact: ContactDetails, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            membership_type_id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            address: contact.address,
            phone: contact.phone,
            start_date,
            purchase_date: Utc::now().date_naive(),
        }
    }
}
