//! SeaORM entities for the gym schema.

pub mod booking;
pub mod membership_purchase;
pub mod membership_type;
pub mod session;
pub mod user;
pub mod user_role;
