//! Data Transfer Objects - request/response types for the API.

mod admin;
mod auth;
mod bookings;
mod memberships;
mod sessions;

pub use admin::*;
pub use auth::*;
pub use bookings::*;
pub use memberships::*;
pub use sessions::*;
