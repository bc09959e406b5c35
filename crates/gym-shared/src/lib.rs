//! # Gym Shared
//!
//! Wire types of the gym booking API, shared by the server and any Rust client.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
