//! # Gym Core
//!
//! The domain layer of the gym booking service: entities, the ports that
//! infrastructure implements, and the booking, scheduling, membership and
//! administration use cases. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
