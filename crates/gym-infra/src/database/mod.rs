//! PostgreSQL persistence via SeaORM.

mod connections;
pub mod entity;
mod postgres_base;
pub mod postgres_repo;
pub mod postgres_schedule;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use postgres_base::PostgresBaseRepository;
pub use postgres_repo::{PostgresMembershipRepository, PostgresUserRepository};
pub use postgres_schedule::{PostgresBookingRepository, PostgresSessionRepository};
