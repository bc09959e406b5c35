//! Database migrations for the gym booking schema.

pub use sea_orm_migration::prelude::*;

mod m20251126_000001_create_accounts;
mod m20251126_000002_create_schedule;
mod m20251127_000003_create_memberships;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251126_000001_create_accounts::Migration),
            Box::new(m20251126_000002_create_schedule::Migration),
            Box::new(m20251127_000003_create_memberships::Migration),
        ]
    }
}
