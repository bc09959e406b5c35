//! Application state - shared across all handlers.

use std::sync::Arc;

use gym_core::ports::{
    BookingRepository, MembershipRepository, PasswordService, SessionRepository, TokenService,
    UserRepository,
};
use gym_core::services::{
    AccountService, BookingService, MembershipService, SessionService, UserAdminService,
};
use gym_infra::{Argon2PasswordService, InMemoryDatabase, JwtTokenService};

#[cfg(feature = "postgres")]
use gym_infra::database::{
    DatabaseConnections, PostgresBookingRepository, PostgresMembershipRepository,
    PostgresSessionRepository, PostgresUserRepository,
};
#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};

use crate::config::AppConfig;

/// Port implementations the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
}

impl Repositories {
    pub fn in_memory(db: &InMemoryDatabase) -> Self {
        Self {
            users: Arc::new(db.users()),
            sessions: Arc::new(db.sessions()),
            bookings: Arc::new(db.bookings()),
            memberships: Arc::new(db.memberships()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(conn: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
            sessions: Arc::new(PostgresSessionRepository::new(conn.main.clone())),
            bookings: Arc::new(PostgresBookingRepository::new(conn.main.clone())),
            memberships: Arc::new(PostgresMembershipRepository::new(conn.main.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub bookings: BookingService,
    pub sessions: SessionService,
    pub memberships: MembershipService,
    pub admin: UserAdminService,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let repos = Self::repositories(config).await;
        let state = Self::from_parts(repos, passwords, tokens);

        if let Some(seed) = &config.admin {
            if let Err(e) = state.accounts.ensure_admin(&seed.email, &seed.password).await {
                tracing::error!(error = %e, "Failed to seed administrator account");
            }
        }

        tracing::info!("Application state initialized");
        state
    }

    pub fn from_parts(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts: AccountService::new(repos.users.clone(), passwords, tokens.clone()),
            bookings: BookingService::new(
                repos.users.clone(),
                repos.sessions.clone(),
                repos.bookings.clone(),
            ),
            sessions: SessionService::new(repos.sessions.clone()),
            memberships: MembershipService::new(repos.memberships.clone(), repos.users.clone()),
            admin: UserAdminService::new(repos.users.clone(), repos.sessions.clone()),
            tokens,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Repositories::in_memory(&InMemoryDatabase::seeded());
        };

        let conn = match DatabaseConnections::init(db_config).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return Repositories::in_memory(&InMemoryDatabase::seeded());
            }
        };

        if let Err(e) = Migrator::up(&conn.main, None).await {
            tracing::error!(error = %e, "Database migration failed. Using in-memory fallback.");
            return Repositories::in_memory(&InMemoryDatabase::seeded());
        }
        tracing::info!("Database migrations applied");

        Repositories::postgres(&conn)
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Repositories::in_memory(&InMemoryDatabase::seeded())
    }
}
