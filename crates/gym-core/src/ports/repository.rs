use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    BookedSession, Booking, MembershipPurchase, MembershipType, Role, Session, SessionDetails,
    User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Filter for the administrative user listing.
#[derive(Debug, Clone, Default)]
pub struct UserSearch {
    /// Only users holding at least one of these roles.
    pub roles: Vec<Role>,
    /// Trimmed, non-empty search term.
    pub term: Option<String>,
    pub limit: u64,
}

/// User repository with account and role queries.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Roles held by a user, ordered by name.
    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<Role>, RepoError>;

    /// Replace every role the user holds with `roles`.
    async fn set_roles(&self, user_id: Uuid, roles: &[Role]) -> Result<(), RepoError>;

    /// Number of user rows, deleted ones included.
    async fn count_all(&self) -> Result<u64, RepoError>;

    async fn count_in_role(&self, role: Role) -> Result<u64, RepoError>;

    /// Newest users first.
    ///
    /// A term matches the exact id, a substring of the first or last name,
    /// or a substring of any held role name; all comparisons ignore case.
    async fn search(&self, filter: &UserSearch) -> Result<Vec<User>, RepoError>;
}

/// Session repository.
#[async_trait]
pub trait SessionRepository: BaseRepository<Session, Uuid> {
    /// Session with instructor name and booking count; deleted sessions included.
    async fn find_details(&self, id: Uuid) -> Result<Option<SessionDetails>, RepoError>;

    /// All sessions that are not soft-deleted, ordered by start time.
    async fn list_active(&self) -> Result<Vec<SessionDetails>, RepoError>;

    /// Non-deleted sessions of an instructor starting in `[from, to)`, ordered by start time.
    async fn by_instructor_between(
        &self,
        instructor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SessionDetails>, RepoError>;

    /// Every session an instructor teaches, ordered by start time.
    async fn by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Session>, RepoError>;

    /// Whether the instructor already teaches a non-deleted session overlapping `[start, end)`.
    async fn has_overlap(
        &self,
        instructor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError>;
}

/// Booking repository.
///
/// Uniqueness of `(user_id, session_id)` is enforced by the store.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find(&self, user_id: Uuid, session_id: Uuid) -> Result<Option<Booking>, RepoError>;

    async fn exists(&self, user_id: Uuid, session_id: Uuid) -> Result<bool, RepoError>;

    async fn count_for_session(&self, session_id: Uuid) -> Result<u64, RepoError>;

    /// The user's bookings with their sessions, ordered by session start time.
    async fn for_user(&self, user_id: Uuid) -> Result<Vec<BookedSession>, RepoError>;

    /// Insert a booking unless the session already holds `capacity` bookings.
    ///
    /// The count and the insert happen atomically. Fails with
    /// [`RepoError::CapacityReached`] when full and [`RepoError::Constraint`]
    /// when the pair is already booked.
    async fn create_within_capacity(
        &self,
        booking: Booking,
        capacity: i32,
    ) -> Result<Booking, RepoError>;

    /// Remove a booking. Returns `false` when none existed.
    async fn delete(&self, user_id: Uuid, session_id: Uuid) -> Result<bool, RepoError>;
}

/// Membership plans and purchases.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn list_types(&self) -> Result<Vec<MembershipType>, RepoError>;

    async fn find_type(&self, id: i32) -> Result<Option<MembershipType>, RepoError>;

    /// Whether a purchase with this email (ignoring case) and start date exists.
    async fn purchase_exists(&self, email: &str, start_date: NaiveDate)
    -> Result<bool, RepoError>;

    async fn save_purchase(
        &self,
        purchase: MembershipPurchase,
    ) -> Result<MembershipPurchase, RepoError>;
}
