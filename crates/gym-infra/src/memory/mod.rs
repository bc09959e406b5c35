//! In-memory repositories - used when no database is configured, and in tests.
//!
//! All repositories handed out by one [`InMemoryDatabase`] share the same tables,
//! so joins (booking counts, instructor names) behave like the SQL implementation.
//! Data is lost on process restart.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use gym_core::domain::{
    BookedSession, Booking, MembershipPurchase, MembershipType, Role, Session, SessionDetails,
    User,
};
use gym_core::error::RepoError;
use gym_core::ports::{
    BaseRepository, BookingRepository, MembershipRepository, SessionRepository, UserRepository,
    UserSearch,
};

#[cfg(test)]
mod tests;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    user_roles: HashMap<Uuid, BTreeSet<Role>>,
    sessions: HashMap<Uuid, Session>,
    bookings: HashMap<(Uuid, Uuid), Booking>,
    membership_types: BTreeMap<i32, MembershipType>,
    purchases: Vec<MembershipPurchase>,
}

impl Tables {
    fn booking_count(&self, session_id: Uuid) -> u64 {
        self.bookings
            .keys()
            .filter(|(_, s)| *s == session_id)
            .count() as u64
    }

    fn details(&self, session: &Session) -> SessionDetails {
        SessionDetails {
            session: session.clone(),
            instructor_user_name: session
                .instructor_id
                .and_then(|id| self.users.get(&id))
                .map(|u| u.user_name.clone()),
            current_bookings: self.booking_count(session.id),
        }
    }

    fn sorted_details<'a>(&self, sessions: impl Iterator<Item = &'a Session>) -> Vec<SessionDetails> {
        let mut details: Vec<_> = sessions.map(|s| self.details(s)).collect();
        details.sort_by_key(|d| d.session.start_time);
        details
    }

    fn roles_of(&self, user_id: Uuid) -> Vec<Role> {
        self.user_roles
            .get(&user_id)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Shared in-memory store.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with the default membership plans.
    pub fn seeded() -> Self {
        let tables = Tables {
            membership_types: MembershipType::defaults()
                .into_iter()
                .map(|m| (m.id, m))
                .collect(),
            ..Tables::default()
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn sessions(&self) -> InMemorySessionRepository {
        InMemorySessionRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn bookings(&self) -> InMemoryBookingRepository {
        InMemoryBookingRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn memberships(&self) -> InMemoryMembershipRepository {
        InMemoryMembershipRepository {
            tables: self.tables.clone(),
        }
    }

    /// Add or replace a membership plan.
    pub async fn insert_membership_type(&self, membership: MembershipType) {
        let mut tables = self.tables.write().await;
        tables.membership_types.insert(membership.id, membership);
    }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|other| other.id != user.id && other.has_email(&user.email))
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.user_roles.remove(&id);
        tables.bookings.retain(|(user_id, _), _| *user_id != id);
        for session in tables.sessions.values_mut() {
            if session.instructor_id == Some(id) {
                session.instructor_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.has_email(email)).cloned())
    }

    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<Role>, RepoError> {
        Ok(self.tables.read().await.roles_of(user_id))
    }

    async fn set_roles(&self, user_id: Uuid, roles: &[Role]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(RepoError::NotFound);
        }
        tables
            .user_roles
            .insert(user_id, roles.iter().copied().collect());
        Ok(())
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.users.len() as u64)
    }

    async fn count_in_role(&self, role: Role) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_roles
            .values()
            .filter(|roles| roles.contains(&role))
            .count() as u64)
    }

    async fn search(&self, filter: &UserSearch) -> Result<Vec<User>, RepoError> {
        let tables = self.tables.read().await;
        let term = filter.term.as_deref().map(str::to_lowercase);
        let term_id = filter.term.as_deref().and_then(|t| Uuid::parse_str(t).ok());

        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| {
                let roles = tables.roles_of(u.id);
                let in_roles =
                    filter.roles.is_empty() || roles.iter().any(|r| filter.roles.contains(r));
                let matches = match &term {
                    None => true,
                    Some(term) => {
                        term_id == Some(u.id)
                            || u.first_name.to_lowercase().contains(term)
                            || u.last_name.to_lowercase().contains(term)
                            || roles
                                .iter()
                                .any(|r| r.as_str().to_lowercase().contains(term))
                    }
                };
                in_roles && matches
            })
            .cloned()
            .collect();

        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users.truncate(filter.limit as usize);
        Ok(users)
    }
}

/// In-memory session repository.
pub struct InMemorySessionRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Session, Uuid> for InMemorySessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, RepoError> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn save(&self, session: Session) -> Result<Session, RepoError> {
        let mut tables = self.tables.write().await;
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.sessions.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.bookings.retain(|(_, session_id), _| *session_id != id);
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_details(&self, id: Uuid) -> Result<Option<SessionDetails>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.get(&id).map(|s| tables.details(s)))
    }

    async fn list_active(&self) -> Result<Vec<SessionDetails>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.sorted_details(tables.sessions.values().filter(|s| !s.is_deleted)))
    }

    async fn by_instructor_between(
        &self,
        instructor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SessionDetails>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.sorted_details(tables.sessions.values().filter(|s| {
            !s.is_deleted
                && s.instructor_id == Some(instructor_id)
                && s.start_time >= from
                && s.start_time < to
        })))
    }

    async fn by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Session>, RepoError> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<Session> = tables
            .sessions
            .values()
            .filter(|s| s.instructor_id == Some(instructor_id))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.start_time);
        Ok(sessions)
    }

    async fn has_overlap(
        &self,
        instructor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.sessions.values().any(|s| {
            !s.is_deleted
                && s.instructor_id == Some(instructor_id)
                && Some(s.id) != exclude
                && s.overlaps(start, end)
        }))
    }
}

/// In-memory booking repository.
pub struct InMemoryBookingRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find(&self, user_id: Uuid, session_id: Uuid) -> Result<Option<Booking>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.get(&(user_id, session_id)).cloned())
    }

    async fn exists(&self, user_id: Uuid, session_id: Uuid) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.contains_key(&(user_id, session_id)))
    }

    async fn count_for_session(&self, session_id: Uuid) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.booking_count(session_id))
    }

    async fn for_user(&self, user_id: Uuid) -> Result<Vec<BookedSession>, RepoError> {
        let tables = self.tables.read().await;
        let mut booked: Vec<BookedSession> = tables
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| {
                tables.sessions.get(&b.session_id).map(|s| BookedSession {
                    booking: b.clone(),
                    session: tables.details(s),
                })
            })
            .collect();
        booked.sort_by_key(|b| b.session.session.start_time);
        Ok(booked)
    }

    async fn create_within_capacity(
        &self,
        booking: Booking,
        capacity: i32,
    ) -> Result<Booking, RepoError> {
        // The write lock makes count-then-insert atomic.
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&booking.user_id)
            || !tables.sessions.contains_key(&booking.session_id)
        {
            return Err(RepoError::Query("foreign key violation".to_string()));
        }

        let key = (booking.user_id, booking.session_id);
        if tables.bookings.contains_key(&key) {
            return Err(RepoError::Constraint(
                "UX_Bookings_UserId_SessionId".to_string(),
            ));
        }

        let current = tables.booking_count(booking.session_id);
        if current >= capacity.max(0) as u64 {
            return Err(RepoError::CapacityReached { current, capacity });
        }

        tables.bookings.insert(key, booking.clone());
        Ok(booking)
    }

    async fn delete(&self, user_id: Uuid, session_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.bookings.remove(&(user_id, session_id)).is_some())
    }
}

/// In-memory membership repository.
pub struct InMemoryMembershipRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn list_types(&self) -> Result<Vec<MembershipType>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.membership_types.values().cloned().collect())
    }

    async fn find_type(&self, id: i32) -> Result<Option<MembershipType>, RepoError> {
        Ok(self.tables.read().await.membership_types.get(&id).cloned())
    }

    async fn purchase_exists(&self, email: &str, start_date: NaiveDate) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .purchases
            .iter()
            .any(|p| p.email.eq_ignore_ascii_case(email) && p.start_date == start_date))
    }

    async fn save_purchase(
        &self,
        purchase: MembershipPurchase,
    ) -> Result<MembershipPurchase, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables
            .membership_types
            .contains_key(&purchase.membership_type_id)
        {
            return Err(RepoError::Query("foreign key violation".to_string()));
        }
        tables.purchases.push(purchase.clone());
        Ok(purchase)
    }
}
