use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use gym_core::domain::{Category, ContactDetails, Role, Session, User};
use gym_core::ports::{
    AuthError, BaseRepository, BookingRepository, PasswordService, TokenClaims, TokenService,
    UserRepository,
};
use gym_core::services::{
    AccountError, AccountService, BookingError, BookingRejection, BookingService,
    MembershipService, NewSession, Registration, SessionService, UserAdminService,
    UserDetailsUpdate,
};
use gym_core::{DomainError, RepoError};

use super::InMemoryDatabase;

struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain:{}", password))
    }
}

struct OpaqueTokens;

impl TokenService for OpaqueTokens {
    fn generate_token(
        &self,
        user_id: Uuid,
        _email: &str,
        roles: &[Role],
    ) -> Result<String, AuthError> {
        Ok(format!("{}:{}", user_id, roles.len()))
    }

    fn validate_token(&self, _token: &str) -> Result<TokenClaims, AuthError> {
        Err(AuthError::InvalidToken("not supported".to_string()))
    }

    fn expiration_seconds(&self) -> i64 {
        3600
    }
}

async fn add_user(db: &InMemoryDatabase, email: &str, role: Role) -> User {
    let users = db.users();
    let user = users
        .save(User::new(email.to_string(), "plain:password123".to_string()))
        .await
        .unwrap();
    users.set_roles(user.id, &[role]).await.unwrap();
    user
}

async fn add_session(db: &InMemoryDatabase, starts_in: Duration, capacity: i32) -> Session {
    let start = Utc::now() + starts_in;
    db.sessions()
        .save(Session::new(
            "Spin".to_string(),
            "Indoor cycling".to_string(),
            Category::Cardio,
            capacity,
            None,
            start,
            start + Duration::hours(1),
        ))
        .await
        .unwrap()
}

fn booking_service(db: &InMemoryDatabase) -> BookingService {
    BookingService::new(
        Arc::new(db.users()),
        Arc::new(db.sessions()),
        Arc::new(db.bookings()),
    )
}

fn rejection(result: Result<impl std::fmt::Debug, BookingError>) -> BookingRejection {
    match result {
        Err(BookingError::Rejected(r)) => r,
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_book_cancel_and_rebook() {
    let db = InMemoryDatabase::seeded();
    let user = add_user(&db, "anna@example.com", Role::Member).await;
    let session = add_session(&db, Duration::days(1), 10).await;
    let service = booking_service(&db);

    service.book(user.id, session.id).await.unwrap();
    assert!(service.is_booked(user.id, session.id).await.unwrap());

    let again = service.book(user.id, session.id).await;
    assert_eq!(
        rejection(again).to_string(),
        "You have already booked this session"
    );

    service.cancel(user.id, session.id).await.unwrap();
    assert!(!service.is_booked(user.id, session.id).await.unwrap());

    service.book(user.id, session.id).await.unwrap();
    let mine = service.my_bookings(user.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].session.current_bookings, 1);
}

#[tokio::test]
async fn test_full_session_is_rejected_with_counts() {
    let db = InMemoryDatabase::seeded();
    let session = add_session(&db, Duration::days(1), 2).await;
    let service = booking_service(&db);

    for email in ["a@example.com", "b@example.com"] {
        let user = add_user(&db, email, Role::Member).await;
        service.book(user.id, session.id).await.unwrap();
    }

    let late = add_user(&db, "c@example.com", Role::Member).await;
    let result = service.book(late.id, session.id).await;
    assert_eq!(rejection(result).to_string(), "The session is full (2/2)");
}

#[tokio::test]
async fn test_started_session_cannot_be_booked() {
    let db = InMemoryDatabase::seeded();
    let user = add_user(&db, "anna@example.com", Role::Member).await;
    let session = add_session(&db, Duration::hours(-1), 10).await;

    let result = booking_service(&db).book(user.id, session.id).await;
    assert_eq!(
        rejection(result).to_string(),
        "Booking failed, session is no longer available"
    );
}

#[tokio::test]
async fn test_missing_user_is_reported_before_missing_session() {
    let db = InMemoryDatabase::seeded();
    let service = booking_service(&db);

    let result = service.book(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(matches!(rejection(result), BookingRejection::UserNotFound));

    let user = add_user(&db, "anna@example.com", Role::Member).await;
    let result = service.book(user.id, Uuid::new_v4()).await;
    assert!(matches!(rejection(result), BookingRejection::SessionNotFound));
}

#[tokio::test]
async fn test_cancel_without_booking_fails() {
    let db = InMemoryDatabase::seeded();
    let user = add_user(&db, "anna@example.com", Role::Member).await;
    let session = add_session(&db, Duration::days(1), 10).await;

    let result = booking_service(&db).cancel(user.id, session.id).await;
    assert!(matches!(result, Err(BookingError::CancellationFailed)));
}

#[tokio::test]
async fn test_capacity_enforced_at_insert() {
    let db = InMemoryDatabase::seeded();
    let session = add_session(&db, Duration::days(1), 1).await;
    let first = add_user(&db, "a@example.com", Role::Member).await;
    let second = add_user(&db, "b@example.com", Role::Member).await;
    let bookings = db.bookings();

    bookings
        .create_within_capacity(gym_core::domain::Booking::new(first.id, session.id), 1)
        .await
        .unwrap();
    let result = bookings
        .create_within_capacity(gym_core::domain::Booking::new(second.id, session.id), 1)
        .await;

    assert!(matches!(
        result,
        Err(RepoError::CapacityReached {
            current: 1,
            capacity: 1
        })
    ));
}

#[tokio::test]
async fn test_trainer_cannot_double_book_time() {
    let db = InMemoryDatabase::seeded();
    let trainer = add_user(&db, "coach@example.com", Role::Trainer).await;
    let service = SessionService::new(Arc::new(db.sessions()));
    let start = Utc::now() + Duration::days(2);

    let new_session = |start, end| NewSession {
        title: "Power Yoga".to_string(),
        description: String::new(),
        category: "yoga".to_string(),
        max_participants: 12,
        instructor_id: trainer.id,
        start_time: start,
        end_time: end,
    };

    let created = service
        .create(new_session(start, start + Duration::hours(1)))
        .await
        .unwrap();
    assert_eq!(created.category, "Yoga");

    let clash = service
        .create(new_session(
            start + Duration::minutes(30),
            start + Duration::minutes(90),
        ))
        .await;
    assert!(matches!(clash, Err(DomainError::Conflict(_))));

    service
        .create(new_session(
            start + Duration::hours(1),
            start + Duration::hours(2),
        ))
        .await
        .unwrap();

    let week = service
        .instructor_week(trainer.id, start.date_naive())
        .await
        .unwrap();
    assert_eq!(week.len(), 2);
}

#[tokio::test]
async fn test_unknown_category_rejected() {
    let db = InMemoryDatabase::seeded();
    let service = SessionService::new(Arc::new(db.sessions()));
    let start = Utc::now() + Duration::days(1);

    let result = service
        .create(NewSession {
            title: "Pilates".to_string(),
            description: String::new(),
            category: "Pilates".to_string(),
            max_participants: 10,
            instructor_id: Uuid::new_v4(),
            start_time: start,
            end_time: start + Duration::hours(1),
        })
        .await;
    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_soft_deleted_session_hidden_from_browse() {
    let db = InMemoryDatabase::seeded();
    let session = add_session(&db, Duration::days(1), 10).await;
    let service = SessionService::new(Arc::new(db.sessions()));

    assert_eq!(service.browse(Some("cardio")).await.unwrap().len(), 1);
    service.soft_delete(session.id, None).await.unwrap();

    assert!(service.browse(None).await.unwrap().is_empty());
    assert!(matches!(
        service.get(session.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_dashboard_search_and_role_change() {
    let db = InMemoryDatabase::seeded();
    let mut anna = add_user(&db, "anna@example.com", Role::Member).await;
    anna.first_name = "Anna".to_string();
    db.users().save(anna.clone()).await.unwrap();
    add_user(&db, "coach@example.com", Role::Trainer).await;

    let admin = UserAdminService::new(Arc::new(db.users()), Arc::new(db.sessions()));

    let dashboard = admin.dashboard(None).await.unwrap();
    assert_eq!(dashboard.total_users, 2);
    assert_eq!(dashboard.members, 1);
    assert_eq!(dashboard.trainers, 1);

    let found = admin.dashboard(Some("ann")).await.unwrap();
    assert_eq!(found.users.len(), 1);
    assert_eq!(found.users[0].user.id, anna.id);

    let by_role = admin.dashboard(Some("train")).await.unwrap();
    assert_eq!(by_role.users.len(), 1);

    let role = admin.change_role(anna.id, "trainer").await.unwrap();
    assert_eq!(role, Role::Trainer);
    assert_eq!(db.users().roles_of(anna.id).await.unwrap(), vec![Role::Trainer]);

    let unknown = admin.change_role(anna.id, "Janitor").await;
    assert!(
        matches!(unknown, Err(DomainError::Validation(msg)) if msg == "Role 'Janitor' does not exist.")
    );
}

#[tokio::test]
async fn test_purchase_is_unique_per_email_and_start_date() {
    let db = InMemoryDatabase::seeded();
    let service = MembershipService::new(Arc::new(db.memberships()), Arc::new(db.users()));
    let start = Utc::now().date_naive() + Duration::days(7);
    let contact = ContactDetails {
        first_name: "Anna".to_string(),
        last_name: "Berg".to_string(),
        email: "anna@example.com".to_string(),
        address: "Storgatan 1".to_string(),
        phone: "0701234567".to_string(),
    };

    service.purchase(2, contact.clone(), start).await.unwrap();

    let shouting = ContactDetails {
        email: "ANNA@example.com".to_string(),
        ..contact.clone()
    };
    let again = service.purchase(1, shouting, start).await;
    assert!(matches!(again, Err(DomainError::Duplicate(_))));

    service
        .purchase(1, contact, start + Duration::days(1))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_rejects_locked_and_deleted_accounts() {
    let db = InMemoryDatabase::seeded();
    let accounts = AccountService::new(
        Arc::new(db.users()),
        Arc::new(PlainPasswords),
        Arc::new(OpaqueTokens),
    );
    let admin = UserAdminService::new(Arc::new(db.users()), Arc::new(db.sessions()));
    let user = add_user(&db, "anna@example.com", Role::Member).await;

    let issued = accounts.login("anna@example.com", "password123").await.unwrap();
    assert_eq!(issued.roles, vec![Role::Member]);

    admin.lock(user.id).await.unwrap();
    let locked = accounts.login("anna@example.com", "password123").await;
    assert!(matches!(locked, Err(AccountError::Auth(AuthError::AccountLocked))));

    admin.unlock(user.id).await.unwrap();
    admin.soft_delete(user.id).await.unwrap();
    let deleted = accounts.login("anna@example.com", "password123").await;
    assert!(matches!(
        deleted,
        Err(AccountError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_register_assigns_member_role() {
    let db = InMemoryDatabase::seeded();
    let accounts = AccountService::new(
        Arc::new(db.users()),
        Arc::new(PlainPasswords),
        Arc::new(OpaqueTokens),
    );

    let issued = accounts
        .register(gym_core::services::Registration {
            email: "new@example.com".to_string(),
            password: "longenough".to_string(),
            user_name: None,
        })
        .await
        .unwrap();
    assert_eq!(issued.roles, vec![Role::Member]);
    assert_eq!(issued.expires_in, 3600);

    let duplicate = accounts
        .register(gym_core::services::Registration {
            email: "new@example.com".to_string(),
            password: "longenough".to_string(),
            user_name: None,
        })
        .await;
    assert!(matches!(
        duplicate,
        Err(AccountError::Domain(DomainError::Duplicate(_)))
    ));
}

#[tokio::test]
async fn test_ensure_admin_creates_then_promotes() {
    let db = InMemoryDatabase::seeded();
    let accounts = AccountService::new(
        Arc::new(db.users()),
        Arc::new(PlainPasswords),
        Arc::new(OpaqueTokens),
    );

    let admin = accounts
        .ensure_admin("admin@example.com", "adminpassword")
        .await
        .unwrap();
    assert_eq!(db.users().roles_of(admin.id).await.unwrap(), vec![Role::Admin]);

    let again = accounts
        .ensure_admin("admin@example.com", "ignored-password")
        .await
        .unwrap();
    assert_eq!(again.id, admin.id);

    let member = add_user(&db, "coach@example.com", Role::Member).await;
    accounts
        .ensure_admin("coach@example.com", "whatever1")
        .await
        .unwrap();
    assert_eq!(
        db.users().roles_of(member.id).await.unwrap(),
        vec![Role::Admin, Role::Member]
    );
}

#[tokio::test]
async fn test_full_is_reported_before_already_booked() {
    let db = InMemoryDatabase::seeded();
    let user = add_user(&db, "anna@example.com", Role::Member).await;
    let session = add_session(&db, Duration::days(1), 1).await;
    let service = booking_service(&db);

    service.book(user.id, session.id).await.unwrap();

    let again = service.validate(user.id, session.id).await;
    assert_eq!(
        rejection(again),
        BookingRejection::SessionFull {
            booked: 1,
            capacity: 1
        }
    );
}

#[tokio::test]
async fn test_category_filters() {
    let db = InMemoryDatabase::seeded();
    add_session(&db, Duration::days(1), 10).await;
    let service = SessionService::new(Arc::new(db.sessions()));

    assert_eq!(service.by_category("cardio").await.unwrap().len(), 1);
    assert!(service.by_category("Pilates").await.unwrap().is_empty());

    assert!(service.search_by_category("   ").await.unwrap().is_empty());
    assert_eq!(service.search_by_category("CARDIO").await.unwrap().len(), 1);
    assert!(service.search_by_category("yoga").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_week_start_out_of_range_is_rejected() {
    let db = InMemoryDatabase::seeded();
    let service = SessionService::new(Arc::new(db.sessions()));

    let result = service.instructor_week(Uuid::new_v4(), NaiveDate::MAX).await;

    assert!(matches!(result, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn test_update_details_checks_fields_and_email_owner() {
    let db = InMemoryDatabase::seeded();
    let anna = add_user(&db, "anna@example.com", Role::Member).await;
    add_user(&db, "coach@example.com", Role::Trainer).await;
    let admin = UserAdminService::new(Arc::new(db.users()), Arc::new(db.sessions()));

    let update = |email: &str| UserDetailsUpdate {
        first_name: "Anna".to_string(),
        last_name: "Berg".to_string(),
        email: email.to_string(),
        address: "Storgatan 1".to_string(),
        city: "Uppsala".to_string(),
        country: "Sweden".to_string(),
    };

    let blank = admin
        .update_details(
            anna.id,
            UserDetailsUpdate {
                first_name: String::new(),
                city: "x".repeat(101),
                ..update("anna@example.com")
            },
        )
        .await;
    match blank {
        Err(DomainError::InvalidFields(errors)) => {
            assert_eq!(
                errors,
                vec![
                    "First name is required".to_string(),
                    "City can't be longer than 100 characters".to_string(),
                ]
            );
        }
        other => panic!("expected field errors, got {:?}", other),
    }

    let taken = admin.update_details(anna.id, update("Coach@Example.com")).await;
    assert!(matches!(taken, Err(DomainError::Duplicate(_))));

    let saved = admin
        .update_details(anna.id, update("anna.berg@example.com"))
        .await
        .unwrap();
    assert_eq!(saved.email, "anna.berg@example.com");
    assert_eq!(saved.city, "Uppsala");
}

#[tokio::test]
async fn test_summary_of_unknown_plan_is_not_found() {
    let db = InMemoryDatabase::seeded();
    let service = MembershipService::new(Arc::new(db.memberships()), Arc::new(db.users()));
    let contact = ContactDetails {
        first_name: "Anna".to_string(),
        last_name: "Berg".to_string(),
        email: "anna@example.com".to_string(),
        address: "Storgatan 1".to_string(),
        phone: "0701234567".to_string(),
    };

    let summary = service.summary(1, contact.clone(), None).await.unwrap();
    assert_eq!(summary.membership.name, "Adult Membership");

    let missing = service.summary(42, contact, None).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_email_is_matched_without_case() {
    let db = InMemoryDatabase::seeded();
    let accounts = AccountService::new(
        Arc::new(db.users()),
        Arc::new(PlainPasswords),
        Arc::new(OpaqueTokens),
    );
    let registration = |email: &str| Registration {
        email: email.to_string(),
        password: "longenough".to_string(),
        user_name: None,
    };

    let issued = accounts
        .register(registration("Anna@Example.com"))
        .await
        .unwrap();

    let duplicate = accounts.register(registration("anna@example.com")).await;
    assert!(matches!(
        duplicate,
        Err(AccountError::Domain(DomainError::Duplicate(_)))
    ));

    let login = accounts
        .login("ANNA@EXAMPLE.COM", "longenough")
        .await
        .unwrap();
    assert_eq!(login.user.id, issued.user.id);

    let clash = db
        .users()
        .save(User::new("ANNA@example.com".to_string(), "plain:x".to_string()))
        .await;
    assert!(matches!(clash, Err(RepoError::Constraint(_))));
}
