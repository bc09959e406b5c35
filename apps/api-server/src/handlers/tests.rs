use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use gym_infra::{Argon2PasswordService, InMemoryDatabase, JwtConfig, JwtTokenService};

use super::{configure_routes, json_config, path_config, query_config};
use crate::observability::RequestIdMiddleware;
use crate::state::{AppState, Repositories};

fn test_state() -> AppState {
    let db = InMemoryDatabase::seeded();
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "gym-api-test".to_string(),
    });
    AppState::from_parts(
        Repositories::in_memory(&db),
        Arc::new(Argon2PasswordService::new()),
        Arc::new(tokens),
    )
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::new($state.tokens.clone()))
                .app_data(json_config())
                .app_data(path_config())
                .app_data(query_config())
                .configure(configure_routes),
        )
        .await
    };
}

/// Register a member and return its bearer token.
async fn member_token(state: &AppState, email: &str) -> String {
    state
        .accounts
        .register(gym_core::services::Registration {
            email: email.to_string(),
            password: "password123".to_string(),
            user_name: None,
        })
        .await
        .unwrap()
        .access_token
}

async fn admin_token(state: &AppState) -> String {
    state
        .accounts
        .ensure_admin("admin@example.com", "adminpassword")
        .await
        .unwrap();
    state
        .accounts
        .login("admin@example.com", "adminpassword")
        .await
        .unwrap()
        .access_token
}

/// Register an account, promote it to trainer and sign in again.
async fn trainer_token(state: &AppState, email: &str) -> String {
    let issued = state
        .accounts
        .register(gym_core::services::Registration {
            email: email.to_string(),
            password: "password123".to_string(),
            user_name: Some("coach".to_string()),
        })
        .await
        .unwrap();
    state
        .admin
        .change_role(issued.user.id, "Trainer")
        .await
        .unwrap();
    state
        .accounts
        .login(email, "password123")
        .await
        .unwrap()
        .access_token
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_health_echoes_request_id() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["request_id"], "abc-123");
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"email": "anna@example.com", "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "anna@example.com", "password": "wrong-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "anna@example.com", "password": "password123"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["roles"][0], "Member");
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["email"], "anna@example.com");
}

#[actix_web::test]
async fn test_missing_token_is_rejected() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/bookings").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 401);
}

#[actix_web::test]
async fn test_booking_flow_over_http() {
    let state = test_state();
    let app = init_app!(state);
    let trainer = trainer_token(&state, "coach@example.com").await;
    let member = member_token(&state, "anna@example.com").await;
    let start = Utc::now() + Duration::days(2);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(bearer(&trainer))
        .set_json(json!({
            "title": "Morning Spin",
            "description": "Indoor cycling",
            "category": "cardio",
            "max_participants": 1,
            "start_time": start,
            "end_time": start + Duration::hours(1),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["category"], "Cardio");
    assert_eq!(body["data"]["instructor_user_name"], "coach");
    let session_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/bookings/{}", session_id))
        .insert_header(bearer(&member))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Booking successful!");

    let req = test::TestRequest::post()
        .uri(&format!("/api/bookings/{}", session_id))
        .insert_header(bearer(&member))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "The session is full (1/1)");

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", session_id))
        .insert_header(bearer(&member))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["is_booked"], true);
    assert_eq!(body["data"]["is_full"], true);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/bookings/{}", session_id))
        .insert_header(bearer(&member))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Booking cancelled!");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/bookings/{}", session_id))
        .insert_header(bearer(&member))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Cancellation failed - please try again later");
}

#[actix_web::test]
async fn test_booking_unknown_session_is_not_found() {
    let state = test_state();
    let app = init_app!(state);
    let member = member_token(&state, "anna@example.com").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/bookings/{}", uuid::Uuid::new_v4()))
        .insert_header(bearer(&member))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Session not found");
}

#[actix_web::test]
async fn test_member_cannot_schedule_sessions() {
    let state = test_state();
    let app = init_app!(state);
    let member = member_token(&state, "anna@example.com").await;
    let start = Utc::now() + Duration::days(1);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(bearer(&member))
        .set_json(json!({
            "title": "Yoga",
            "category": "Yoga",
            "max_participants": 10,
            "start_time": start,
            "end_time": start + Duration::hours(1),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_session_field_errors_are_listed() {
    let state = test_state();
    let app = init_app!(state);
    let trainer = trainer_token(&state, "coach@example.com").await;
    let start = Utc::now() + Duration::days(1);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(bearer(&trainer))
        .set_json(json!({
            "title": "",
            "category": "Yoga",
            "max_participants": 0,
            "start_time": start,
            "end_time": start + Duration::hours(1),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"].as_array().unwrap().len() >= 2);
}

#[actix_web::test]
async fn test_admin_dashboard_and_role_change() {
    let state = test_state();
    let app = init_app!(state);
    let admin = admin_token(&state).await;
    let member = member_token(&state, "anna@example.com").await;

    let req = test::TestRequest::get()
        .uri("/api/admin/dashboard")
        .insert_header(bearer(&member))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/admin/dashboard?search=member")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total_users"], 2);
    assert_eq!(body["data"]["members"], 1);
    let users = body["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    let member_id = users[0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/users/{}/role", member_id))
        .insert_header(bearer(&admin))
        .set_json(json!({"role": "Janitor"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Role 'Janitor' does not exist.");

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/users/{}/role", member_id))
        .insert_header(bearer(&admin))
        .set_json(json!({"role": "trainer"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Role has been changed to 'Trainer'.");

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/users/{}/lock", member_id))
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "The trainer account has been locked.");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "anna@example.com", "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_membership_purchase_is_deduplicated() {
    let state = test_state();
    let app = init_app!(state);
    let start = (Utc::now() + Duration::days(10)).date_naive();
    let purchase = json!({
        "first_name": "Anna",
        "last_name": "Berg",
        "email": "anna@example.com",
        "address": "Storgatan 1",
        "phone": "0701234567",
        "start_date": start,
    });

    let req = test::TestRequest::get().uri("/api/memberships").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"][1]["price"], "299");

    let req = test::TestRequest::post()
        .uri("/api/memberships/2/purchase")
        .set_json(&purchase)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/memberships/2/purchase")
        .set_json(&purchase)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/memberships/99/purchase")
        .set_json(&purchase)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_signup_attaches_membership_to_profile() {
    let state = test_state();
    let app = init_app!(state);
    let member = member_token(&state, "anna@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/memberships/3/signup")
        .insert_header(bearer(&member))
        .set_json(json!({
            "first_name": "Anna",
            "last_name": "Berg",
            "city": "Uppsala",
            "email": "anna@example.com",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/profile")
        .insert_header(bearer(&member))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["user"]["city"], "Uppsala");
    assert_eq!(body["data"]["membership"]["name"], "Senior Membership");
}

#[actix_web::test]
async fn test_malformed_json_is_a_problem_document() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");
}

#[actix_web::test]
async fn test_trainer_details_list_sessions_and_roles() {
    let state = test_state();
    let app = init_app!(state);
    let admin = admin_token(&state).await;
    let trainer = trainer_token(&state, "coach@example.com").await;
    let start = Utc::now() + Duration::days(3);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(bearer(&trainer))
        .set_json(json!({
            "title": "Power Yoga",
            "category": "Yoga",
            "max_participants": 12,
            "start_time": start,
            "end_time": start + Duration::minutes(45),
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let trainer_id = body["data"]["instructor_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/trainers/{}", trainer_id))
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"]["trainer"]["roles"][0], "Trainer");
    assert_eq!(body["data"]["sessions"][0]["title"], "Power Yoga");
    assert_eq!(
        body["data"]["available_roles"],
        json!(["Admin", "Member", "Trainer"])
    );
}

#[actix_web::test]
async fn test_login_ignores_email_case() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"email": "Anna@Example.com", "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"email": "anna@example.com", "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "ANNA@EXAMPLE.COM", "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_session_search_by_category() {
    let state = test_state();
    let app = init_app!(state);
    let trainer = trainer_token(&state, "coach@example.com").await;
    let member = member_token(&state, "anna@example.com").await;
    let start = Utc::now() + Duration::days(1);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(bearer(&trainer))
        .set_json(json!({
            "title": "Hill Sprints",
            "category": "Running",
            "max_participants": 8,
            "start_time": start,
            "end_time": start + Duration::hours(1),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/sessions/search?category=RUNNING")
        .insert_header(bearer(&member))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Hill Sprints");

    let req = test::TestRequest::get()
        .uri("/api/sessions/search?category=")
        .insert_header(bearer(&member))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/api/sessions?filter=Pilates")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/api/sessions/search?category=running")
        .insert_header(bearer(&trainer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_admin_update_rejects_bad_fields_and_taken_email() {
    let state = test_state();
    let app = init_app!(state);
    let admin = admin_token(&state).await;
    let member = state
        .accounts
        .register(gym_core::services::Registration {
            email: "anna@example.com".to_string(),
            password: "password123".to_string(),
            user_name: None,
        })
        .await
        .unwrap();
    let details = json!({
        "first_name": "Anna",
        "last_name": "Berg",
        "email": "anna@example.com",
        "address": "Storgatan 1",
        "city": "Uppsala",
        "country": "Sweden",
    });
    let uri = format!("/api/admin/users/{}", member.user.id);

    let mut blank = details.clone();
    blank["first_name"] = json!("");
    blank["email"] = json!("not-an-email");
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&admin))
        .set_json(&blank)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["errors"],
        json!(["First name is required", "Please enter a valid email address"])
    );

    let mut taken = details.clone();
    taken["email"] = json!("ADMIN@example.com");
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&admin))
        .set_json(&taken)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&admin))
        .set_json(&details)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Member details have been updated successfully.");
    assert_eq!(body["data"]["city"], "Uppsala");
}

#[actix_web::test]
async fn test_unparseable_path_and_query_are_problem_documents() {
    let state = test_state();
    let app = init_app!(state);
    let member = member_token(&state, "anna@example.com").await;

    let req = test::TestRequest::get()
        .uri("/api/bookings/not-a-uuid/status")
        .insert_header(bearer(&member))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");
    assert_eq!(body["status"], 400);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/trainers/{}/week?start=next-monday",
            uuid::Uuid::new_v4()
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");
}
