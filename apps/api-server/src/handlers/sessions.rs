//! Class schedule: browsing, details, and trainer scheduling.

use actix_web::{HttpResponse, web};
use chrono::{Datelike, Duration, Utc};
use uuid::Uuid;

use gym_core::domain::Role;
use gym_core::services::NewSession;
use gym_shared::ApiResponse;
use gym_shared::dto::{
    CategoryQuery, CreateSessionRequest, SessionDetailResponse, SessionListQuery,
    TrainerWeekResponse, WeekQuery,
};

use super::mapping;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/sessions?filter=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<SessionListQuery>,
) -> AppResult<HttpResponse> {
    let sessions = state.sessions.browse(query.filter.as_deref()).await?;
    let body: Vec<_> = sessions.iter().map(mapping::session).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/sessions/search?category=
pub async fn search(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<CategoryQuery>,
) -> AppResult<HttpResponse> {
    identity.require(Role::Member)?;

    let term = query.category.as_deref().unwrap_or_default();
    let sessions = state.sessions.search_by_category(term).await?;
    let body: Vec<_> = sessions.iter().map(mapping::session).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/sessions/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let details = state.sessions.get(id).await?;

    let is_booked = match identity.0 {
        Some(identity) => Some(state.bookings.is_booked(identity.user_id, id).await?),
        None => None,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(SessionDetailResponse {
        session: mapping::session(&details),
        is_booked,
    })))
}

/// POST /api/sessions
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateSessionRequest>,
) -> AppResult<HttpResponse> {
    identity.require_any(&[Role::Trainer, Role::Admin])?;
    let req = body.into_inner();

    let instructor_id = match req.instructor_id {
        Some(id) if identity.is_admin() => id,
        _ => identity.user_id,
    };

    let session = state
        .sessions
        .create(NewSession {
            title: req.title,
            description: req.description,
            category: req.category,
            max_participants: req.max_participants,
            instructor_id,
            start_time: req.start_time,
            end_time: req.end_time,
        })
        .await?;

    let details = state.sessions.get(session.id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        mapping::session(&details),
        "Session created.",
    )))
}

/// DELETE /api/sessions/{id}
///
/// Trainers may only remove their own classes; admins may remove any.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require_any(&[Role::Trainer, Role::Admin])?;

    let owner = if identity.is_admin() {
        None
    } else {
        Some(identity.user_id)
    };
    state.sessions.soft_delete(path.into_inner(), owner).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Session deleted.")))
}

/// GET /api/trainers/{id}/week?start=
///
/// Defaults to the week (Monday first) containing today.
pub async fn trainer_week(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<WeekQuery>,
) -> AppResult<HttpResponse> {
    let trainer_id = path.into_inner();
    let week_start = query.start.unwrap_or_else(|| {
        let today = Utc::now().date_naive();
        today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
    });

    let sessions = state.sessions.instructor_week(trainer_id, week_start).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(TrainerWeekResponse {
        trainer_id,
        week_start,
        sessions: sessions.iter().map(mapping::session).collect(),
    })))
}
