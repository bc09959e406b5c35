//! Booking and cancelling places in sessions.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use gym_core::services::{BOOKING_CANCELLED, BOOKING_CONFIRMED};
use gym_shared::ApiResponse;
use gym_shared::dto::BookingStatusResponse;

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/bookings
pub async fn mine(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let booked = state.bookings.my_bookings(identity.user_id).await?;
    let body: Vec<_> = booked.iter().map(mapping::booked_session).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /api/bookings/{session_id}
pub async fn book(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let booking = state
        .bookings
        .book(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        mapping::booking(&booking),
        BOOKING_CONFIRMED,
    )))
}

/// DELETE /api/bookings/{session_id}
pub async fn cancel(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .bookings
        .cancel(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(BOOKING_CANCELLED)))
}

/// GET /api/bookings/{session_id}/status
pub async fn status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let session_id = path.into_inner();
    let is_booked = state.bookings.is_booked(identity.user_id, session_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(BookingStatusResponse {
        session_id,
        is_booked,
    })))
}
