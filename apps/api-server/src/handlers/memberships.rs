//! Membership plans, checkout, and the member profile.

use actix_web::{HttpResponse, web};

use gym_core::services::SignupForm;
use gym_shared::ApiResponse;
use gym_shared::dto::{
    MembershipSummaryResponse, ProfileResponse, PurchaseRequest, SignupRequest, SummaryRequest,
};

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/memberships
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let plans = state.memberships.list_types().await?;
    let body: Vec<_> = plans.iter().map(mapping::membership).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/memberships/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let plan = state.memberships.get_type(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::membership(&plan))))
}

/// POST /api/memberships/{id}/summary
pub async fn summary(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<SummaryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let summary = state
        .memberships
        .summary(path.into_inner(), mapping::contact(req.contact), req.start_date)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(MembershipSummaryResponse {
        membership: mapping::membership(&summary.membership),
        contact: mapping::contact_request(&summary.contact),
        start_date: summary.start_date,
    })))
}

/// POST /api/memberships/{id}/purchase
pub async fn purchase(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<PurchaseRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let purchase = state
        .memberships
        .purchase(path.into_inner(), mapping::contact(req.contact), req.start_date)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        mapping::purchase(&purchase),
        "Thank you for your purchase!",
    )))
}

/// POST /api/memberships/{id}/signup
pub async fn sign_up(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let form = SignupForm {
        first_name: req.first_name,
        last_name: req.last_name,
        address: req.address,
        postal_code: req.postal_code,
        city: req.city,
        phone: req.phone,
        email: req.email,
    };

    let user = state
        .memberships
        .sign_up(identity.user_id, path.into_inner(), form)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        mapping::user(&user, &identity.roles),
        "Your membership is now active.",
    )))
}

/// GET /api/profile
pub async fn profile(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let profile = state.memberships.profile(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileResponse {
        user: mapping::user(&profile.user, &profile.roles),
        membership: profile.membership.as_ref().map(mapping::membership),
    })))
}
