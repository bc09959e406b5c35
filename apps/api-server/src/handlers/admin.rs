//! Administration of member and trainer accounts. Admin role only.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use gym_core::domain::Role;
use gym_core::services::UserDetailsUpdate;
use gym_shared::ApiResponse;
use gym_shared::dto::{
    ChangeRoleRequest, DashboardQuery, DashboardResponse, TrainerDetailsResponse,
    UpdateUserRequest,
};

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// "trainer" or "member", for confirmation messages.
async fn account_kind(state: &AppState, id: Uuid) -> AppResult<&'static str> {
    let overview = state.admin.details(id).await?;
    Ok(if overview.roles.contains(&Role::Trainer) {
        "trainer"
    } else {
        "member"
    })
}

/// GET /api/admin/dashboard?search=
pub async fn dashboard(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<DashboardQuery>,
) -> AppResult<HttpResponse> {
    identity.require(Role::Admin)?;

    let dashboard = state.admin.dashboard(query.search.as_deref()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(DashboardResponse {
        total_users: dashboard.total_users,
        members: dashboard.members,
        trainers: dashboard.trainers,
        search_term: dashboard.search_term,
        users: dashboard.users.iter().map(mapping::admin_user).collect(),
    })))
}

/// GET /api/admin/users/{id}
pub async fn user_details(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require(Role::Admin)?;

    let overview = state.admin.details(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::admin_user(&overview))))
}

/// GET /api/admin/trainers/{id}
pub async fn trainer_details(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require(Role::Admin)?;

    let details = state.admin.trainer_details(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(TrainerDetailsResponse {
        trainer: mapping::admin_user(&details.trainer),
        sessions: details.sessions.iter().map(mapping::session_summary).collect(),
        available_roles: mapping::role_names(&Role::ALL),
    })))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    identity.require(Role::Admin)?;
    let id = path.into_inner();
    let req = body.into_inner();

    let kind = account_kind(&state, id).await?;
    state
        .admin
        .update_details(
            id,
            UserDetailsUpdate {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                address: req.address,
                city: req.city,
                country: req.country,
            },
        )
        .await?;

    let overview = state.admin.details(id).await?;
    let message = if kind == "trainer" {
        "Trainer details have been updated successfully."
    } else {
        "Member details have been updated successfully."
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        mapping::admin_user(&overview),
        message,
    )))
}

/// POST /api/admin/users/{id}/lock
pub async fn lock(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require(Role::Admin)?;
    let id = path.into_inner();

    let kind = account_kind(&state, id).await?;
    state.admin.lock(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(format!(
        "The {} account has been locked.",
        kind
    ))))
}

/// POST /api/admin/users/{id}/unlock
pub async fn unlock(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require(Role::Admin)?;
    let id = path.into_inner();

    let kind = account_kind(&state, id).await?;
    state.admin.unlock(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(format!(
        "The {} account has been unlocked.",
        kind
    ))))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require(Role::Admin)?;
    let id = path.into_inner();

    let kind = account_kind(&state, id).await?;
    state.admin.soft_delete(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(format!(
        "The {} account has been deleted.",
        kind
    ))))
}

/// POST /api/admin/users/{id}/role
pub async fn change_role(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ChangeRoleRequest>,
) -> AppResult<HttpResponse> {
    identity.require(Role::Admin)?;

    let role = state
        .admin
        .change_role(path.into_inner(), &body.role)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(format!(
        "Role has been changed to '{}'.",
        role
    ))))
}
