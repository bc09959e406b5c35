//! Registration and sign-in.

use actix_web::{HttpResponse, web};

use gym_core::services::{IssuedToken, Registration};
use gym_shared::dto::{AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest};

use super::mapping;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn auth_response(issued: IssuedToken) -> AuthResponse {
    AuthResponse {
        access_token: issued.access_token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
        user: mapping::user(&issued.user, &issued.roles),
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let issued = state
        .accounts
        .register(Registration {
            email: req.email,
            password: req.password,
            user_name: req.user_name,
        })
        .await?;

    Ok(HttpResponse::Created().json(auth_response(issued)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let issued = state.accounts.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(auth_response(issued)))
}

/// GET /api/auth/me
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(CurrentUserResponse {
        user_id: identity.user_id,
        email: identity.email,
        roles: mapping::role_names(&identity.roles),
    }))
}
