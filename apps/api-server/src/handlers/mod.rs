//! HTTP handlers and route configuration.

mod account;
mod admin;
mod bookings;
mod health;
mod mapping;
mod memberships;
mod sessions;

#[cfg(test)]
mod tests;

use std::fmt;

use actix_web::{HttpResponse, error::InternalError, web};
use gym_shared::ErrorResponse;

/// Render an extractor failure as a 400 problem document.
fn bad_request<E>(err: E) -> actix_web::Error
where
    E: fmt::Debug + fmt::Display + 'static,
{
    let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Malformed JSON bodies become problem documents like every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| bad_request(err))
}

/// Unparseable path segments, e.g. an id that is not a UUID.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| bad_request(err))
}

/// Unparseable query strings, e.g. `?start=` that is not a date.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| bad_request(err))
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(account::register))
                    .route("/login", web::post().to(account::login))
                    .route("/me", web::get().to(account::me)),
            )
            .service(
                web::scope("/sessions")
                    .route("", web::get().to(sessions::list))
                    .route("", web::post().to(sessions::create))
                    .route("/search", web::get().to(sessions::search))
                    .route("/{id}", web::get().to(sessions::get))
                    .route("/{id}", web::delete().to(sessions::delete)),
            )
            .route("/trainers/{id}/week", web::get().to(sessions::trainer_week))
            .service(
                web::scope("/bookings")
                    .route("", web::get().to(bookings::mine))
                    .route("/{session_id}", web::post().to(bookings::book))
                    .route("/{session_id}", web::delete().to(bookings::cancel))
                    .route("/{session_id}/status", web::get().to(bookings::status)),
            )
            .service(
                web::scope("/memberships")
                    .route("", web::get().to(memberships::list))
                    .route("/{id}", web::get().to(memberships::get))
                    .route("/{id}/summary", web::post().to(memberships::summary))
                    .route("/{id}/purchase", web::post().to(memberships::purchase))
                    .route("/{id}/signup", web::post().to(memberships::sign_up)),
            )
            .route("/profile", web::get().to(memberships::profile))
            .service(
                web::scope("/admin")
                    .route("/dashboard", web::get().to(admin::dashboard))
                    .route("/users/{id}", web::get().to(admin::user_details))
                    .route("/users/{id}", web::put().to(admin::update_user))
                    .route("/users/{id}", web::delete().to(admin::delete_user))
                    .route("/users/{id}/lock", web::post().to(admin::lock))
                    .route("/users/{id}/unlock", web::post().to(admin::unlock))
                    .route("/users/{id}/role", web::post().to(admin::change_role))
                    .route("/trainers/{id}", web::get().to(admin::trainer_details)),
            ),
    );
}
