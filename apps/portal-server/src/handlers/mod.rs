//! HTTP handlers and route configuration.

mod assistant;
mod auth;
mod community;
mod health;
mod projects;

use actix_web::web;
use std::sync::Arc;

use academy_core::ports::RateLimiter;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes. Only the login gate is rate limited.
pub fn configure_routes(cfg: &mut web::ServiceConfig, limiter: Arc<dyn RateLimiter>) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .service(
                        web::resource("/login")
                            .wrap(RateLimitMiddleware::new(limiter))
                            .route(web::post().to(auth::login)),
                    )
                    .route("/logout", web::post().to(auth::logout))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/projects")
                    .route("", web::get().to(projects::list))
                    .route("", web::post().to(projects::create))
                    .route("/{id}", web::get().to(projects::open))
                    .route("/{id}", web::put().to(projects::update))
                    .route("/{id}", web::delete().to(projects::delete))
                    .route("/{id}/like", web::post().to(projects::like))
                    .route("/{id}/comments", web::post().to(projects::comment))
                    .route(
                        "/{id}/comments/{comment_id}/like",
                        web::post().to(projects::like_comment),
                    ),
            )
            .service(
                web::scope("/community")
                    .route("", web::get().to(community::board))
                    .route("", web::post().to(community::create))
                    .route("/{id}", web::put().to(community::update))
                    .route("/{id}", web::delete().to(community::delete))
                    .route("/{id}/vote", web::post().to(community::vote)),
            )
            .route("/assistant/explain", web::post().to(assistant::explain)),
    );
}
