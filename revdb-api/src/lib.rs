//! revdb-api library - review aggregation HTTP service
//!
//! Exposes the router and application state so integration tests can
//! drive the service without binding a socket.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod auth;
pub mod db;
pub mod error;
pub mod pagination;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Base URL prepended to stored photo paths in responses
    pub host_url: String,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, host_url: String) -> Self {
        Self { db, host_url }
    }
}

/// Build application router
///
/// Reads are open to anonymous callers; mutating handlers extract an
/// authenticated user themselves and apply the owner-or-admin policy.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    Router::new()
        .merge(api::health::health_routes())
        // Identity
        .route("/api/v1/users/", post(api::users::register))
        .route("/api/v1/users/me/", get(api::users::me))
        .route("/api/v1/users/set_username/", post(api::users::set_username))
        .route("/api/v1/users/set_email/", post(api::users::set_email))
        .route("/api/v1/users/set_password/", post(api::users::set_password))
        .route("/api/v1/auth/token/login/", post(api::auth_token::login))
        .route("/api/v1/auth/token/logout/", post(api::auth_token::logout))
        // Catalog
        .route(
            "/api/v1/categories/",
            get(api::categories::list_categories).post(api::categories::create_category),
        )
        .route(
            "/api/v1/categories/:slug/",
            delete(api::categories::delete_category),
        )
        .route(
            "/api/v1/genres/",
            get(api::genres::list_genres).post(api::genres::create_genre),
        )
        .route("/api/v1/genres/:slug/", delete(api::genres::delete_genre))
        .route(
            "/api/v1/titles/",
            get(api::titles::list_titles).post(api::titles::create_title),
        )
        .route(
            "/api/v1/titles/:title_id/",
            get(api::titles::get_title).delete(api::titles::delete_title),
        )
        // Reviews
        .route(
            "/api/v1/titles/:title_id/reviews/",
            get(api::reviews::list_reviews).post(api::reviews::create_review),
        )
        .route(
            "/api/v1/titles/:title_id/reviews/:review_id/",
            get(api::reviews::get_review)
                .patch(api::reviews::update_review)
                .delete(api::reviews::delete_review),
        )
        // Comments
        .route(
            "/api/v1/titles/:title_id/reviews/:review_id/comments/",
            get(api::comments::list_comments).post(api::comments::create_comment),
        )
        .route(
            "/api/v1/titles/:title_id/reviews/:review_id/comments/:comment_id/",
            get(api::comments::get_comment)
                .patch(api::comments::update_comment)
                .delete(api::comments::delete_comment),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
