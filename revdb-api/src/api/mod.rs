//! HTTP API handlers for revdb-api

pub mod auth_token;
pub mod categories;
pub mod comments;
pub mod genres;
pub mod health;
pub mod reviews;
pub mod titles;
pub mod users;

/// Timestamp rendering for review and comment payloads
pub(crate) fn format_pub_date(dt: chrono::NaiveDateTime) -> String {
    dt.format("%d.%m.%Y %H:%M").to_string()
}
