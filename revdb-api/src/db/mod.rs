//! Query layer for revdb-api
//!
//! One module per resource family. Functions return `sqlx::Result` so
//! handlers can inspect constraint violations before converting to
//! `ApiError`.

pub mod catalog;
pub mod comments;
pub mod reviews;
pub mod users;

/// True when the error is a UNIQUE constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// The violated column path (e.g. "users.username"), when available
pub fn unique_violation_column(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            // SQLite message: "UNIQUE constraint failed: users.username"
            db_err
                .message()
                .rsplit(": ")
                .next()
                .map(|s| s.trim().to_string())
        }
        _ => None,
    }
}
