//! User and session queries

use revdb_common::db::models::User;
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, password_salt, photo, is_staff";

/// Insert a new user, returning its id
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
    password_salt: &str,
) -> sqlx::Result<i64> {
    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, password_salt) VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(password_salt)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_user(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
    sqlx::query_as(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as(&format!(
        "SELECT {} FROM users WHERE username = ?",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Resolve a session token to its user
pub async fn find_user_by_token(pool: &SqlitePool, token: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as(
        "SELECT u.id, u.username, u.email, u.password_hash, u.password_salt, u.photo, u.is_staff \
         FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn update_username(pool: &SqlitePool, id: i64, username: &str) -> sqlx::Result<()> {
    sqlx::query("UPDATE users SET username = ? WHERE id = ?")
        .bind(username)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_email(pool: &SqlitePool, id: i64, email: &str) -> sqlx::Result<()> {
    sqlx::query("UPDATE users SET email = ? WHERE id = ?")
        .bind(email)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_password(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
    password_salt: &str,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE users SET password_hash = ?, password_salt = ? WHERE id = ?")
        .bind(password_hash)
        .bind(password_salt)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Grant the staff role to an existing user, returning the number of
/// rows changed (0 when the username is unknown)
pub async fn promote_to_staff(pool: &SqlitePool, username: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE users SET is_staff = 1 WHERE username = ?")
        .bind(username)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn create_session(pool: &SqlitePool, user_id: i64, token: &str) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES (?, ?)")
        .bind(token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_session(pool: &SqlitePool, token: &str) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}
