//! User account endpoints: registration and self-service updates

use axum::{extract::State, http::StatusCode, Json};
use revdb_common::auth::{generate_salt, hash_password, verify_password};
use revdb_common::db::models::User;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::{db, ApiError, ApiResult, AppState};

/// Public user representation
#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub photo: Option<String>,
}

impl From<User> for UserPayload {
    fn from(user: User) -> Self {
        UserPayload {
            id: user.id,
            username: user.username,
            email: user.email,
            photo: user.photo,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// POST /api/v1/users/
///
/// Open registration. Username and email must be unique.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserPayload>)> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("username", "username must not be empty"));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(ApiError::validation("email", "enter a valid email address"));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::validation(
            "password",
            "password must be at least 8 characters",
        ));
    }

    let salt = generate_salt();
    let hash = hash_password(&payload.password, &salt);

    let user_id =
        match db::users::create_user(&state.db, &payload.username, &payload.email, &hash, &salt)
            .await
        {
            Ok(id) => id,
            Err(err) => {
                return Err(match db::unique_violation_column(&err).as_deref() {
                    Some("users.username") => {
                        ApiError::validation("username", "a user with that username already exists")
                    }
                    Some("users.email") => {
                        ApiError::validation("email", "a user with that email already exists")
                    }
                    _ => ApiError::Database(err),
                });
            }
        };

    info!("Registered user '{}' (id {})", payload.username, user_id);

    let user = db::users::get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Internal("user vanished after insert".into()))?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/me/
pub async fn me(caller: AuthUser) -> Json<UserPayload> {
    Json(caller.user.into())
}

#[derive(Debug, Deserialize)]
pub struct SetUsernameRequest {
    pub new_username: String,
}

/// POST /api/v1/users/set_username/
pub async fn set_username(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<SetUsernameRequest>,
) -> ApiResult<StatusCode> {
    if payload.new_username.trim().is_empty() {
        return Err(ApiError::validation(
            "new_username",
            "username must not be empty",
        ));
    }

    db::users::update_username(&state.db, caller.user.id, &payload.new_username)
        .await
        .map_err(|err| {
            if db::is_unique_violation(&err) {
                ApiError::validation("new_username", "a user with that username already exists")
            } else {
                ApiError::Database(err)
            }
        })?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SetEmailRequest {
    pub new_email: String,
}

/// POST /api/v1/users/set_email/
///
/// Rejects a new email equal to the current one (case-sensitive exact
/// match).
pub async fn set_email(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<SetEmailRequest>,
) -> ApiResult<StatusCode> {
    if payload.new_email.trim().is_empty() || !payload.new_email.contains('@') {
        return Err(ApiError::validation("new_email", "enter a valid email address"));
    }
    if payload.new_email == caller.user.email {
        return Err(ApiError::validation(
            "new_email",
            "this is already the email on the account",
        ));
    }

    db::users::update_email(&state.db, caller.user.id, &payload.new_email)
        .await
        .map_err(|err| {
            if db::is_unique_violation(&err) {
                ApiError::validation("new_email", "a user with that email already exists")
            } else {
                ApiError::Database(err)
            }
        })?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/v1/users/set_password/
///
/// Requires the current password to verify.
pub async fn set_password(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<SetPasswordRequest>,
) -> ApiResult<StatusCode> {
    if !verify_password(
        &payload.current_password,
        &caller.user.password_salt,
        &caller.user.password_hash,
    ) {
        return Err(ApiError::validation("current_password", "invalid password"));
    }
    if payload.new_password.len() < 8 {
        return Err(ApiError::validation(
            "new_password",
            "password must be at least 8 characters",
        ));
    }

    let salt = generate_salt();
    let hash = hash_password(&payload.new_password, &salt);
    db::users::update_password(&state.db, caller.user.id, &hash, &salt).await?;

    Ok(StatusCode::NO_CONTENT)
}
