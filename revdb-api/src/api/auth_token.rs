//! Token login/logout endpoints

use axum::{extract::State, http::StatusCode, Json};
use revdb_common::auth::{generate_token, verify_password};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::{db, ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub auth_token: String,
}

/// POST /api/v1/auth/token/login/
///
/// Bad credentials are a validation failure (400), not a 401: no
/// protected resource was requested.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = db::users::find_by_username(&state.db, &payload.username)
        .await?
        .filter(|u| verify_password(&payload.password, &u.password_salt, &u.password_hash))
        .ok_or_else(|| {
            ApiError::validation("credentials", "unable to log in with provided credentials")
        })?;

    let token = generate_token();
    db::users::create_session(&state.db, user.id, &token).await?;

    info!("User '{}' logged in", user.username);

    Ok(Json(LoginResponse { auth_token: token }))
}

/// POST /api/v1/auth/token/logout/
///
/// Deletes the presented session token.
pub async fn logout(State(state): State<AppState>, caller: AuthUser) -> ApiResult<StatusCode> {
    db::users::delete_session(&state.db, &caller.token).await?;
    Ok(StatusCode::NO_CONTENT)
}
