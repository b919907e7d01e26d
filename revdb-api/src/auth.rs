//! Token authentication extractor
//!
//! Clients present `Authorization: Token <token>` where the token is
//! an opaque UUIDv4 issued at login and stored in the sessions table.
//! Handlers that require a caller add an `AuthUser` parameter; read
//! handlers simply omit it, which keeps reads open to anonymous
//! callers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use revdb_common::db::models::User;

use crate::{db, ApiError, AppState};

/// Authenticated caller extracted from the Authorization header
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    /// The presented session token (needed by logout)
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthenticated("Authentication credentials were not provided".into())
            })?;

        let token = header.strip_prefix("Token ").ok_or_else(|| {
            ApiError::Unauthenticated("Invalid authorization header format".into())
        })?;

        let user = db::users::find_user_by_token(&state.db, token)
            .await?
            .ok_or_else(|| ApiError::Unauthenticated("Invalid token".into()))?;

        Ok(AuthUser {
            user,
            token: token.to_string(),
        })
    }
}

impl AuthUser {
    /// Fail with Forbidden unless the caller authored the resource or
    /// holds the staff role
    pub fn require_owner_or_admin(&self, resource_author_id: i64) -> Result<(), ApiError> {
        if self.user.may_mutate(resource_author_id) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You do not have permission to perform this action".into(),
            ))
        }
    }

    /// Fail with Forbidden unless the caller holds the staff role
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.user.is_staff {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "You do not have permission to perform this action".into(),
            ))
        }
    }
}
