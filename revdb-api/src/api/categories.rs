//! Category endpoints
//!
//! Reads are open; mutation is admin-only (no owner clause grants
//! ordinary users write access to reference data).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use revdb_common::db::models::Category;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::pagination::{page_window, PAGE_SIZE};
use crate::{db, ApiError, ApiResult, AppState};

/// Query parameters for slugged reference-data lists
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Substring match on name
    pub search: Option<String>,
}

fn default_page() -> i64 {
    1
}

/// Paginated list envelope for {name, slug} entries
#[derive(Debug, Serialize)]
pub struct SluggedListResponse {
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub results: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSluggedRequest {
    pub name: String,
    pub slug: String,
}

pub(crate) fn validate_slugged(payload: &CreateSluggedRequest) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name", "name must not be empty"));
    }
    if payload.slug.is_empty()
        || !payload
            .slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiError::validation(
            "slug",
            "slug may only contain letters, digits, hyphens and underscores",
        ));
    }
    Ok(())
}

/// GET /api/v1/categories/
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<SluggedListResponse>> {
    let search = query.search.as_deref();
    let total_results = db::catalog::count_slugged(&state.db, "categories", search).await?;
    let window = page_window(total_results, query.page);

    let results =
        db::catalog::list_slugged(&state.db, "categories", search, PAGE_SIZE, window.offset)
            .await?;

    Ok(Json(SluggedListResponse {
        total_results,
        page: window.page,
        page_size: PAGE_SIZE,
        total_pages: window.total_pages,
        results,
    }))
}

/// POST /api/v1/categories/ (admin only)
pub async fn create_category(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateSluggedRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    caller.require_admin()?;
    validate_slugged(&payload)?;

    db::catalog::insert_slugged(&state.db, "categories", &payload.name, &payload.slug)
        .await
        .map_err(|err| {
            if db::is_unique_violation(&err) {
                ApiError::validation("slug", "a category with that slug already exists")
            } else {
                ApiError::Database(err)
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(Category {
            name: payload.name,
            slug: payload.slug,
        }),
    ))
}

/// DELETE /api/v1/categories/{slug}/ (admin only)
///
/// Titles in the category survive with their category cleared.
pub async fn delete_category(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;

    let removed = db::catalog::delete_slugged(&state.db, "categories", &slug).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!("category '{}' not found", slug)));
    }

    Ok(StatusCode::NO_CONTENT)
}
