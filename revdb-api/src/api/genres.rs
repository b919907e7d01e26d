//! Genre endpoints
//!
//! Same surface as categories: open reads, admin-only mutation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use revdb_common::db::models::Genre;
use serde::Serialize;

use crate::api::categories::{validate_slugged, CreateSluggedRequest, ListQuery};
use crate::auth::AuthUser;
use crate::pagination::{page_window, PAGE_SIZE};
use crate::{db, ApiError, ApiResult, AppState};

/// Paginated list envelope for genres
#[derive(Debug, Serialize)]
pub struct GenreListResponse {
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub results: Vec<Genre>,
}

/// GET /api/v1/genres/
pub async fn list_genres(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<GenreListResponse>> {
    let search = query.search.as_deref();
    let total_results = db::catalog::count_slugged(&state.db, "genres", search).await?;
    let window = page_window(total_results, query.page);

    let results =
        db::catalog::list_slugged(&state.db, "genres", search, PAGE_SIZE, window.offset).await?;

    Ok(Json(GenreListResponse {
        total_results,
        page: window.page,
        page_size: PAGE_SIZE,
        total_pages: window.total_pages,
        results,
    }))
}

/// POST /api/v1/genres/ (admin only)
pub async fn create_genre(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateSluggedRequest>,
) -> ApiResult<(StatusCode, Json<Genre>)> {
    caller.require_admin()?;
    validate_slugged(&payload)?;

    db::catalog::insert_slugged(&state.db, "genres", &payload.name, &payload.slug)
        .await
        .map_err(|err| {
            if db::is_unique_violation(&err) {
                ApiError::validation("slug", "a genre with that slug already exists")
            } else {
                ApiError::Database(err)
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(Genre {
            name: payload.name,
            slug: payload.slug,
        }),
    ))
}

/// DELETE /api/v1/genres/{slug}/ (admin only)
pub async fn delete_genre(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;

    let removed = db::catalog::delete_slugged(&state.db, "genres", &slug).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!("genre '{}' not found", slug)));
    }

    Ok(StatusCode::NO_CONTENT)
}
