//! Title endpoints
//!
//! The rating field is derived on read as the mean of review scores;
//! it is never stored. Lists are ordered by descending rating with
//! unreviewed titles last and ascending id as the tie-break, so the
//! ordering is total and deterministic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use revdb_common::db::models::{Category, Genre};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::AuthUser;
use crate::db::catalog::{self, TitleFilters, TitleWithRating};
use crate::pagination::{page_window, PAGE_SIZE};
use crate::{db, ApiError, ApiResult, AppState};

/// Query parameters for the title list
#[derive(Debug, Deserialize)]
pub struct TitleListQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
    /// Category slug, exact match
    pub category: Option<String>,
    /// Genre slug, exact match
    pub genre: Option<String>,
    /// Name substring
    pub name: Option<String>,
    /// Release year, exact match
    pub year: Option<i64>,
}

fn default_page() -> i64 {
    1
}

/// Title representation: category and genres are embedded, the photo
/// is an absolute URL, the rating is null when no reviews exist
#[derive(Debug, Serialize)]
pub struct TitlePayload {
    pub id: i64,
    pub name: String,
    pub year: i64,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub genre: Vec<Genre>,
    pub category: Option<Category>,
    pub rating: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct TitleListResponse {
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub results: Vec<TitlePayload>,
}

async fn shape_title(
    pool: &SqlitePool,
    host_url: &str,
    title: TitleWithRating,
) -> ApiResult<TitlePayload> {
    let category = match title.category_id {
        Some(id) => catalog::category_by_id(pool, id).await?,
        None => None,
    };
    let genre = catalog::genres_of_title(pool, title.id).await?;

    Ok(TitlePayload {
        id: title.id,
        name: title.name,
        year: title.year,
        description: title.description,
        photo: title.photo.map(|p| format!("{}{}", host_url, p)),
        genre,
        category,
        rating: title.rating,
    })
}

/// GET /api/v1/titles/
pub async fn list_titles(
    State(state): State<AppState>,
    Query(query): Query<TitleListQuery>,
) -> ApiResult<Json<TitleListResponse>> {
    let filters = TitleFilters {
        category: query.category,
        genre: query.genre,
        name: query.name,
        year: query.year,
    };

    let total_results = catalog::count_titles(&state.db, &filters).await?;
    let window = page_window(total_results, query.page);

    let rows = catalog::list_titles(&state.db, &filters, PAGE_SIZE, window.offset).await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        results.push(shape_title(&state.db, &state.host_url, row).await?);
    }

    Ok(Json(TitleListResponse {
        total_results,
        page: window.page,
        page_size: PAGE_SIZE,
        total_pages: window.total_pages,
        results,
    }))
}

/// GET /api/v1/titles/{id}/
pub async fn get_title(
    State(state): State<AppState>,
    Path(title_id): Path<i64>,
) -> ApiResult<Json<TitlePayload>> {
    let title = catalog::get_title(&state.db, title_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("title {} not found", title_id)))?;

    Ok(Json(shape_title(&state.db, &state.host_url, title).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i64,
    pub description: Option<String>,
    /// Category slug
    pub category: Option<String>,
    /// Genre slugs
    #[serde(default)]
    pub genre: Vec<String>,
}

/// POST /api/v1/titles/ (admin only)
pub async fn create_title(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateTitleRequest>,
) -> ApiResult<(StatusCode, Json<TitlePayload>)> {
    caller.require_admin()?;

    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name", "name must not be empty"));
    }

    let category_id = match &payload.category {
        Some(slug) => Some(
            catalog::find_category_id(&state.db, slug)
                .await?
                .ok_or_else(|| {
                    ApiError::validation("category", format!("unknown category slug '{}'", slug))
                })?,
        ),
        None => None,
    };

    let mut genre_ids = Vec::with_capacity(payload.genre.len());
    for slug in &payload.genre {
        let id = catalog::find_genre_id(&state.db, slug).await?.ok_or_else(|| {
            ApiError::validation("genre", format!("unknown genre slug '{}'", slug))
        })?;
        genre_ids.push(id);
    }

    let title_id = catalog::insert_title(
        &state.db,
        &payload.name,
        payload.year,
        payload.description.as_deref(),
        category_id,
    )
    .await?;

    for genre_id in genre_ids {
        catalog::add_title_genre(&state.db, title_id, genre_id).await?;
    }

    info!("Created title '{}' (id {})", payload.name, title_id);

    let title = catalog::get_title(&state.db, title_id)
        .await?
        .ok_or_else(|| ApiError::Internal("title vanished after insert".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(shape_title(&state.db, &state.host_url, title).await?),
    ))
}

/// DELETE /api/v1/titles/{id}/ (admin only)
///
/// Cascades to the title's reviews and, transitively, their comments.
pub async fn delete_title(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(title_id): Path<i64>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;

    let removed = db::catalog::delete_title(&state.db, title_id).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!("title {} not found", title_id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
