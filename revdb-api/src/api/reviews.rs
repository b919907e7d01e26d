//! Review endpoints
//!
//! At most one review may exist per (author, title). The handler-level
//! existence check provides the friendly error; the UNIQUE(author_id,
//! title_id) constraint is the authoritative guard under concurrent
//! creates, and a constraint violation escaping the fast path maps to
//! the same validation error.
//!
//! The duplicate check is method-sensitive: it runs for create only,
//! never for partial updates. Updates cannot change author or title,
//! so no re-check is needed there.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use revdb_common::db::models::Review;
use serde::{Deserialize, Serialize};

use crate::api::format_pub_date;
use crate::auth::AuthUser;
use crate::pagination::{page_window, PAGE_SIZE};
use crate::{db, ApiError, ApiResult, AppState};

/// Review representation: author by username, title by id
#[derive(Debug, Serialize)]
pub struct ReviewPayload {
    pub id: i64,
    pub author: String,
    pub title: i64,
    pub score: i64,
    pub text: String,
    pub pub_date: String,
}

impl From<Review> for ReviewPayload {
    fn from(review: Review) -> Self {
        ReviewPayload {
            id: review.id,
            author: review.author,
            title: review.title_id,
            score: review.score,
            text: review.text,
            pub_date: format_pub_date(review.pub_date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub results: Vec<ReviewPayload>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

fn validate_score(score: i64) -> Result<(), ApiError> {
    if !(1..=10).contains(&score) {
        return Err(ApiError::validation(
            "score",
            "score must be an integer between 1 and 10",
        ));
    }
    Ok(())
}

fn validate_text(text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::validation("text", "text must not be empty"));
    }
    Ok(())
}

async fn require_title(state: &AppState, title_id: i64) -> Result<(), ApiError> {
    if !db::catalog::title_exists(&state.db, title_id).await? {
        return Err(ApiError::NotFound(format!("title {} not found", title_id)));
    }
    Ok(())
}

/// GET /titles/{title_id}/reviews/
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ReviewListResponse>> {
    require_title(&state, title_id).await?;

    let total_results = db::reviews::count_reviews(&state.db, title_id).await?;
    let window = page_window(total_results, query.page);

    let rows = db::reviews::list_reviews(&state.db, title_id, PAGE_SIZE, window.offset).await?;

    Ok(Json(ReviewListResponse {
        total_results,
        page: window.page,
        page_size: PAGE_SIZE,
        total_pages: window.total_pages,
        results: rows.into_iter().map(ReviewPayload::from).collect(),
    }))
}

/// GET /titles/{title_id}/reviews/{review_id}/
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> ApiResult<Json<ReviewPayload>> {
    require_title(&state, title_id).await?;

    let review = db::reviews::get_review(&state.db, title_id, review_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "review {} not found under title {}",
                review_id, title_id
            ))
        })?;

    Ok(Json(review.into()))
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub score: i64,
    pub text: String,
}

/// POST /titles/{title_id}/reviews/
///
/// Author and title are server-assigned; the client cannot set them.
pub async fn create_review(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(title_id): Path<i64>,
    Json(payload): Json<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<ReviewPayload>)> {
    require_title(&state, title_id).await?;
    validate_score(payload.score)?;
    validate_text(&payload.text)?;

    // Fast path for the friendlier message; the unique constraint
    // still guards the race below
    if db::reviews::review_exists_by_author(&state.db, title_id, caller.user.id).await? {
        return Err(duplicate_review_error());
    }

    let review_id = db::reviews::insert_review(
        &state.db,
        title_id,
        caller.user.id,
        &payload.text,
        payload.score,
    )
    .await
    .map_err(|err| {
        if db::is_unique_violation(&err) {
            duplicate_review_error()
        } else {
            ApiError::Database(err)
        }
    })?;

    let review = db::reviews::get_review(&state.db, title_id, review_id)
        .await?
        .ok_or_else(|| ApiError::Internal("review vanished after insert".into()))?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

fn duplicate_review_error() -> ApiError {
    ApiError::validation("title", "you have already left a review for this title")
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub score: Option<i64>,
    pub text: Option<String>,
}

/// PATCH /titles/{title_id}/reviews/{review_id}/
///
/// Partial update of score/text by the owner or an admin. The
/// duplicate-review check deliberately does not run here.
pub async fn update_review(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateReviewRequest>,
) -> ApiResult<Json<ReviewPayload>> {
    require_title(&state, title_id).await?;

    let review = db::reviews::get_review(&state.db, title_id, review_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "review {} not found under title {}",
                review_id, title_id
            ))
        })?;

    caller.require_owner_or_admin(review.author_id)?;

    if let Some(score) = payload.score {
        validate_score(score)?;
    }
    if let Some(text) = &payload.text {
        validate_text(text)?;
    }

    db::reviews::update_review(&state.db, review_id, payload.score, payload.text.as_deref())
        .await?;

    let updated = db::reviews::get_review(&state.db, title_id, review_id)
        .await?
        .ok_or_else(|| ApiError::Internal("review vanished after update".into()))?;

    Ok(Json(updated.into()))
}

/// DELETE /titles/{title_id}/reviews/{review_id}/
///
/// Owner or admin. The review's comments cascade.
pub async fn delete_review(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    require_title(&state, title_id).await?;

    let review = db::reviews::get_review(&state.db, title_id, review_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "review {} not found under title {}",
                review_id, title_id
            ))
        })?;

    caller.require_owner_or_admin(review.author_id)?;

    db::reviews::delete_review(&state.db, review_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
