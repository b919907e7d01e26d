//! Comment endpoints
//!
//! Same containment and permission pattern as reviews, one level
//! deeper (title -> review -> comment), without a uniqueness rule.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use revdb_common::db::models::Comment;
use serde::{Deserialize, Serialize};

use crate::api::format_pub_date;
use crate::api::reviews::PageQuery;
use crate::auth::AuthUser;
use crate::pagination::{page_window, PAGE_SIZE};
use crate::{db, ApiError, ApiResult, AppState};

/// Comment representation: author by username, review by id
#[derive(Debug, Serialize)]
pub struct CommentPayload {
    pub id: i64,
    pub author: String,
    pub review: i64,
    pub text: String,
    pub pub_date: String,
}

impl From<Comment> for CommentPayload {
    fn from(comment: Comment) -> Self {
        CommentPayload {
            id: comment.id,
            author: comment.author,
            review: comment.review_id,
            text: comment.text,
            pub_date: format_pub_date(comment.pub_date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub total_results: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub results: Vec<CommentPayload>,
}

/// Resolve the (title, review) containment chain or fail with 404
async fn require_review(state: &AppState, title_id: i64, review_id: i64) -> Result<(), ApiError> {
    if !db::comments::review_in_title_exists(&state.db, title_id, review_id).await? {
        return Err(ApiError::NotFound(format!(
            "review {} not found under title {}",
            review_id, title_id
        )));
    }
    Ok(())
}

fn validate_text(text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::validation("text", "text must not be empty"));
    }
    Ok(())
}

/// GET /titles/{title_id}/reviews/{review_id}/comments/
pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<CommentListResponse>> {
    require_review(&state, title_id, review_id).await?;

    let total_results = db::comments::count_comments(&state.db, review_id).await?;
    let window = page_window(total_results, query.page);

    let rows = db::comments::list_comments(&state.db, review_id, PAGE_SIZE, window.offset).await?;

    Ok(Json(CommentListResponse {
        total_results,
        page: window.page,
        page_size: PAGE_SIZE,
        total_pages: window.total_pages,
        results: rows.into_iter().map(CommentPayload::from).collect(),
    }))
}

/// GET .../comments/{comment_id}/
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> ApiResult<Json<CommentPayload>> {
    require_review(&state, title_id, review_id).await?;

    let comment = db::comments::get_comment(&state.db, review_id, comment_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "comment {} not found under review {}",
                comment_id, review_id
            ))
        })?;

    Ok(Json(comment.into()))
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// POST .../comments/
///
/// Any authenticated user may comment; author and review are
/// server-assigned.
pub async fn create_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentPayload>)> {
    require_review(&state, title_id, review_id).await?;
    validate_text(&payload.text)?;

    let comment_id =
        db::comments::insert_comment(&state.db, review_id, caller.user.id, &payload.text).await?;

    let comment = db::comments::get_comment(&state.db, review_id, comment_id)
        .await?
        .ok_or_else(|| ApiError::Internal("comment vanished after insert".into()))?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}

/// PATCH .../comments/{comment_id}/ (owner or admin)
pub async fn update_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
    Json(payload): Json<UpdateCommentRequest>,
) -> ApiResult<Json<CommentPayload>> {
    require_review(&state, title_id, review_id).await?;

    let comment = db::comments::get_comment(&state.db, review_id, comment_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "comment {} not found under review {}",
                comment_id, review_id
            ))
        })?;

    caller.require_owner_or_admin(comment.author_id)?;
    validate_text(&payload.text)?;

    db::comments::update_comment(&state.db, comment_id, &payload.text).await?;

    let updated = db::comments::get_comment(&state.db, review_id, comment_id)
        .await?
        .ok_or_else(|| ApiError::Internal("comment vanished after update".into()))?;

    Ok(Json(updated.into()))
}

/// DELETE .../comments/{comment_id}/ (owner or admin)
pub async fn delete_comment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> ApiResult<StatusCode> {
    require_review(&state, title_id, review_id).await?;

    let comment = db::comments::get_comment(&state.db, review_id, comment_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "comment {} not found under review {}",
                comment_id, review_id
            ))
        })?;

    caller.require_owner_or_admin(comment.author_id)?;

    db::comments::delete_comment(&state.db, comment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
