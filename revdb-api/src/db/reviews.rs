//! Review queries
//!
//! Review rows carry the author username (joined in) so handlers can
//! shape responses without a second lookup.

use revdb_common::db::models::Review;
use sqlx::SqlitePool;

const REVIEW_SELECT: &str =
    "SELECT r.id, r.title_id, r.author_id, u.username AS author, r.text, r.score, r.pub_date \
     FROM reviews r JOIN users u ON u.id = r.author_id";

pub async fn count_reviews(pool: &SqlitePool, title_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = ?")
        .bind(title_id)
        .fetch_one(pool)
        .await
}

pub async fn list_reviews(
    pool: &SqlitePool,
    title_id: i64,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Review>> {
    sqlx::query_as(&format!(
        "{} WHERE r.title_id = ? ORDER BY r.id LIMIT ? OFFSET ?",
        REVIEW_SELECT
    ))
    .bind(title_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Fetch a review, requiring it to belong to the given title. A review
/// id that exists under another title is treated as absent.
pub async fn get_review(
    pool: &SqlitePool,
    title_id: i64,
    review_id: i64,
) -> sqlx::Result<Option<Review>> {
    sqlx::query_as(&format!(
        "{} WHERE r.id = ? AND r.title_id = ?",
        REVIEW_SELECT
    ))
    .bind(review_id)
    .bind(title_id)
    .fetch_optional(pool)
    .await
}

/// Fast-path duplicate check; the UNIQUE(author_id, title_id)
/// constraint remains the authoritative guard under races.
pub async fn review_exists_by_author(
    pool: &SqlitePool,
    title_id: i64,
    author_id: i64,
) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = ? AND author_id = ?)")
        .bind(title_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
}

pub async fn insert_review(
    pool: &SqlitePool,
    title_id: i64,
    author_id: i64,
    text: &str,
    score: i64,
) -> sqlx::Result<i64> {
    let result =
        sqlx::query("INSERT INTO reviews (title_id, author_id, text, score) VALUES (?, ?, ?, ?)")
            .bind(title_id)
            .bind(author_id)
            .bind(text)
            .bind(score)
            .execute(pool)
            .await?;

    Ok(result.last_insert_rowid())
}

/// Partial update of score and/or text. Author and title are immutable
/// after creation; absent fields keep their stored values.
pub async fn update_review(
    pool: &SqlitePool,
    review_id: i64,
    score: Option<i64>,
    text: Option<&str>,
) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE reviews SET score = COALESCE(?, score), text = COALESCE(?, text) WHERE id = ?",
    )
    .bind(score)
    .bind(text)
    .bind(review_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a review; its comments cascade
pub async fn delete_review(pool: &SqlitePool, review_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(review_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
