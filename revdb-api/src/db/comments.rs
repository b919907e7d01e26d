//! Comment queries
//!
//! Comments hang off a review; there is no uniqueness rule.

use revdb_common::db::models::Comment;
use sqlx::SqlitePool;

const COMMENT_SELECT: &str =
    "SELECT c.id, c.review_id, c.author_id, u.username AS author, c.text, c.pub_date \
     FROM comments c JOIN users u ON u.id = c.author_id";

/// True when the review exists and belongs to the given title
pub async fn review_in_title_exists(
    pool: &SqlitePool,
    title_id: i64,
    review_id: i64,
) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reviews WHERE id = ? AND title_id = ?)")
        .bind(review_id)
        .bind(title_id)
        .fetch_one(pool)
        .await
}

pub async fn count_comments(pool: &SqlitePool, review_id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = ?")
        .bind(review_id)
        .fetch_one(pool)
        .await
}

pub async fn list_comments(
    pool: &SqlitePool,
    review_id: i64,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<Comment>> {
    sqlx::query_as(&format!(
        "{} WHERE c.review_id = ? ORDER BY c.id LIMIT ? OFFSET ?",
        COMMENT_SELECT
    ))
    .bind(review_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_comment(
    pool: &SqlitePool,
    review_id: i64,
    comment_id: i64,
) -> sqlx::Result<Option<Comment>> {
    sqlx::query_as(&format!(
        "{} WHERE c.id = ? AND c.review_id = ?",
        COMMENT_SELECT
    ))
    .bind(comment_id)
    .bind(review_id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_comment(
    pool: &SqlitePool,
    review_id: i64,
    author_id: i64,
    text: &str,
) -> sqlx::Result<i64> {
    let result =
        sqlx::query("INSERT INTO comments (review_id, author_id, text) VALUES (?, ?, ?)")
            .bind(review_id)
            .bind(author_id)
            .bind(text)
            .execute(pool)
            .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_comment(
    pool: &SqlitePool,
    comment_id: i64,
    text: &str,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
        .bind(text)
        .bind(comment_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_comment(pool: &SqlitePool, comment_id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(comment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
