//! Schema creation for revdb
//!
//! All statements are idempotent (`CREATE TABLE IF NOT EXISTS`) and run
//! at every startup. Integer primary keys are SQLite rowids; they are
//! the public ids that appear in API paths.

use crate::Result;
use sqlx::SqlitePool;

/// Create all tables and indexes
pub async fn create_all_tables(pool: &SqlitePool) -> Result<()> {
    create_users_table(pool).await?;
    create_sessions_table(pool).await?;
    create_categories_table(pool).await?;
    create_genres_table(pool).await?;
    create_titles_table(pool).await?;
    create_title_genres_table(pool).await?;
    create_reviews_table(pool).await?;
    create_comments_table(pool).await?;
    Ok(())
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            photo TEXT,
            is_staff INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Session tokens presented as `Authorization: Token <token>`
async fn create_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_categories_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_titles_table(pool: &SqlitePool) -> Result<()> {
    // Deleting a category must not delete its titles: SET NULL
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS titles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            year INTEGER NOT NULL,
            description TEXT,
            photo TEXT,
            category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_titles_category ON titles(category_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_titles_name ON titles(name)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_title_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS title_genres (
            title_id INTEGER NOT NULL REFERENCES titles(id) ON DELETE CASCADE,
            genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
            PRIMARY KEY (title_id, genre_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_title_genres_genre ON title_genres(genre_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_reviews_table(pool: &SqlitePool) -> Result<()> {
    // UNIQUE(author_id, title_id) is the authoritative guard for the
    // one-review-per-author-per-title invariant; the handler-level
    // existence check only provides the friendlier error message
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title_id INTEGER NOT NULL REFERENCES titles(id) ON DELETE CASCADE,
            author_id INTEGER NOT NULL REFERENCES users(id),
            text TEXT NOT NULL,
            score INTEGER NOT NULL CHECK (score >= 1 AND score <= 10),
            pub_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (author_id, title_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_title ON reviews(title_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_comments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            review_id INTEGER NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
            author_id INTEGER NOT NULL REFERENCES users(id),
            text TEXT NOT NULL,
            pub_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_comments_review ON comments(review_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::db::init_memory_database;

    #[tokio::test]
    async fn duplicate_review_violates_unique_constraint() {
        let pool = init_memory_database().await.unwrap();

        sqlx::query(
            "INSERT INTO users (username, email, password_hash, password_salt) \
             VALUES ('u1', 'u1@example.com', 'h', 's')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO titles (name, year) VALUES ('t1', 2000)")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("INSERT INTO reviews (title_id, author_id, text, score) VALUES (1, 1, 'ok', 5)")
            .execute(&pool)
            .await
            .unwrap();

        let second =
            sqlx::query("INSERT INTO reviews (title_id, author_id, text, score) VALUES (1, 1, 'again', 7)")
                .execute(&pool)
                .await;

        assert!(second.is_err(), "second review for same (author, title) must fail");
    }

    #[tokio::test]
    async fn score_check_constraint_bounds() {
        let pool = init_memory_database().await.unwrap();

        sqlx::query(
            "INSERT INTO users (username, email, password_hash, password_salt) \
             VALUES ('u1', 'u1@example.com', 'h', 's')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO titles (name, year) VALUES ('t1', 2000)")
            .execute(&pool)
            .await
            .unwrap();

        let zero =
            sqlx::query("INSERT INTO reviews (title_id, author_id, text, score) VALUES (1, 1, 'x', 0)")
                .execute(&pool)
                .await;
        assert!(zero.is_err());

        let eleven =
            sqlx::query("INSERT INTO reviews (title_id, author_id, text, score) VALUES (1, 1, 'x', 11)")
                .execute(&pool)
                .await;
        assert!(eleven.is_err());
    }

    #[tokio::test]
    async fn title_delete_cascades_to_reviews_and_comments() {
        let pool = init_memory_database().await.unwrap();

        sqlx::query(
            "INSERT INTO users (username, email, password_hash, password_salt) \
             VALUES ('u1', 'u1@example.com', 'h', 's')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO titles (name, year) VALUES ('t1', 2000)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO reviews (title_id, author_id, text, score) VALUES (1, 1, 'r', 5)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO comments (review_id, author_id, text) VALUES (1, 1, 'c')")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM titles WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(&pool)
            .await
            .unwrap();
        let comments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(reviews, 0);
        assert_eq!(comments, 0);
    }

    #[tokio::test]
    async fn category_delete_sets_title_category_null() {
        let pool = init_memory_database().await.unwrap();

        sqlx::query("INSERT INTO categories (name, slug) VALUES ('Sci-Fi', 'sci-fi')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO titles (name, year, category_id) VALUES ('t1', 2000, 1)")
            .execute(&pool)
            .await
            .unwrap();

        sqlx::query("DELETE FROM categories WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let category: Option<i64> =
            sqlx::query_scalar("SELECT category_id FROM titles WHERE id = 1")
                .fetch_one(&pool)
                .await
                .unwrap();

        assert!(category.is_none(), "title must survive category deletion");
    }
}
