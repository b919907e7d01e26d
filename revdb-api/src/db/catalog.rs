//! Category, genre, and title queries
//!
//! Categories and genres share a shape ({name, slug}, unique slug), so
//! their queries are written once over the table name. Table names are
//! compile-time literals from the callers, never user input.

use revdb_common::db::models::{Category, Genre};
use sqlx::{FromRow, SqlitePool};

// ---------------------------------------------------------------
// Slugged reference data (categories, genres)
// ---------------------------------------------------------------

pub async fn count_slugged(
    pool: &SqlitePool,
    table: &str,
    search: Option<&str>,
) -> sqlx::Result<i64> {
    let sql = match search {
        Some(_) => format!("SELECT COUNT(*) FROM {} WHERE name LIKE ?", table),
        None => format!("SELECT COUNT(*) FROM {}", table),
    };

    let mut query = sqlx::query_scalar(&sql);
    if let Some(term) = search {
        query = query.bind(format!("%{}%", term));
    }
    query.fetch_one(pool).await
}

pub async fn list_slugged<T>(
    pool: &SqlitePool,
    table: &str,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<T>>
where
    T: for<'r> FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
{
    let sql = match search {
        Some(_) => format!(
            "SELECT name, slug FROM {} WHERE name LIKE ? ORDER BY slug LIMIT ? OFFSET ?",
            table
        ),
        None => format!(
            "SELECT name, slug FROM {} ORDER BY slug LIMIT ? OFFSET ?",
            table
        ),
    };

    let mut query = sqlx::query_as(&sql);
    if let Some(term) = search {
        query = query.bind(format!("%{}%", term));
    }
    query.bind(limit).bind(offset).fetch_all(pool).await
}

pub async fn insert_slugged(
    pool: &SqlitePool,
    table: &str,
    name: &str,
    slug: &str,
) -> sqlx::Result<()> {
    sqlx::query(&format!("INSERT INTO {} (name, slug) VALUES (?, ?)", table))
        .bind(name)
        .bind(slug)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete by slug, returning the number of rows removed
pub async fn delete_slugged(pool: &SqlitePool, table: &str, slug: &str) -> sqlx::Result<u64> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE slug = ?", table))
        .bind(slug)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn find_category_id(pool: &SqlitePool, slug: &str) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar("SELECT id FROM categories WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_genre_id(pool: &SqlitePool, slug: &str) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar("SELECT id FROM genres WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn category_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Category>> {
    sqlx::query_as("SELECT name, slug FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn genres_of_title(pool: &SqlitePool, title_id: i64) -> sqlx::Result<Vec<Genre>> {
    sqlx::query_as(
        "SELECT g.name, g.slug FROM genres g \
         JOIN title_genres tg ON tg.genre_id = g.id \
         WHERE tg.title_id = ? ORDER BY g.slug",
    )
    .bind(title_id)
    .fetch_all(pool)
    .await
}

// ---------------------------------------------------------------
// Titles
// ---------------------------------------------------------------

/// Optional filters for the title list endpoint
#[derive(Debug, Default)]
pub struct TitleFilters {
    /// Category slug, exact
    pub category: Option<String>,
    /// Genre slug, exact
    pub genre: Option<String>,
    /// Name substring
    pub name: Option<String>,
    /// Release year, exact
    pub year: Option<i64>,
}

/// Title row with its derived rating (NULL when no reviews exist)
#[derive(Debug, Clone, FromRow)]
pub struct TitleWithRating {
    pub id: i64,
    pub name: String,
    pub year: i64,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub category_id: Option<i64>,
    pub rating: Option<f64>,
}

fn filter_clause(filters: &TitleFilters) -> String {
    let mut conds: Vec<&str> = Vec::new();
    if filters.category.is_some() {
        conds.push("t.category_id IN (SELECT id FROM categories WHERE slug = ?)");
    }
    if filters.genre.is_some() {
        conds.push(
            "EXISTS (SELECT 1 FROM title_genres tg JOIN genres g ON g.id = tg.genre_id \
             WHERE tg.title_id = t.id AND g.slug = ?)",
        );
    }
    if filters.name.is_some() {
        conds.push("t.name LIKE ?");
    }
    if filters.year.is_some() {
        conds.push("t.year = ?");
    }

    if conds.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conds.join(" AND "))
    }
}

fn bind_filters<'q, O>(
    mut query: sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    filters: &'q TitleFilters,
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
    if let Some(category) = &filters.category {
        query = query.bind(category);
    }
    if let Some(genre) = &filters.genre {
        query = query.bind(genre);
    }
    if let Some(name) = &filters.name {
        query = query.bind(format!("%{}%", name));
    }
    if let Some(year) = filters.year {
        query = query.bind(year);
    }
    query
}

pub async fn count_titles(pool: &SqlitePool, filters: &TitleFilters) -> sqlx::Result<i64> {
    let sql = format!("SELECT COUNT(*) AS n FROM titles t{}", filter_clause(filters));

    #[derive(FromRow)]
    struct Count {
        n: i64,
    }

    let query = sqlx::query_as::<_, Count>(&sql);
    let row = bind_filters(query, filters).fetch_one(pool).await?;
    Ok(row.n)
}

/// List titles ordered by descending rating. Titles without reviews
/// sort last; ascending id breaks ties so the order is total.
pub async fn list_titles(
    pool: &SqlitePool,
    filters: &TitleFilters,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<TitleWithRating>> {
    let sql = format!(
        "SELECT t.id, t.name, t.year, t.description, t.photo, t.category_id, \
                AVG(r.score) AS rating \
         FROM titles t LEFT JOIN reviews r ON r.title_id = t.id\
         {} \
         GROUP BY t.id \
         ORDER BY (rating IS NULL), rating DESC, t.id \
         LIMIT ? OFFSET ?",
        filter_clause(filters)
    );

    let query = sqlx::query_as::<_, TitleWithRating>(&sql);
    bind_filters(query, filters)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

pub async fn get_title(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<TitleWithRating>> {
    sqlx::query_as(
        "SELECT t.id, t.name, t.year, t.description, t.photo, t.category_id, \
                AVG(r.score) AS rating \
         FROM titles t LEFT JOIN reviews r ON r.title_id = t.id \
         WHERE t.id = ? \
         GROUP BY t.id",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn title_exists(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM titles WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn insert_title(
    pool: &SqlitePool,
    name: &str,
    year: i64,
    description: Option<&str>,
    category_id: Option<i64>,
) -> sqlx::Result<i64> {
    let result = sqlx::query(
        "INSERT INTO titles (name, year, description, category_id) VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(year)
    .bind(description)
    .bind(category_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn add_title_genre(
    pool: &SqlitePool,
    title_id: i64,
    genre_id: i64,
) -> sqlx::Result<()> {
    sqlx::query("INSERT OR IGNORE INTO title_genres (title_id, genre_id) VALUES (?, ?)")
        .bind(title_id)
        .bind(genre_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a title, returning the number of rows removed. Reviews and
/// their comments cascade.
pub async fn delete_title(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM titles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
