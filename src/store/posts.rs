use chrono::Utc;
use sqlx::sqlite::SqlitePool;

use crate::datatypes::{Post, PostFields};

const COLUMNS: &str = "id, title, body, created_at, updated_at";

/// Queries against the `posts` table. Each method issues a single statement.
#[derive(Debug, Clone)]
pub struct PostStore {
    pool: SqlitePool,
}

impl PostStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of posts ordered by id, filtered by a case-insensitive substring
    /// of either title or body.
    pub async fn page(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let limit = to_sql_int(limit);
        let offset = to_sql_int(offset);
        match search {
            Some(term) => {
                let sql = format!(
                    r"SELECT {COLUMNS} FROM posts
                      WHERE title LIKE ?1 ESCAPE '\' OR body LIKE ?1 ESCAPE '\'
                      ORDER BY id ASC LIMIT ?2 OFFSET ?3"
                );
                sqlx::query_as::<_, Post>(&sql)
                    .bind(like_pattern(term))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("SELECT {COLUMNS} FROM posts ORDER BY id ASC LIMIT ?1 OFFSET ?2");
                sqlx::query_as::<_, Post>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
            }
        }
    }

    pub async fn count(&self, search: Option<&str>) -> Result<u64, sqlx::Error> {
        let total: i64 = match search {
            Some(term) => {
                sqlx::query_scalar::<_, i64>(
                    r"SELECT COUNT(*) FROM posts
                      WHERE title LIKE ?1 ESCAPE '\' OR body LIKE ?1 ESCAPE '\'",
                )
                .bind(like_pattern(term))
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(total.max(0) as u64)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Post>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM posts WHERE id = ?1");
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn insert(&self, fields: &PostFields) -> Result<Post, sqlx::Error> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO posts (title, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(&fields.title)
            .bind(&fields.body)
            .bind(now)
            .fetch_one(&self.pool)
            .await
    }

    /// Replaces title and body. `None` when the row no longer exists.
    pub async fn update(&self, id: i64, fields: &PostFields) -> Result<Option<Post>, sqlx::Error> {
        let sql = format!(
            "UPDATE posts SET title = ?1, body = ?2, updated_at = ?3
             WHERE id = ?4 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(&fields.title)
            .bind(&fields.body)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Wraps `term` in `%` wildcards, escaping LIKE metacharacters so they match literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
