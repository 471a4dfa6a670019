pub mod posts;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::ServerArgs;

pub use posts::PostStore;

/// `AUTOINCREMENT` keeps ids of deleted rows from being handed out again.
const CREATE_POSTS: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title VARCHAR(255) NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

pub async fn connect(args: &ServerArgs) -> eyre::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&args.database_url)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(Duration::from_secs(8))
        .connect_with(options)
        .await?;
    info!(url = %args.database_url, max_connections = args.max_connections, "Connected to database");
    Ok(pool)
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_POSTS).execute(pool).await?;
    Ok(())
}

/// A private in-memory database. One connection only: every new connection to
/// `sqlite::memory:` would open a different, empty database.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    ensure_schema(&pool).await.unwrap();
    pool
}
