//! Serves a small REST API for posts (title + body) stored in SQLite.
//!
//! Routes, mounted under `--prefix` (default `/api`):
//!
//! ```text
//! GET     /posts?search=&page=   paginated listing, 3 per page
//! POST    /posts                 create
//! GET     /posts/{id}            show
//! PUT     /posts/{id}            update (PATCH behaves the same)
//! DELETE  /posts/{id}            delete
//! ```
//!
//! See the server's help with
//! ```
//! sh cargo run -- --help
//! ```

mod config;
mod datatypes;
mod error;
mod handlers;
mod store;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::parse_args;
use store::PostStore;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_layer)
        .try_init();

    let args = parse_args();

    let pool = store::connect(&args).await?;
    store::ensure_schema(&pool).await?;
    let posts = web::Data::new(PostStore::new(pool));

    let scope_path = args.scope_path();
    info!(
        host = %args.host,
        port = args.port,
        prefix = %scope_path,
        "Starting HTTP server"
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(posts.clone())
            .service(web::scope(&scope_path).configure(handlers::configure))
    });
    if let Some(workers) = args.workers {
        server = server.workers(workers);
    }

    server.bind((args.host, args.port))?.run().await?;

    info!("Server stopped");
    Ok(())
}
