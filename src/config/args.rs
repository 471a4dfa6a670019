use clap::Parser;
use std::net::IpAddr;

#[derive(Parser, Debug, Clone)]
#[clap(name = "post_board", about = "REST API for managing posts")]
pub struct ServerArgs {
    /// Address to bind the HTTP server to.
    #[clap(long, env = "POST_BOARD_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,
    /// Port to bind the HTTP server to.
    #[clap(long, env = "POST_BOARD_PORT", default_value_t = 8000)]
    pub port: u16,
    /// Database connection string. The file is created if it does not exist yet.
    #[clap(long, env = "DATABASE_URL", default_value = "sqlite://posts.db?mode=rwc")]
    pub database_url: String,
    /// Upper bound on pooled database connections.
    #[clap(long, env = "POST_BOARD_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,
    /// Path prefix the post routes are mounted under.
    #[clap(long, env = "POST_BOARD_PREFIX", default_value = "/api")]
    pub prefix: String,
    /// Number of HTTP worker threads. Defaults to the number of physical cores.
    #[clap(long, env = "POST_BOARD_WORKERS")]
    pub workers: Option<usize>,
}

impl ServerArgs {
    /// The route prefix with surrounding slashes normalised, e.g. `api/` -> `/api`, `/` -> ``.
    pub fn scope_path(&self) -> String {
        let trimmed = self.prefix.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

pub fn parse_args() -> ServerArgs {
    ServerArgs::parse()
}
