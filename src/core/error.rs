use thiserror::Error;

/// Errors surfaced by the library. Startup callers treat `Config` and the
/// connect-time `Database` case as fatal; the crawl engine counts everything
/// else and keeps going.
#[derive(Debug, Error)]
pub enum QuarryError {
    #[error("config error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
