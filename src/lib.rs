//! # Highscores - local persistence for game session records
//!
//! Highscores provides:
//! - A SQLite-backed store of score records with ranked and per-level queries
//! - An explicit schema descriptor driving table creation and compatibility checks
//! - A lazily-initialized handle guaranteeing one live store per owner
//! - Config file and terminal output helpers for the `highscores` CLI

pub mod record;
pub mod storage;
pub mod handle;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use record::{ScoreRecord, DEFAULT_LEVEL};
pub use storage::ScoreStore;
pub use handle::StoreHandle;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error types for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Path unwritable, file corrupt, or existing table incompatible
    #[error("Open failed: {0}")]
    OpenFailed(String),

    #[error("Write failed")]
    WriteFailed(#[source] rusqlite::Error),

    #[error("Query failed")]
    QueryFailed(#[source] rusqlite::Error),

    /// Operation attempted before a successful initialize or after close
    #[error("Store is not open")]
    NotOpen,

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}
