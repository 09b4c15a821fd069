//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite file with one table:
//! - high_scores(id, player_name, score, level_name, achieved_at, completion_time)

pub mod schema;
pub mod sqlite;

pub use sqlite::ScoreStore;
