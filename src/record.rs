//! Score records - the single entity persisted by the store
//!
//! A `ScoreRecord` is built in memory by the caller, validated and persisted
//! by [`ScoreStore::insert`](crate::storage::ScoreStore::insert), and from then
//! on only ever read back as an owned copy.

use crate::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Level name used when the caller does not supply one
pub const DEFAULT_LEVEL: &str = "Default";

/// One finished game session.
///
/// `id` is `0` until the store assigns it. `achieved_at` is stamped once, at
/// construction, in UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Store-assigned identifier (0 = not persisted yet)
    pub id: i64,
    /// Player display name
    pub player_name: String,
    /// Ranking key, higher is better
    pub score: i64,
    /// Level the score was achieved on
    pub level_name: String,
    /// When the session finished
    pub achieved_at: DateTime<Utc>,
    /// Time taken to finish the level, in seconds
    pub completion_time: f64,
}

impl ScoreRecord {
    /// Create a new record on the default level
    pub fn new(player_name: impl Into<String>, score: i64) -> Self {
        Self {
            id: 0, // Set by DB
            player_name: player_name.into(),
            score,
            level_name: DEFAULT_LEVEL.to_string(),
            achieved_at: Utc::now(),
            completion_time: 0.0,
        }
    }

    /// Set the level name
    pub fn with_level(mut self, level_name: impl Into<String>) -> Self {
        self.level_name = level_name.into();
        self
    }

    /// Set the measured completion time (seconds)
    pub fn with_completion_time(mut self, seconds: f64) -> Self {
        self.completion_time = seconds;
        self
    }

    /// Whether the store has already assigned an id
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Check the record can be inserted.
    pub fn validate(&self) -> Result<()> {
        if self.is_persisted() {
            return Err(StoreError::InvalidRecord(format!(
                "record already persisted with id {}",
                self.id
            )));
        }
        if self.player_name.trim().is_empty() {
            return Err(StoreError::InvalidRecord(
                "player name must not be empty".to_string(),
            ));
        }
        if self.level_name.is_empty() {
            return Err(StoreError::InvalidRecord(
                "level name must not be empty".to_string(),
            ));
        }
        if !self.completion_time.is_finite() || self.completion_time < 0.0 {
            return Err(StoreError::InvalidRecord(format!(
                "completion time must be a non-negative number of seconds, got {}",
                self.completion_time
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} points on {} ({:.2}s)",
            self.player_name, self.score, self.level_name, self.completion_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let before = Utc::now();
        let record = ScoreRecord::new("Ada", 500);

        assert_eq!(record.id, 0);
        assert!(!record.is_persisted());
        assert_eq!(record.level_name, DEFAULT_LEVEL);
        assert_eq!(record.completion_time, 0.0);
        assert!(record.achieved_at >= before);
        assert!(record.achieved_at <= Utc::now());
    }

    #[test]
    fn test_builder() {
        let record = ScoreRecord::new("Ada", 500)
            .with_level("L1")
            .with_completion_time(12.5);

        assert_eq!(record.level_name, "L1");
        assert_eq!(record.completion_time, 12.5);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert!(matches!(
            ScoreRecord::new("   ", 1).validate(),
            Err(StoreError::InvalidRecord(_))
        ));
        assert!(matches!(
            ScoreRecord::new("Ada", 1).with_level("").validate(),
            Err(StoreError::InvalidRecord(_))
        ));
        assert!(matches!(
            ScoreRecord::new("Ada", 1).with_completion_time(-0.5).validate(),
            Err(StoreError::InvalidRecord(_))
        ));
        assert!(matches!(
            ScoreRecord::new("Ada", 1).with_completion_time(f64::NAN).validate(),
            Err(StoreError::InvalidRecord(_))
        ));

        let mut persisted = ScoreRecord::new("Ada", 1);
        persisted.id = 7;
        assert!(matches!(persisted.validate(), Err(StoreError::InvalidRecord(_))));
    }

    #[test]
    fn test_negative_scores_are_allowed() {
        assert!(ScoreRecord::new("Ada", -40).validate().is_ok());
    }

    #[test]
    fn test_display() {
        let record = ScoreRecord::new("Ada", 500)
            .with_level("L1")
            .with_completion_time(12.5);
        assert_eq!(record.to_string(), "Ada: 500 points on L1 (12.50s)");
    }
}
