use crate::record::ScoreRecord;
use tabled::{settings::Style, Table, Tabled};

/// One line of a rendered leaderboard
#[derive(Tabled)]
pub struct ScoreRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Player")]
    pub player: String,
    #[tabled(rename = "Score")]
    pub score: i64,
    #[tabled(rename = "Level")]
    pub level: String,
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Achieved (UTC)")]
    pub achieved: String,
}

impl ScoreRow {
    pub fn new(rank: usize, record: &ScoreRecord) -> Self {
        Self {
            rank,
            player: record.player_name.clone(),
            score: record.score,
            level: record.level_name.clone(),
            time: format!("{:.2}s", record.completion_time),
            achieved: record.achieved_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Ranked table, 1-based, in the order given. Empty input renders nothing.
pub fn score_table(records: &[ScoreRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let rows: Vec<ScoreRow> = records
        .iter()
        .enumerate()
        .map(|(i, record)| ScoreRow::new(i + 1, record))
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn stats_table(stats: &[(&str, String)]) -> String {
    if stats.is_empty() {
        return String::new();
    }

    let rows: Vec<StatRow> = stats
        .iter()
        .map(|(metric, value)| StatRow {
            metric: metric.to_string(),
            value: value.clone(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
