pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, info, section, success, warn};
pub use table::{score_table, stats_table, ScoreRow};
pub use theme::{theme, Theme};
