use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed file name of the save database
pub const DATABASE_FILE_NAME: &str = "GameData.db";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "HIGHSCORES_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighscoresConfig {
    pub database: Option<String>,
    /// Level used by `add` and `top` when none is given
    pub level: Option<String>,
    /// Default number of rows shown by `top`
    pub limit: Option<i64>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("highscores.toml")
}

pub fn default_data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(".highscores"),
    }
}

pub fn default_database_path() -> PathBuf {
    default_database_path_in(&default_data_dir())
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(DATABASE_FILE_NAME)
}

/// Pick the database path: explicit flag, then config file, then default.
pub fn resolve_database_path(flag: Option<&Path>, config: Option<&HighscoresConfig>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    config
        .and_then(|c| c.database.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<HighscoresConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: HighscoresConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &HighscoresConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
