use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::storage::DEFAULT_DATABASE_FILE;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct QuestionsConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("questions.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<QuestionsConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: QuestionsConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &QuestionsConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// CLI flag, then config file, then `questions.db`
pub fn resolve_database_path(cli: Option<&Path>, config: Option<&QuestionsConfig>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }
    config
        .and_then(|c| c.database.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE))
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
