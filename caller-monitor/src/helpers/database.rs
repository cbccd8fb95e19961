use std::path::PathBuf;

use crate::config::MonitorConfig;

/// Returns the path to the caller-monitor database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/caller-monitor/db.sqlite`
/// - **Linux**: `~/.local/share/caller-monitor/db.sqlite`
/// - **Windows**: `%LOCALAPPDATA%\caller-monitor\db.sqlite`
///
/// `[database] path` in the config file takes precedence.
pub fn get_db_path(config: &MonitorConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &config.database.path {
        return Ok(path.clone());
    }

    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("caller-monitor").join("db.sqlite"))
}

/// Default location of the SMS outbox when none is configured
pub fn default_outbox_path(db_path: &std::path::Path) -> PathBuf {
    db_path
        .parent()
        .map(|dir| dir.join("sms_outbox.jsonl"))
        .unwrap_or_else(|| PathBuf::from("sms_outbox.jsonl"))
}

/// Open the database, creating it and running migrations when needed
pub fn initialize_database(
    config: &MonitorConfig,
) -> anyhow::Result<std::sync::Arc<crate::database::Database>> {
    let db_path = get_db_path(config)?;
    let db = crate::database::Database::new(&db_path)?;
    Ok(std::sync::Arc::new(db))
}
