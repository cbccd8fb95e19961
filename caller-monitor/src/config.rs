use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MONITORING_MESSAGE: &str =
    "Hi, I missed your call and don't recognise this number. Who is calling?";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MonitorConfig {
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub blocking: BlockingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Files standing in for the device contacts, call history and bundled spam list
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SourcesConfig {
    pub contacts_path: Option<PathBuf>,
    pub call_log_path: Option<PathBuf>,
    pub spam_list_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmsConfig {
    /// Program and arguments; `{number}` and `{message}` are substituted
    pub command: Option<Vec<String>>,
    pub outbox_path: Option<PathBuf>,
    #[serde(default = "default_monitoring_message")]
    pub monitoring_message: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            command: None,
            outbox_path: None,
            monitoring_message: default_monitoring_message(),
        }
    }
}

fn default_monitoring_message() -> String {
    DEFAULT_MONITORING_MESSAGE.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BlockingConfig {
    /// Presence grants system blocking, as holding the default dialer role would
    pub system_blocklist_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[cors]
allowed_origins = ["http://localhost:3030"]

[sources]
# vCard export of the contact list
# contacts_path = "/home/me/contacts.vcf"
# CSV call history with columns number,type,date (date in epoch milliseconds)
# call_log_path = "/home/me/calls.csv"
# JSON array of known spam numbers
# spam_list_path = "/home/me/spam_numbers.json"

[sms]
# command = ["kdeconnect-cli", "--send-sms", "{message}", "--destination", "{number}"]
# outbox_path = "/home/me/.local/share/caller-monitor/outbox.jsonl"

[blocking]
# Setting this path enables system-level blocking
# system_blocklist_path = "/home/me/.local/share/caller-monitor/blocked.txt"

[database]
# path = "/home/me/.local/share/caller-monitor/db.sqlite"
"#;

impl MonitorConfig {
    /// Load the config file, writing a commented default on first run
    pub fn load(path_override: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path_override
            .map(Path::to_path_buf)
            .unwrap_or_else(get_config_path);

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: MonitorConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }

    pub fn host_and_port(&self) -> (String, u16) {
        match &self.server {
            Some(server) => (server.host.clone(), server.port),
            None => ("127.0.0.1".to_string(), 8080),
        }
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("caller-monitor").join("config.toml")
    } else {
        PathBuf::from("caller-monitor.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_load_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let (config, loaded_from) = MonitorConfig::load(Some(&path)).unwrap();

        assert_eq!(loaded_from, path);
        assert!(path.exists());
        assert_eq!(config.host_and_port(), ("127.0.0.1".to_string(), 8080));
        assert!(config.sources.call_log_path.is_none());
        assert!(config.blocking.system_blocklist_path.is_none());
        assert_eq!(config.sms.monitoring_message, DEFAULT_MONITORING_MESSAGE);
    }

    #[test]
    fn test_load_sources_and_sms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[sources]
call_log_path = "/tmp/calls.csv"

[sms]
command = ["sms-send", "{number}", "{message}"]
monitoring_message = "Who is this?"
"#,
        )
        .unwrap();

        let (config, _) = MonitorConfig::load(Some(&path)).unwrap();

        assert_eq!(config.sources.call_log_path, Some(PathBuf::from("/tmp/calls.csv")));
        assert_eq!(config.sms.command.as_ref().unwrap().len(), 3);
        assert_eq!(config.sms.monitoring_message, "Who is this?");
        assert!(config.server.is_none());
    }
}
