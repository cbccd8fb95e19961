use serde::{Deserialize, Serialize};

/// Response for settings endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub config_file_path: String,
    pub database_path: String,
    pub contacts_path: Option<String>,
    pub call_log_path: Option<String>,
    pub spam_list_path: Option<String>,
    pub system_blocking_available: bool,
    pub sms_command_configured: bool,
}
