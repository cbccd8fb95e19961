use crate::config::MonitorConfig;
use actix_web::{web, HttpResponse, Result};
use shared_types::SettingsResponse;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsAppState {
    pub config: Arc<MonitorConfig>,
    pub config_path: PathBuf,
    pub db_path: PathBuf,
}

fn display(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.to_string_lossy().to_string())
}

pub async fn get_settings(data: web::Data<SettingsAppState>) -> Result<HttpResponse> {
    let config = &data.config;

    let response = SettingsResponse {
        config_file_path: data.config_path.to_string_lossy().to_string(),
        database_path: data.db_path.to_string_lossy().to_string(),
        contacts_path: display(&config.sources.contacts_path),
        call_log_path: display(&config.sources.call_log_path),
        spam_list_path: display(&config.sources.spam_list_path),
        system_blocking_available: config.blocking.system_blocklist_path.is_some(),
        sms_command_configured: config.sms.command.is_some(),
    };

    Ok(HttpResponse::Ok().json(response))
}
