//! Export and restore of unknown call logs as a JSON array of `{phoneNumber, timestamp}`.

use shared_types::{LogExportEntry, MonitorError, UnknownCallLog};
use std::path::Path;

use crate::io::read_file;

pub fn encode_logs(logs: &[UnknownCallLog]) -> Result<String, MonitorError> {
    let entries: Vec<LogExportEntry> = logs.iter().map(LogExportEntry::from).collect();
    serde_json::to_string_pretty(&entries)
        .map_err(|e| MonitorError::Parse(format!("failed to encode logs: {}", e)))
}

/// Decode a whole export; any malformed element fails the entire document
pub fn decode_logs(content: &[u8]) -> Result<Vec<LogExportEntry>, MonitorError> {
    serde_json::from_slice(content).map_err(|e| MonitorError::Parse(e.to_string()))
}

pub fn write_export(path: &Path, logs: &[UnknownCallLog]) -> Result<(), MonitorError> {
    let json = encode_logs(logs)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| MonitorError::Provider(e.to_string()))?;
        }
    }

    std::fs::write(path, json)
        .map_err(|e| MonitorError::Provider(format!("failed to write {}: {}", path.display(), e)))
}

pub fn read_export(path: &Path) -> Result<Vec<LogExportEntry>, MonitorError> {
    let content = read_file(path)?;
    decode_logs(&content)
}
