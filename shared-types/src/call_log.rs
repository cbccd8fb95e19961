use serde::{Deserialize, Serialize};

/// A logged call from a number that is not in the contact list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownCallLog {
    pub id: i64,
    pub phone_number: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnknownCallLogsResponse {
    pub logs: Vec<UnknownCallLog>,
}

/// Element of the export/restore JSON array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogExportEntry {
    pub phone_number: String,
    pub timestamp: i64,
}

impl From<&UnknownCallLog> for LogExportEntry {
    fn from(log: &UnknownCallLog) -> Self {
        Self {
            phone_number: log.phone_number.clone(),
            timestamp: log.timestamp,
        }
    }
}

/// Everything the detail sheet for a log entry shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogDetail {
    pub log: UnknownCallLog,
    pub formatted_time: String,
    pub is_spam: bool,
    pub is_blocked: bool,
    pub call_uri: String,
    pub sms_uri: String,
}

/// Counters collected by a call history import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_calls: usize,
    pub incoming_calls: usize,
    pub unknown_numbers: usize,
    pub imported: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExportRequest {
    pub path: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RestoreRequest {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RestoreResponse {
    pub restored: usize,
}
