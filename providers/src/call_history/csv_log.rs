use csv::ReaderBuilder;
use serde::Deserialize;
use shared_types::{CallLogProvider, CallRecord, CallType, MonitorError};
use std::path::PathBuf;

use crate::io::{check_readable, read_file};

/// Row layout of a call history export: `number,type,date`
///
/// `type` is either the numeric call type code or its name; `date` is epoch milliseconds.
#[derive(Debug, Deserialize)]
struct CallLogRow {
    number: Option<String>,
    #[serde(rename = "type")]
    call_type: String,
    date: i64,
}

/// Call history read from a CSV file
pub struct CsvCallLogProvider {
    path: PathBuf,
}

impl CsvCallLogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CallLogProvider for CsvCallLogProvider {
    fn check_access(&self) -> Result<(), MonitorError> {
        check_readable(&self.path)
    }

    fn all_calls(&self) -> Result<Vec<CallRecord>, MonitorError> {
        let content = read_file(&self.path)?;
        parse_call_log(&content)
    }
}

/// Parse a call history CSV into records sorted newest first
///
/// Malformed rows are skipped with a warning; a missing header row fails the whole parse.
pub fn parse_call_log(content: &[u8]) -> Result<Vec<CallRecord>, MonitorError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = reader
        .headers()
        .map_err(|e| MonitorError::Provider(format!("unreadable call log header: {}", e)))?;
    if !headers.iter().any(|h| h == "date") {
        return Err(MonitorError::Provider(
            "call log is missing the date column".to_string(),
        ));
    }

    let mut records = Vec::new();

    for result in reader.deserialize::<CallLogRow>() {
        match result {
            Ok(row) => records.push(CallRecord {
                number: row.number.filter(|n| !n.is_empty()),
                call_type: CallType::parse(&row.call_type),
                timestamp: row.date,
            }),
            Err(e) => {
                tracing::warn!("Failed to parse call log row: {}", e);
            }
        }
    }

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "number,type,date
+1 555 123 4567,1,50
5550001111,outgoing,90
,1,95
+1 555 123 4567,incoming,100
bad,row
";

    #[test]
    fn test_parse_sorts_newest_first() {
        let records = parse_call_log(SAMPLE_CSV.as_bytes()).unwrap();

        let timestamps: Vec<i64> = records.iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![100, 95, 90, 50]);
        assert_eq!(records[0].call_type, CallType::Incoming);
        assert_eq!(records[1].number, None);
        assert_eq!(records[2].call_type, CallType::Outgoing);
    }

    #[test]
    fn test_latest_incoming_since() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.csv");
        std::fs::write(&path, SAMPLE_CSV).unwrap();

        let provider = CsvCallLogProvider::new(&path);
        let latest = provider.latest_incoming_since(60).unwrap().unwrap();
        assert_eq!(latest.timestamp, 100);
        assert!(provider.latest_incoming_since(100).unwrap().is_none());
    }

    #[test]
    fn test_missing_date_column() {
        let result = parse_call_log(b"number,type\n555,1\n");
        assert!(matches!(result, Err(MonitorError::Provider(_))));
    }
}
