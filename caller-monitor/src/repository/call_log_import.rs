use shared_types::{normalize_number, ImportSummary, MonitorError};
use std::collections::HashSet;
use tracing::{debug, info};

use super::CallerRepository;
use crate::database::unknown_call_logs;

impl CallerRepository {
    /// Ask the call history provider for read access before touching it
    pub fn check_call_log_access(&self) -> Result<(), MonitorError> {
        self.call_log.check_access()
    }

    /// Record every incoming call from an unknown number found in the device call history
    ///
    /// History is read newest first and only the first record per normalized number is kept,
    /// so each imported row carries the number's most recent call time. Numbers already in the
    /// table are left alone. Rows inserted before a failure stay committed.
    pub async fn import_all_unknown_call_logs(&self) -> Result<ImportSummary, MonitorError> {
        debug!("Starting import of all unknown call logs from device");

        let records = self.call_log.all_calls()?;
        debug!("Call log query result: {} total calls", records.len());

        let mut summary = ImportSummary::default();
        let mut processed_numbers: HashSet<String> = HashSet::new();

        for record in records {
            summary.total_calls += 1;

            let number = match (&record.number, record.call_type.is_incoming()) {
                (Some(number), true) => number,
                _ => continue,
            };
            summary.incoming_calls += 1;

            let clean_number = normalize_number(number);
            if clean_number.is_empty() || processed_numbers.contains(&clean_number) {
                debug!("Skipping number (empty or duplicate): {:?}", clean_number);
                continue;
            }

            if self.contains_contact(&clean_number) {
                debug!("Number is in contacts: {}", clean_number);
                continue;
            }
            summary.unknown_numbers += 1;

            let existing = unknown_call_logs::get_by_number(self.conn(), &clean_number)
                .await
                .map_err(MonitorError::storage)?;
            if existing.is_some() {
                debug!("Number already exists in database: {}", clean_number);
                continue;
            }

            self.insert_normalized(&clean_number, record.timestamp).await?;
            processed_numbers.insert(clean_number);
            summary.imported += 1;
        }

        debug!(
            total_calls = summary.total_calls,
            incoming_calls = summary.incoming_calls,
            unknown_numbers = summary.unknown_numbers,
            imported = summary.imported,
            "Import summary"
        );
        info!("Import completed. Imported {} unknown call logs", summary.imported);

        if summary.imported > 0 {
            self.refresh_stream().await?;
        }

        Ok(summary)
    }
}
