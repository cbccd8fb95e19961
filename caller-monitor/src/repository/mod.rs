mod call_log_import;

use shared_types::{
    normalize_number, BlockedNumber, CallLogProvider, ContactsProvider, LogExportEntry,
    MonitorError, ReportedSpamNumber, SpamListSource, UnknownCallLog,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::database::{
    blocked_numbers, reported_spam_numbers, unknown_call_logs, AsyncDbConnection, Database,
};
use crate::log_stream::LogStream;

/// Normalize a number arriving from outside and note when formatting was stripped
fn normalize_incoming(raw: &str) -> String {
    let normalized = normalize_number(raw);
    if normalized != raw {
        debug!("Normalized number {:?} to {:?}", raw, normalized);
    }
    normalized
}

/// Composes the persistence store with the contacts, call history and spam list collaborators
///
/// Every number that enters through this type is normalized first, so lookups and stored rows
/// always agree on formatting.
pub struct CallerRepository {
    db: Arc<Database>,
    contacts: Arc<dyn ContactsProvider>,
    call_log: Arc<dyn CallLogProvider>,
    spam_list: Arc<dyn SpamListSource>,
    log_stream: LogStream,
}

impl CallerRepository {
    pub async fn new(
        db: Arc<Database>,
        contacts: Arc<dyn ContactsProvider>,
        call_log: Arc<dyn CallLogProvider>,
        spam_list: Arc<dyn SpamListSource>,
    ) -> Result<Self, MonitorError> {
        let initial = unknown_call_logs::list_unknown_call_logs(db.async_connection.clone())
            .await
            .map_err(MonitorError::storage)?;

        Ok(Self {
            db,
            contacts,
            call_log,
            spam_list,
            log_stream: LogStream::new(initial),
        })
    }

    fn conn(&self) -> AsyncDbConnection {
        self.db.async_connection.clone()
    }

    /// Exact match against the contact list; lookup failures count as "not a contact"
    pub fn is_number_in_contacts(&self, phone_number: &str) -> bool {
        let number = normalize_incoming(phone_number);
        self.contains_contact(&number)
    }

    fn contains_contact(&self, normalized: &str) -> bool {
        match self.contacts.contains_number(normalized) {
            Ok(found) => found,
            Err(e) => {
                warn!("Contact lookup failed for {}: {}", normalized, e);
                false
            }
        }
    }

    // Unknown call logs

    /// Log a call from an unknown number; returns `None` when the number has no digits
    pub async fn insert_unknown_call_log(
        &self,
        phone_number: &str,
        timestamp: i64,
    ) -> Result<Option<i64>, MonitorError> {
        let number = normalize_incoming(phone_number);
        if number.is_empty() {
            warn!("Refusing to log call with empty number {:?}", phone_number);
            return Ok(None);
        }

        let id = self.insert_normalized(&number, timestamp).await?;
        self.refresh_stream().await?;

        Ok(Some(id))
    }

    async fn insert_normalized(&self, number: &str, timestamp: i64) -> Result<i64, MonitorError> {
        unknown_call_logs::insert_unknown_call_log(self.conn(), number, timestamp)
            .await
            .map_err(MonitorError::storage)
    }

    /// Apply exported entries without moving any stored call time backwards
    ///
    /// Entries are collapsed per normalized number keeping the newest timestamp. A number already
    /// in the table is only rewritten when the entry is newer. Returns how many rows were
    /// created or changed; subscribers are notified once.
    pub async fn restore_unknown_call_logs(
        &self,
        entries: Vec<LogExportEntry>,
    ) -> Result<usize, MonitorError> {
        let mut order: Vec<String> = Vec::new();
        let mut newest: HashMap<String, i64> = HashMap::new();

        for entry in entries {
            let number = normalize_incoming(&entry.phone_number);
            if number.is_empty() {
                warn!("Skipping restored entry with empty number {:?}", entry.phone_number);
                continue;
            }
            match newest.get_mut(&number) {
                Some(timestamp) => *timestamp = (*timestamp).max(entry.timestamp),
                None => {
                    newest.insert(number.clone(), entry.timestamp);
                    order.push(number);
                }
            }
        }

        let mut restored = 0;
        for number in order {
            let timestamp = newest[&number];
            let existing = unknown_call_logs::get_by_number(self.conn(), &number)
                .await
                .map_err(MonitorError::storage)?;
            if matches!(existing, Some(ref log) if log.timestamp >= timestamp) {
                debug!("Stored call time for {} is already current", number);
                continue;
            }

            self.insert_normalized(&number, timestamp).await?;
            restored += 1;
        }

        if restored > 0 {
            self.refresh_stream().await?;
        }

        Ok(restored)
    }

    pub async fn get_unknown_call_logs(&self) -> Result<Vec<UnknownCallLog>, MonitorError> {
        unknown_call_logs::list_unknown_call_logs(self.conn())
            .await
            .map_err(MonitorError::storage)
    }

    pub async fn get_unknown_call_log(&self, id: i64) -> Result<UnknownCallLog, MonitorError> {
        unknown_call_logs::get_unknown_call_log(self.conn(), id)
            .await
            .map_err(MonitorError::storage)?
            .ok_or_else(|| MonitorError::NotFound(format!("unknown call log {}", id)))
    }

    /// Returns whether a row was removed
    pub async fn delete_unknown_call_log(&self, id: i64) -> Result<bool, MonitorError> {
        let deleted = unknown_call_logs::delete_unknown_call_log(self.conn(), id)
            .await
            .map_err(MonitorError::storage)?;
        self.refresh_stream().await?;
        Ok(deleted > 0)
    }

    pub async fn delete_all_unknown_call_logs(&self) -> Result<usize, MonitorError> {
        let deleted = unknown_call_logs::delete_all_unknown_call_logs(self.conn())
            .await
            .map_err(MonitorError::storage)?;
        self.refresh_stream().await?;
        Ok(deleted)
    }

    pub fn log_stream(&self) -> &LogStream {
        &self.log_stream
    }

    /// Re-read the table and push the ordered list to subscribers
    pub async fn refresh_stream(&self) -> Result<(), MonitorError> {
        let logs = self.get_unknown_call_logs().await?;
        debug!("Unknown call logs updated: {} logs", logs.len());
        self.log_stream.publish(logs);
        Ok(())
    }

    // Local block list

    pub async fn block_number_locally(&self, phone_number: &str) -> Result<(), MonitorError> {
        let number = normalize_incoming(phone_number);
        blocked_numbers::insert_blocked_number(self.conn(), &number)
            .await
            .map_err(MonitorError::storage)
    }

    pub async fn is_number_blocked_locally(&self, phone_number: &str) -> Result<bool, MonitorError> {
        let number = normalize_incoming(phone_number);
        blocked_numbers::is_blocked(self.conn(), &number)
            .await
            .map_err(MonitorError::storage)
    }

    pub async fn get_all_blocked_numbers(&self) -> Result<Vec<BlockedNumber>, MonitorError> {
        blocked_numbers::list_blocked_numbers(self.conn())
            .await
            .map_err(MonitorError::storage)
    }

    pub async fn unblock_number_locally(&self, phone_number: &str) -> Result<bool, MonitorError> {
        let number = normalize_incoming(phone_number);
        let deleted = blocked_numbers::delete_blocked_number(self.conn(), &number)
            .await
            .map_err(MonitorError::storage)?;
        Ok(deleted > 0)
    }

    // Spam

    /// Static list first, then user reports. Never fails.
    pub async fn is_number_spam(&self, phone_number: &str) -> bool {
        let number = normalize_incoming(phone_number);

        if self.is_number_in_static_spam_list(&number) {
            return true;
        }

        match reported_spam_numbers::is_spam(self.conn(), &number).await {
            Ok(reported) => reported,
            Err(e) => {
                warn!("Reported spam lookup failed for {}: {}", number, e);
                false
            }
        }
    }

    /// Reads the static list on every check; an unreadable list means "not listed"
    fn is_number_in_static_spam_list(&self, normalized: &str) -> bool {
        match self.spam_list.load() {
            Ok(list) => list.iter().any(|entry| normalize_number(entry) == normalized),
            Err(e) => {
                warn!("Static spam list unavailable: {}", e);
                false
            }
        }
    }

    pub async fn report_number_as_spam(&self, phone_number: &str) -> Result<(), MonitorError> {
        let number = normalize_incoming(phone_number);
        reported_spam_numbers::insert_reported_spam_number(self.conn(), &number)
            .await
            .map_err(MonitorError::storage)
    }

    pub async fn unreport_spam_number(&self, phone_number: &str) -> Result<bool, MonitorError> {
        let number = normalize_incoming(phone_number);
        let deleted = reported_spam_numbers::delete_reported_spam_number(self.conn(), &number)
            .await
            .map_err(MonitorError::storage)?;
        Ok(deleted > 0)
    }

    pub async fn get_all_reported_spam_numbers(&self) -> Result<Vec<ReportedSpamNumber>, MonitorError> {
        reported_spam_numbers::list_reported_spam_numbers(self.conn())
            .await
            .map_err(MonitorError::storage)
    }
}
