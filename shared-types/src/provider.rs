//! Seams to the platform collaborators the monitor reads from and writes to.

use crate::{CallRecord, MonitorError};

/// Read access to the contact list
pub trait ContactsProvider: Send + Sync {
    /// Fails with `PermissionDenied` when contacts cannot be read at all
    fn check_access(&self) -> Result<(), MonitorError>;

    /// Exact match against stored contact numbers
    fn contains_number(&self, phone_number: &str) -> Result<bool, MonitorError>;
}

/// Read access to the device call history
pub trait CallLogProvider: Send + Sync {
    fn check_access(&self) -> Result<(), MonitorError>;

    /// Every call record, newest first
    fn all_calls(&self) -> Result<Vec<CallRecord>, MonitorError>;

    /// Newest incoming record strictly newer than `since_ms`
    fn latest_incoming_since(&self, since_ms: i64) -> Result<Option<CallRecord>, MonitorError> {
        Ok(self
            .all_calls()?
            .into_iter()
            .filter(|record| record.call_type.is_incoming() && record.timestamp > since_ms)
            .max_by_key(|record| record.timestamp))
    }
}

/// The bundled list of known spam numbers
pub trait SpamListSource: Send + Sync {
    fn load(&self) -> Result<Vec<String>, MonitorError>;
}

pub trait SmsTransport: Send + Sync {
    fn send(&self, phone_number: &str, message: &str) -> Result<(), MonitorError>;
}

/// System-wide block list, writable only with the default-dialer role
pub trait SystemBlockList: Send + Sync {
    fn is_available(&self) -> bool;

    fn block(&self, phone_number: &str) -> Result<(), MonitorError>;
}
