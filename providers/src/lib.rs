//! Providers Crate
//!
//! File-backed implementations of the collaborators the caller monitor consumes. On a phone
//! these would be the contacts provider, the call history provider, the SMS manager and the
//! system block list. Here they read and write plain files so the monitor runs on any host.
//!
//! # Architecture
//!
//! - **Traits**: collaborator traits are defined in the `shared-types` crate
//! - **Implementations**: concrete file-backed providers live in this crate
//!
//! # Available Providers
//!
//! - `VcfContactsProvider`: contacts from a vCard file
//! - `CsvCallLogProvider`: call history from a CSV export
//! - `JsonSpamList`: static spam list from a JSON array
//! - `CommandSmsTransport` / `OutboxSmsTransport`: SMS delivery
//! - `FileSystemBlockList`: system block list
//! - `backup`: export/restore codec for unknown call logs

pub mod backup;
pub mod blocklist;
pub mod call_history;
pub mod contacts;
pub mod sms;
pub mod spam_list;

mod io;

pub use blocklist::FileSystemBlockList;
pub use call_history::CsvCallLogProvider;
pub use contacts::VcfContactsProvider;
pub use sms::{CommandSmsTransport, OutboxSmsTransport};
pub use spam_list::JsonSpamList;

// Re-export the provider traits from shared-types for convenience
pub use shared_types::{CallLogProvider, ContactsProvider, SmsTransport, SpamListSource, SystemBlockList};
