pub mod call_log;
pub mod call_record;
pub mod caller;
pub mod error;
pub mod number;
pub mod phone;
pub mod provider;
pub mod settings;

pub use call_log::{
    ExportRequest, ImportSummary, LogDetail, LogExportEntry, RestoreRequest, RestoreResponse,
    UnknownCallLog, UnknownCallLogsResponse,
};
pub use call_record::{CallRecord, CallType};
pub use caller::{CallerInfo, PhoneSignal, PhoneState};
pub use error::MonitorError;
pub use number::{
    BlockOutcome, BlockedNumber, BlockedNumbersResponse, NumberRequest, ReportedSpamNumber,
    ReportedSpamNumbersResponse, SendSmsRequest, SmsOutcome, SpamCheckResponse,
};
pub use phone::normalize_number;
pub use provider::{CallLogProvider, ContactsProvider, SmsTransport, SpamListSource, SystemBlockList};
pub use settings::SettingsResponse;

