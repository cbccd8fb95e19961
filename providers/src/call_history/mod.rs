mod csv_log;

pub use csv_log::{parse_call_log, CsvCallLogProvider};
