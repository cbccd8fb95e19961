use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedNumber {
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedSpamNumber {
    pub phone_number: String,
}

#[derive(Debug, Serialize)]
pub struct BlockedNumbersResponse {
    pub numbers: Vec<BlockedNumber>,
}

#[derive(Debug, Serialize)]
pub struct ReportedSpamNumbersResponse {
    pub numbers: Vec<ReportedSpamNumber>,
}

/// Request body for actions that target a single number
#[derive(Debug, Deserialize, Serialize)]
pub struct NumberRequest {
    pub phone_number: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SendSmsRequest {
    pub phone_number: String,
    /// Falls back to the configured monitoring message
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpamCheckResponse {
    pub phone_number: String,
    pub is_spam: bool,
}

/// Where a block request ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockOutcome {
    /// Written to the system block list
    System,
    /// Stored in the local table because the system list is not writable
    Local,
}

/// Which transport delivered an SMS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsOutcome {
    Primary,
    Fallback,
}
