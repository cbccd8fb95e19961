use serde::{Deserialize, Serialize};

/// Direction of a call history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallType {
    Incoming,
    Outgoing,
    Missed,
    Voicemail,
    Rejected,
    Blocked,
    Other(i32),
}

impl CallType {
    /// Map the numeric codes used by call history exports (1 = incoming, 2 = outgoing, ...)
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => CallType::Incoming,
            2 => CallType::Outgoing,
            3 => CallType::Missed,
            4 => CallType::Voicemail,
            5 => CallType::Rejected,
            6 => CallType::Blocked,
            other => CallType::Other(other),
        }
    }

    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if let Ok(code) = value.parse::<i32>() {
            return Self::from_code(code);
        }

        match value.to_lowercase().as_str() {
            "incoming" => CallType::Incoming,
            "outgoing" => CallType::Outgoing,
            "missed" => CallType::Missed,
            "voicemail" => CallType::Voicemail,
            "rejected" => CallType::Rejected,
            "blocked" => CallType::Blocked,
            _ => CallType::Other(-1),
        }
    }

    pub fn is_incoming(&self) -> bool {
        matches!(self, CallType::Incoming)
    }
}

/// One row of the device call history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub number: Option<String>,
    pub call_type: CallType,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl CallRecord {
    pub fn new(number: impl Into<String>, call_type: CallType, timestamp: i64) -> Self {
        Self {
            number: Some(number.into()),
            call_type,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_names() {
        assert_eq!(CallType::parse("1"), CallType::Incoming);
        assert_eq!(CallType::parse(" 2 "), CallType::Outgoing);
        assert_eq!(CallType::parse("Missed"), CallType::Missed);
        assert_eq!(CallType::parse("9"), CallType::Other(9));
        assert!(!CallType::parse("whatever").is_incoming());
    }
}
