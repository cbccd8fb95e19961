use serde::{Deserialize, Serialize};

/// Result of handling a live incoming call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerInfo {
    pub phone_number: String,
    pub is_in_contacts: bool,
    pub is_blocked: bool,
    pub is_spam: bool,
}

/// Telephony state carried by a phone-state signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneState {
    Ringing,
    Offhook,
    Idle,
}

/// A platform signal delivered to the call receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhoneSignal {
    StateChanged {
        state: PhoneState,
        incoming_number: Option<String>,
    },
    /// Injected by the app itself to exercise the incoming call path
    Test { phone_number: String },
}

impl PhoneSignal {
    pub fn ringing(incoming_number: Option<&str>) -> Self {
        PhoneSignal::StateChanged {
            state: PhoneState::Ringing,
            incoming_number: incoming_number.map(str::to_string),
        }
    }

    pub fn idle() -> Self {
        PhoneSignal::StateChanged {
            state: PhoneState::Idle,
            incoming_number: None,
        }
    }
}
