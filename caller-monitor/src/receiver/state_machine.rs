use shared_types::{PhoneSignal, PhoneState};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::Clock;

/// Wait before reading call history for a number the ringing signal withheld
pub const RECOVERY_DELAY: Duration = Duration::from_secs(2);

/// How far before the ring start a history record may be and still belong to this ring
pub const RECOVERY_LOOKBACK_MS: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Ringing,
}

/// What the caller of [`CallStateMachine::on_signal`] should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    /// Hand this number to the incoming-call handler now
    Incoming(String),
    /// Wait [`RECOVERY_DELAY`], then look up the newest incoming call after `since_ms`
    /// if ring `ring_id` is still in progress
    RecoverAfterDelay { ring_id: u64, since_ms: i64 },
    Ignored,
}

/// IDLE/RINGING tracking for live call interception
pub struct CallStateMachine {
    clock: Arc<dyn Clock>,
    state: CallState,
    ring_started_at: Option<i64>,
    ring_id: u64,
}

impl CallStateMachine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: CallState::Idle,
            ring_started_at: None,
            ring_id: 0,
        }
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn ring_started_at(&self) -> Option<i64> {
        self.ring_started_at
    }

    pub fn is_ringing_for(&self, ring_id: u64) -> bool {
        self.state == CallState::Ringing && self.ring_id == ring_id
    }

    pub fn on_signal(&mut self, signal: &PhoneSignal) -> SignalOutcome {
        match signal {
            PhoneSignal::Test { phone_number } => {
                debug!("Received test call: {}", phone_number);
                SignalOutcome::Incoming(phone_number.clone())
            }
            PhoneSignal::StateChanged {
                state: PhoneState::Ringing,
                incoming_number,
            } => {
                let now = self.clock.now_millis();
                self.state = CallState::Ringing;
                self.ring_started_at = Some(now);
                self.ring_id += 1;
                debug!("Phone ringing, incoming number: {:?}", incoming_number);

                match incoming_number.as_deref().filter(|n| !n.is_empty()) {
                    Some(number) => SignalOutcome::Incoming(number.to_string()),
                    None => SignalOutcome::RecoverAfterDelay {
                        ring_id: self.ring_id,
                        since_ms: now - RECOVERY_LOOKBACK_MS,
                    },
                }
            }
            PhoneSignal::StateChanged {
                state: PhoneState::Idle,
                ..
            } => {
                self.state = CallState::Idle;
                debug!("Phone idle");
                SignalOutcome::Ignored
            }
            PhoneSignal::StateChanged {
                state: PhoneState::Offhook,
                ..
            } => {
                debug!("Phone off hook, state unchanged");
                SignalOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receiver::ManualClock;

    fn machine_at(millis: i64) -> (CallStateMachine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(millis));
        (CallStateMachine::new(clock.clone()), clock)
    }

    #[test]
    fn test_ringing_with_number() {
        let (mut machine, _) = machine_at(5_000);

        let outcome = machine.on_signal(&PhoneSignal::ringing(Some("555")));
        assert_eq!(outcome, SignalOutcome::Incoming("555".to_string()));
        assert_eq!(machine.state(), CallState::Ringing);
        assert_eq!(machine.ring_started_at(), Some(5_000));
    }

    #[test]
    fn test_empty_number_triggers_recovery_window() {
        let (mut machine, _) = machine_at(50_000);

        let outcome = machine.on_signal(&PhoneSignal::ringing(Some("")));
        assert_eq!(
            outcome,
            SignalOutcome::RecoverAfterDelay {
                ring_id: 1,
                since_ms: 40_000
            }
        );
        assert!(machine.is_ringing_for(1));
    }

    #[test]
    fn test_idle_ends_ring() {
        let (mut machine, clock) = machine_at(0);

        machine.on_signal(&PhoneSignal::ringing(None));
        assert_eq!(machine.on_signal(&PhoneSignal::idle()), SignalOutcome::Ignored);
        assert_eq!(machine.state(), CallState::Idle);
        assert!(!machine.is_ringing_for(1));

        clock.set(20_000);
        let outcome = machine.on_signal(&PhoneSignal::ringing(None));
        assert_eq!(
            outcome,
            SignalOutcome::RecoverAfterDelay {
                ring_id: 2,
                since_ms: 10_000
            }
        );
    }

    #[test]
    fn test_offhook_keeps_state() {
        let (mut machine, _) = machine_at(0);
        machine.on_signal(&PhoneSignal::ringing(Some("1")));

        let outcome = machine.on_signal(&PhoneSignal::StateChanged {
            state: PhoneState::Offhook,
            incoming_number: None,
        });
        assert_eq!(outcome, SignalOutcome::Ignored);
        assert_eq!(machine.state(), CallState::Ringing);
    }
}
