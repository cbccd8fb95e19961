pub mod clock;
pub mod state_machine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use state_machine::{CallState, CallStateMachine, SignalOutcome, RECOVERY_DELAY, RECOVERY_LOOKBACK_MS};

use shared_types::{CallLogProvider, PhoneSignal};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Feeds phone-state signals through the state machine and emits incoming numbers
///
/// When a ringing signal arrives without a number, a recovery task waits out
/// [`RECOVERY_DELAY`] and then reads the newest incoming call from history, provided the same
/// ring is still in progress.
pub struct CallReceiver {
    machine: Arc<Mutex<CallStateMachine>>,
    call_log: Arc<dyn CallLogProvider>,
    incoming: mpsc::UnboundedSender<String>,
}

impl CallReceiver {
    pub fn new(
        clock: Arc<dyn Clock>,
        call_log: Arc<dyn CallLogProvider>,
        incoming: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self {
            machine: Arc::new(Mutex::new(CallStateMachine::new(clock))),
            call_log,
            incoming,
        }
    }

    pub fn state(&self) -> CallState {
        match self.machine.lock() {
            Ok(machine) => machine.state(),
            Err(poisoned) => poisoned.into_inner().state(),
        }
    }

    /// Returns the recovery task when one was started
    pub fn handle_signal(&self, signal: &PhoneSignal) -> Option<JoinHandle<()>> {
        let outcome = match self.machine.lock() {
            Ok(mut machine) => machine.on_signal(signal),
            Err(poisoned) => poisoned.into_inner().on_signal(signal),
        };

        match outcome {
            SignalOutcome::Incoming(number) => {
                self.emit(number);
                None
            }
            SignalOutcome::RecoverAfterDelay { ring_id, since_ms } => {
                warn!("Incoming number missing from ringing signal, will check call history");
                Some(self.spawn_recovery(ring_id, since_ms))
            }
            SignalOutcome::Ignored => None,
        }
    }

    fn emit(&self, number: String) {
        debug!("Dispatching incoming call: {}", number);
        if self.incoming.send(number).is_err() {
            error!("Incoming call handler has stopped");
        }
    }

    fn spawn_recovery(&self, ring_id: u64, since_ms: i64) -> JoinHandle<()> {
        let machine = self.machine.clone();
        let call_log = self.call_log.clone();
        let incoming = self.incoming.clone();

        tokio::spawn(async move {
            tokio::time::sleep(RECOVERY_DELAY).await;

            let still_ringing = match machine.lock() {
                Ok(machine) => machine.is_ringing_for(ring_id),
                Err(poisoned) => poisoned.into_inner().is_ringing_for(ring_id),
            };
            if !still_ringing {
                debug!("Ring {} ended before recovery, skipping call history lookup", ring_id);
                return;
            }

            match call_log.latest_incoming_since(since_ms) {
                Ok(Some(record)) => match record.number.filter(|n| !n.is_empty()) {
                    Some(number) => {
                        debug!("Got number from call log: {}", number);
                        if incoming.send(number).is_err() {
                            error!("Incoming call handler has stopped");
                        }
                    }
                    None => debug!("Latest incoming call has no number"),
                },
                Ok(None) => debug!("No recent incoming call in call log"),
                Err(e) => error!("Error reading call log: {}", e),
            }
        })
    }
}
