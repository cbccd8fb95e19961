use shared_types::{normalize_number, CallerInfo, MonitorError};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::receiver::Clock;
use crate::repository::CallerRepository;

/// Decides what an incoming call means and logs it when the caller is unknown
pub struct CallMonitor {
    repository: Arc<CallerRepository>,
    clock: Arc<dyn Clock>,
    last_caller: RwLock<Option<CallerInfo>>,
}

impl CallMonitor {
    pub fn new(repository: Arc<CallerRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            last_caller: RwLock::new(None),
        }
    }

    /// Returns `None` for a number with no digits, such as a withheld caller
    pub async fn on_incoming_call(
        &self,
        phone_number: &str,
    ) -> Result<Option<CallerInfo>, MonitorError> {
        debug!("Processing incoming call: {}", phone_number);

        let number = normalize_number(phone_number);
        if number.is_empty() {
            warn!("Ignoring incoming call without a number: {:?}", phone_number);
            return Ok(None);
        }

        let is_in_contacts = self.repository.is_number_in_contacts(&number);
        debug!("Number {} is in contacts: {}", number, is_in_contacts);

        let info = if is_in_contacts {
            CallerInfo {
                phone_number: number,
                is_in_contacts: true,
                is_blocked: false,
                is_spam: false,
            }
        } else {
            self.repository
                .insert_unknown_call_log(&number, self.clock.now_millis())
                .await?;
            info!("Logged unknown call for: {}", number);

            CallerInfo {
                is_blocked: self.repository.is_number_blocked_locally(&number).await?,
                is_spam: self.repository.is_number_spam(&number).await,
                phone_number: number,
                is_in_contacts: false,
            }
        };

        match self.last_caller.write() {
            Ok(mut last) => *last = Some(info.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(info.clone()),
        }

        Ok(Some(info))
    }

    pub fn last_caller(&self) -> Option<CallerInfo> {
        match self.last_caller.read() {
            Ok(last) => last.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Handle numbers emitted by the call receiver until the channel closes
    pub async fn run(self: Arc<Self>, mut incoming: mpsc::UnboundedReceiver<String>) {
        while let Some(number) = incoming.recv().await {
            if let Err(e) = self.on_incoming_call(&number).await {
                error!("Failed to handle incoming call from {}: {}", number, e);
            }
        }
        debug!("Incoming call channel closed");
    }
}
