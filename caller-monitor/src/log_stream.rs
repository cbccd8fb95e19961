use shared_types::UnknownCallLog;
use std::sync::Arc;
use tokio::sync::watch;

/// Push-on-change view of the unknown call log table
///
/// Every subscriber holds the full list in display order and is woken whenever the repository
/// publishes a new snapshot after a mutation.
#[derive(Clone)]
pub struct LogStream {
    sender: Arc<watch::Sender<Vec<UnknownCallLog>>>,
}

impl LogStream {
    pub fn new(initial: Vec<UnknownCallLog>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn publish(&self, logs: Vec<UnknownCallLog>) {
        self.sender.send_replace(logs);
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<UnknownCallLog>> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> Vec<UnknownCallLog> {
        self.sender.borrow().clone()
    }
}

impl Default for LogStream {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(id: i64, number: &str) -> UnknownCallLog {
        UnknownCallLog {
            id,
            phone_number: number.to_string(),
            timestamp: id * 10,
        }
    }

    #[tokio::test]
    async fn test_subscriber_sees_current_then_updates() {
        let stream = LogStream::new(vec![log(1, "111")]);
        let mut rx = stream.subscribe();

        assert_eq!(rx.borrow_and_update().len(), 1);

        stream.publish(vec![log(2, "222"), log(1, "111")]);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update()[0].phone_number, "222");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let stream = LogStream::default();
        stream.publish(vec![log(1, "111")]);
        assert_eq!(stream.current().len(), 1);
    }
}
