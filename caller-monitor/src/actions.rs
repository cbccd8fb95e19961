//! User-triggered remediation: detail view, call back, SMS, block, report spam, export and
//! restore.

use chrono::{Local, TimeZone};
use providers::backup;
use shared_types::{
    normalize_number, BlockOutcome, LogDetail, MonitorError, SmsOutcome, SmsTransport,
    SystemBlockList,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::repository::CallerRepository;

pub fn call_uri(phone_number: &str) -> String {
    format!("tel:{}", phone_number)
}

pub fn sms_uri(phone_number: &str) -> String {
    format!("sms:{}", phone_number)
}

/// Render epoch milliseconds as `YYYY-MM-DD HH:MM:SS` in local time
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

pub struct RemediationActions {
    repository: Arc<CallerRepository>,
    sms_primary: Arc<dyn SmsTransport>,
    sms_fallback: Option<Arc<dyn SmsTransport>>,
    system_block_list: Arc<dyn SystemBlockList>,
    monitoring_message: String,
}

impl RemediationActions {
    pub fn new(
        repository: Arc<CallerRepository>,
        sms_primary: Arc<dyn SmsTransport>,
        sms_fallback: Option<Arc<dyn SmsTransport>>,
        system_block_list: Arc<dyn SystemBlockList>,
        monitoring_message: String,
    ) -> Self {
        Self {
            repository,
            sms_primary,
            sms_fallback,
            system_block_list,
            monitoring_message,
        }
    }

    pub fn repository(&self) -> &Arc<CallerRepository> {
        &self.repository
    }

    pub async fn log_detail(&self, id: i64) -> Result<LogDetail, MonitorError> {
        let log = self.repository.get_unknown_call_log(id).await?;

        Ok(LogDetail {
            formatted_time: format_timestamp(log.timestamp),
            is_spam: self.repository.is_number_spam(&log.phone_number).await,
            is_blocked: self.repository.is_number_blocked_locally(&log.phone_number).await?,
            call_uri: call_uri(&log.phone_number),
            sms_uri: sms_uri(&log.phone_number),
            log,
        })
    }

    /// Block through the system list when the role allows it, otherwise locally
    pub async fn block_number(&self, phone_number: &str) -> Result<BlockOutcome, MonitorError> {
        let number = normalize_number(phone_number);

        if self.system_block_list.is_available() {
            self.system_block_list.block(&number).map_err(|e| {
                error!("System block failed for {}: {}", number, e);
                e
            })?;
            info!("Number blocked in system block list: {}", number);
            Ok(BlockOutcome::System)
        } else {
            self.repository.block_number_locally(&number).await?;
            info!(
                "Number blocked locally (set as default phone app for system blocking): {}",
                number
            );
            Ok(BlockOutcome::Local)
        }
    }

    pub async fn report_spam(&self, phone_number: &str) -> Result<(), MonitorError> {
        self.repository.report_number_as_spam(phone_number).await?;
        info!("Number reported as spam: {}", normalize_number(phone_number));
        Ok(())
    }

    /// Send through the primary transport, retrying once on the fallback
    pub async fn send_sms(
        &self,
        phone_number: &str,
        message: Option<&str>,
    ) -> Result<SmsOutcome, MonitorError> {
        let number = normalize_number(phone_number);
        if number.is_empty() {
            return Err(MonitorError::Transport(format!(
                "no digits in destination {:?}",
                phone_number
            )));
        }
        let message = message.unwrap_or(self.monitoring_message.as_str()).to_string();

        match send_blocking(self.sms_primary.clone(), number.clone(), message.clone()).await {
            Ok(()) => {
                info!("SMS sent to {}", number);
                Ok(SmsOutcome::Primary)
            }
            Err(primary_err) => {
                error!("Error sending SMS to {}: {}", number, primary_err);

                let fallback = self.sms_fallback.clone().ok_or(primary_err)?;
                warn!("Trying alternative SMS method");

                send_blocking(fallback, number.clone(), message)
                    .await
                    .map(|()| {
                        info!("Alternative SMS method succeeded for {}", number);
                        SmsOutcome::Fallback
                    })
                    .map_err(|e| {
                        error!("Alternative SMS method failed for {}: {}", number, e);
                        e
                    })
            }
        }
    }

    /// Write every log, newest first, to `path`; returns how many were written
    pub async fn export_logs(&self, path: &Path) -> Result<usize, MonitorError> {
        let logs = self.repository.get_unknown_call_logs().await?;
        backup::write_export(path, &logs)?;
        info!("Exported {} unknown call logs to {}", logs.len(), path.display());
        Ok(logs.len())
    }

    /// Parse the whole file before inserting anything; returns rows created or changed
    pub async fn restore_logs(&self, path: &Path) -> Result<usize, MonitorError> {
        let entries = backup::read_export(path).map_err(|e| {
            error!("Restore from {} failed: {}", path.display(), e);
            e
        })?;

        let restored = self.repository.restore_unknown_call_logs(entries).await?;

        info!("Restored {} unknown call logs from {}", restored, path.display());
        Ok(restored)
    }
}

async fn send_blocking(
    transport: Arc<dyn SmsTransport>,
    number: String,
    message: String,
) -> Result<(), MonitorError> {
    tokio::task::spawn_blocking(move || transport.send(&number, &message))
        .await
        .map_err(|e| MonitorError::Transport(format!("SMS task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingTransport {
        fail: bool,
        calls: AtomicUsize,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingTransport {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: AtomicUsize::new(0),
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    impl SmsTransport for RecordingTransport {
        fn send(&self, phone_number: &str, message: &str) -> Result<(), MonitorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(MonitorError::Transport("radio off".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((phone_number.to_string(), message.to_string()));
            Ok(())
        }
    }

    struct FakeBlockList {
        available: bool,
        blocked: Mutex<Vec<String>>,
    }

    impl SystemBlockList for FakeBlockList {
        fn is_available(&self) -> bool {
            self.available
        }

        fn block(&self, phone_number: &str) -> Result<(), MonitorError> {
            self.blocked.lock().unwrap().push(phone_number.to_string());
            Ok(())
        }
    }

    fn block_list(available: bool) -> Arc<FakeBlockList> {
        Arc::new(FakeBlockList {
            available,
            blocked: Mutex::new(Vec::new()),
        })
    }

    async fn actions_with(
        primary: Arc<RecordingTransport>,
        fallback: Option<Arc<RecordingTransport>>,
        blocks: Arc<FakeBlockList>,
    ) -> (RemediationActions, Fixture) {
        let f = fixture(
            FakeContacts::default(),
            FakeCallLog::default(),
            FakeSpamList::default(),
        )
        .await;
        let actions = RemediationActions::new(
            f.repository.clone(),
            primary,
            fallback.map(|t| t as Arc<dyn SmsTransport>),
            blocks,
            "Who is this?".to_string(),
        );
        (actions, f)
    }

    #[tokio::test]
    async fn test_sms_primary_success() {
        let primary = RecordingTransport::new(false);
        let fallback = RecordingTransport::new(false);
        let (actions, _f) =
            actions_with(primary.clone(), Some(fallback.clone()), block_list(false)).await;

        let outcome = actions.send_sms("+1 555 123 4567", None).await.unwrap();
        assert_eq!(outcome, SmsOutcome::Primary);
        assert_eq!(
            primary.sent.lock().unwrap()[0],
            ("+15551234567".to_string(), "Who is this?".to_string())
        );
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sms_fallback_attempted_once() {
        let primary = RecordingTransport::new(true);
        let fallback = RecordingTransport::new(false);
        let (actions, _f) =
            actions_with(primary.clone(), Some(fallback.clone()), block_list(false)).await;

        let outcome = actions.send_sms("5550001111", Some("hello")).await.unwrap();
        assert_eq!(outcome, SmsOutcome::Fallback);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sms_both_paths_fail() {
        let primary = RecordingTransport::new(true);
        let fallback = RecordingTransport::new(true);
        let (actions, _f) =
            actions_with(primary.clone(), Some(fallback.clone()), block_list(false)).await;

        assert!(matches!(
            actions.send_sms("5550001111", None).await,
            Err(MonitorError::Transport(_))
        ));
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_block_uses_system_list_when_available() {
        let blocks = block_list(true);
        let (actions, _f) = actions_with(RecordingTransport::new(false), None, blocks.clone()).await;

        assert_eq!(
            actions.block_number("(555) 000-1111").await.unwrap(),
            BlockOutcome::System
        );
        assert_eq!(*blocks.blocked.lock().unwrap(), vec!["5550001111".to_string()]);
        assert!(!actions
            .repository()
            .is_number_blocked_locally("5550001111")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_block_falls_back_to_local() {
        let (actions, _f) =
            actions_with(RecordingTransport::new(false), None, block_list(false)).await;

        assert_eq!(
            actions.block_number("5550001111").await.unwrap(),
            BlockOutcome::Local
        );
        assert!(actions
            .repository()
            .is_number_blocked_locally("5550001111")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_log_detail() {
        let (actions, _f) =
            actions_with(RecordingTransport::new(false), None, block_list(false)).await;
        let id = actions
            .repository()
            .insert_unknown_call_log("5550001111", 1_700_000_000_000)
            .await
            .unwrap()
            .unwrap();
        actions.report_spam("5550001111").await.unwrap();

        let detail = actions.log_detail(id).await.unwrap();
        assert_eq!(detail.call_uri, "tel:5550001111");
        assert_eq!(detail.sms_uri, "sms:5550001111");
        assert!(detail.is_spam);
        assert!(!detail.is_blocked);
        assert_eq!(detail.formatted_time, format_timestamp(1_700_000_000_000));
        assert_eq!(detail.formatted_time.len(), "2023-11-14 22:13:20".len());
    }

    #[tokio::test]
    async fn test_export_then_restore_into_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        let (actions, _f) =
            actions_with(RecordingTransport::new(false), None, block_list(false)).await;

        actions.repository().insert_unknown_call_log("111", 10).await.unwrap();
        actions.repository().insert_unknown_call_log("222", 20).await.unwrap();
        assert_eq!(actions.export_logs(&path).await.unwrap(), 2);

        actions.repository().delete_all_unknown_call_logs().await.unwrap();
        assert_eq!(actions.restore_logs(&path).await.unwrap(), 2);
        assert_eq!(actions.repository().log_stream().current().len(), 2);
    }

    #[tokio::test]
    async fn test_restore_over_newer_log_counts_changed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(
            &path,
            r#"[{"phoneNumber":"5550001111","timestamp":100},
                {"phoneNumber":"5550002222","timestamp":1},
                {"phoneNumber":"555-000-2222","timestamp":2}]"#,
        )
        .unwrap();
        let (actions, _f) =
            actions_with(RecordingTransport::new(false), None, block_list(false)).await;
        actions
            .repository()
            .insert_unknown_call_log("5550001111", 500)
            .await
            .unwrap();

        assert_eq!(actions.restore_logs(&path).await.unwrap(), 1);

        let logs = actions.repository().get_unknown_call_logs().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!((logs[0].phone_number.as_str(), logs[0].timestamp), ("5550001111", 500));
        assert_eq!((logs[1].phone_number.as_str(), logs[1].timestamp), ("5550002222", 2));
    }

    #[tokio::test]
    async fn test_malformed_restore_applies_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(
            &path,
            r#"[{"phoneNumber":"111","timestamp":1},{"phoneNumber":"222","timestamp":"soon"}]"#,
        )
        .unwrap();
        let (actions, _f) =
            actions_with(RecordingTransport::new(false), None, block_list(false)).await;

        assert!(matches!(
            actions.restore_logs(&path).await,
            Err(MonitorError::Parse(_))
        ));
        assert!(actions
            .repository()
            .get_unknown_call_logs()
            .await
            .unwrap()
            .is_empty());
    }
}
