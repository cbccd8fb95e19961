use providers::{
    CommandSmsTransport, CsvCallLogProvider, FileSystemBlockList, JsonSpamList,
    OutboxSmsTransport, VcfContactsProvider,
};
use shared_types::{CallLogProvider, SmsTransport};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::actions::RemediationActions;
use crate::config::MonitorConfig;
use crate::monitor::CallMonitor;
use crate::receiver::{CallReceiver, Clock, SystemClock};
use crate::repository::CallerRepository;

/// Everything the CLI and the HTTP server share, wired from one config
pub struct Services {
    pub repository: Arc<CallerRepository>,
    pub actions: Arc<RemediationActions>,
    pub monitor: Arc<CallMonitor>,
    pub receiver: Arc<CallReceiver>,
    pub incoming: Option<mpsc::UnboundedReceiver<String>>,
    pub db_path: PathBuf,
}

fn source_path(configured: &Option<PathBuf>, data_dir: &Path, file_name: &str) -> PathBuf {
    configured
        .clone()
        .unwrap_or_else(|| data_dir.join(file_name))
}

pub async fn build_services(config: &MonitorConfig) -> anyhow::Result<Services> {
    let db_path = super::database::get_db_path(config)?;
    let db = super::database::initialize_database(config)?;
    let data_dir = db_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let sources = &config.sources;
    let contacts = Arc::new(VcfContactsProvider::new(source_path(
        &sources.contacts_path,
        &data_dir,
        "contacts.vcf",
    )));
    let call_log: Arc<dyn CallLogProvider> = Arc::new(CsvCallLogProvider::new(source_path(
        &sources.call_log_path,
        &data_dir,
        "calls.csv",
    )));
    let spam_list = Arc::new(JsonSpamList::new(source_path(
        &sources.spam_list_path,
        &data_dir,
        "spam_numbers.json",
    )));

    let repository = Arc::new(CallerRepository::new(db, contacts, call_log.clone(), spam_list).await?);

    let outbox: Arc<dyn SmsTransport> = Arc::new(OutboxSmsTransport::new(
        config
            .sms
            .outbox_path
            .clone()
            .unwrap_or_else(|| super::database::default_outbox_path(&db_path)),
    ));
    let (sms_primary, sms_fallback) = match config.sms.command.as_deref() {
        Some([program, args @ ..]) => {
            let command: Arc<dyn SmsTransport> =
                Arc::new(CommandSmsTransport::new(program.clone(), args.to_vec()));
            (command, Some(outbox))
        }
        _ => (outbox, None),
    };

    let actions = Arc::new(RemediationActions::new(
        repository.clone(),
        sms_primary,
        sms_fallback,
        Arc::new(FileSystemBlockList::new(config.blocking.system_blocklist_path.clone())),
        config.sms.monitoring_message.clone(),
    ));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (tx, rx) = mpsc::unbounded_channel();
    let receiver = Arc::new(CallReceiver::new(clock.clone(), call_log, tx));
    let monitor = Arc::new(CallMonitor::new(repository.clone(), clock));

    Ok(Services {
        repository,
        actions,
        monitor,
        receiver,
        incoming: Some(rx),
        db_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use shared_types::PhoneSignal;

    #[tokio::test]
    async fn test_services_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("contacts.vcf"),
            "BEGIN:VCARD\nFN:Mum\nTEL:+1 555 000 1111\nEND:VCARD\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("calls.csv"),
            "number,type,date\n+15550001111,1,300\n555-000-2222,1,200\n555-000-2222,1,100\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("spam_numbers.json"), r#"["5550002222"]"#).unwrap();

        let config = MonitorConfig {
            database: DatabaseConfig {
                path: Some(dir.path().join("db.sqlite")),
            },
            ..Default::default()
        };
        let mut services = build_services(&config).await.unwrap();

        let summary = services.repository.import_all_unknown_call_logs().await.unwrap();
        assert_eq!(summary.imported, 1);
        assert!(services.repository.is_number_spam("555 000 2222").await);

        let incoming = services.incoming.take().unwrap();
        let monitor = services.monitor.clone();
        let handler = tokio::spawn(monitor.run(incoming));

        services.receiver.handle_signal(&PhoneSignal::ringing(Some("555-000-3333")));
        let mut rx = services.repository.log_stream().subscribe();
        while rx.borrow_and_update().len() < 2 {
            rx.changed().await.unwrap();
        }
        assert_eq!(
            services.monitor.last_caller().unwrap().phone_number,
            "5550003333"
        );

        // Without a configured command the outbox is the only transport
        services.actions.send_sms("5550003333", None).await.unwrap();
        assert!(dir.path().join("sms_outbox.jsonl").exists());

        drop(services);
        handler.await.unwrap();
    }
}
