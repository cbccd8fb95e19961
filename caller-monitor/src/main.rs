use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use caller_monitor::actions::format_timestamp;
use caller_monitor::config::MonitorConfig;
use caller_monitor::handlers;
use caller_monitor::helpers::services::{build_services, Services};
use caller_monitor::CallerRepository;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[get("/health")]
async fn health(repository: web::Data<Arc<CallerRepository>>) -> impl Responder {
    match repository.get_unknown_call_logs().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Log and act on calls from unknown numbers", long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Use this config file instead of the per-user default
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Import unknown incoming calls from the call history
    Import,
    /// List logged unknown calls, newest first
    List,
    /// Delete one logged call
    Delete { id: i64 },
    /// Delete every logged call
    Clear,
    /// Block a number (system block list when available, otherwise locally)
    Block { number: String },
    /// Remove a local block
    Unblock { number: String },
    /// Report a number as spam
    ReportSpam { number: String },
    /// Show whether a number is a contact, blocked or spam
    Check { number: String },
    /// Export logged calls to a JSON file
    Export { path: PathBuf },
    /// Restore logged calls from a JSON export
    Restore { path: PathBuf },
    /// Send the monitoring SMS (or a custom message) to a number
    Sms {
        number: String,
        #[arg(long)]
        message: Option<String>,
    },
}

fn init_tracing(log_file_path: Option<String>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("caller-monitor.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path);

    let (config, config_path) = MonitorConfig::load(args.config.as_deref())?;
    let services = build_services(&config).await?;

    run_command(
        args.command.unwrap_or(Commands::Serve),
        config,
        config_path,
        services,
    )
    .await
}

async fn run_command(
    command: Commands,
    config: MonitorConfig,
    config_path: PathBuf,
    services: Services,
) -> anyhow::Result<()> {
    let repository = services.repository.clone();
    let actions = services.actions.clone();

    match command {
        Commands::Serve => return serve(config, config_path, services).await,
        Commands::Import => {
            if let Err(e) = repository.check_call_log_access() {
                println!("Call log permission required: {}", e);
                return Ok(());
            }
            let summary = repository.import_all_unknown_call_logs().await?;
            println!(
                "Imported {} unknown call logs ({} calls, {} incoming, {} unknown)",
                summary.imported, summary.total_calls, summary.incoming_calls, summary.unknown_numbers
            );
        }
        Commands::List => {
            for log in repository.get_unknown_call_logs().await? {
                println!("{:>6}  {}  {}", log.id, format_timestamp(log.timestamp), log.phone_number);
            }
        }
        Commands::Delete { id } => {
            if repository.delete_unknown_call_log(id).await? {
                println!("Deleted log {}", id);
            } else {
                println!("No log with id {}", id);
            }
        }
        Commands::Clear => {
            let deleted = repository.delete_all_unknown_call_logs().await?;
            println!("Deleted {} logs", deleted);
        }
        Commands::Block { number } => {
            let outcome = actions.block_number(&number).await?;
            println!("Blocked {} ({:?})", number, outcome);
        }
        Commands::Unblock { number } => {
            if repository.unblock_number_locally(&number).await? {
                println!("Unblocked {}", number);
            } else {
                println!("{} was not blocked locally", number);
            }
        }
        Commands::ReportSpam { number } => {
            actions.report_spam(&number).await?;
            println!("Reported {} as spam", number);
        }
        Commands::Check { number } => {
            println!("number:      {}", shared_types::normalize_number(&number));
            println!("in contacts: {}", repository.is_number_in_contacts(&number));
            println!("blocked:     {}", repository.is_number_blocked_locally(&number).await?);
            println!("spam:        {}", repository.is_number_spam(&number).await);
        }
        Commands::Export { path } => {
            let exported = actions.export_logs(&path).await?;
            println!("Exported {} logs to {}", exported, path.display());
        }
        Commands::Restore { path } => {
            let restored = actions.restore_logs(&path).await?;
            println!("Restored {} logs from {}", restored, path.display());
        }
        Commands::Sms { number, message } => {
            let outcome = actions.send_sms(&number, message.as_deref()).await?;
            println!("SMS sent to {} ({:?})", number, outcome);
        }
    }

    Ok(())
}

async fn serve(
    config: MonitorConfig,
    config_path: PathBuf,
    mut services: Services,
) -> anyhow::Result<()> {
    let (host, port) = config.host_and_port();
    tracing::info!("Server will listen on {}:{}", host, port);

    // Handle numbers emitted by the call receiver
    if let Some(incoming) = services.incoming.take() {
        tokio::spawn(services.monitor.clone().run(incoming));
    }

    // Observe the log stream like a list view would
    let mut log_updates = services.repository.log_stream().subscribe();
    tokio::spawn(async move {
        while log_updates.changed().await.is_ok() {
            let count = log_updates.borrow_and_update().len();
            tracing::info!("Unknown call logs updated: {} logs", count);
        }
    });

    // Import call history shortly after startup
    let repository_startup = services.repository.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        if let Err(e) = repository_startup.check_call_log_access() {
            tracing::warn!("Skipping startup import: {}", e);
            return;
        }

        match repository_startup.import_all_unknown_call_logs().await {
            Ok(summary) => {
                tracing::info!("Startup import completed: {} unknown call logs imported", summary.imported);
            }
            Err(e) => {
                tracing::warn!("Failed to run startup import: {}", e);
            }
        }
    });

    let settings_state = handlers::settings::SettingsAppState {
        config: Arc::new(config.clone()),
        config_path,
        db_path: services.db_path.clone(),
    };
    let repository = services.repository.clone();
    let actions = services.actions.clone();
    let receiver = services.receiver.clone();
    let monitor = services.monitor.clone();

    println!("Starting server on {}:{}", host, port);

    let server = HttpServer::new(move || {
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(repository.clone()))
            .app_data(web::Data::new(actions.clone()))
            .app_data(web::Data::new(receiver.clone()))
            .app_data(web::Data::new(monitor.clone()))
            .app_data(web::Data::new(settings_state.clone()))
            .service(health)
            .route("/api/settings", web::get().to(handlers::settings::get_settings))
            .route("/api/logs", web::get().to(handlers::logs::list_logs))
            .route("/api/logs", web::delete().to(handlers::logs::delete_all_logs))
            .route("/api/logs/refresh", web::post().to(handlers::logs::refresh_logs))
            .route("/api/logs/export", web::post().to(handlers::logs::export_logs))
            .route("/api/logs/restore", web::post().to(handlers::logs::restore_logs))
            .route("/api/logs/{id}", web::get().to(handlers::logs::get_log))
            .route("/api/logs/{id}", web::delete().to(handlers::logs::delete_log))
            .route("/api/numbers/block", web::post().to(handlers::numbers::block_number))
            .route("/api/numbers/unblock", web::post().to(handlers::numbers::unblock_number))
            .route("/api/numbers/blocked", web::get().to(handlers::numbers::list_blocked))
            .route("/api/numbers/spam", web::post().to(handlers::numbers::report_spam))
            .route("/api/numbers/spam", web::get().to(handlers::numbers::list_spam))
            .route("/api/numbers/spam/check", web::post().to(handlers::numbers::check_spam))
            .route("/api/numbers/sms", web::post().to(handlers::numbers::send_sms))
            .route("/api/calls/signal", web::post().to(handlers::calls::receive_signal))
            .route("/api/calls/last", web::get().to(handlers::calls::last_caller))
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await?;
    Ok(())
}
