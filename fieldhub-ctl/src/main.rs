use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fieldhub::StoreConfig;
use fieldhub_core::identity::DeviceIdentity;
use fieldhub_core::{BatchReport, FieldHub, HubConfig, StoreCatalog};
use fieldhub_services::{AppConfig, ConfigSource, Credentials, StandardServices};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "fieldhub-ctl")]
#[command(about = "Runs and inspects a FieldHub service set")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the standard services and run until Ctrl-C
    Run {
        /// Hub configuration file (TOML, YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Application config JSON (stores, remote)
        #[arg(short, long)]
        app: PathBuf,
        /// Wait for this service to be running after the start pass
        #[arg(long)]
        wait_for: Option<String>,
        /// Seconds to wait for `--wait-for`
        #[arg(long, default_value_t = 30)]
        timeout: u64,
        /// Seconds the backend waits for a remote before failing
        #[arg(long)]
        backend_timeout: Option<u64>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Print the persisted device identifier
    DeviceId {
        #[arg(short, long)]
        data_dir: PathBuf,
    },
    /// Validate the store configs of an application config
    CheckStores {
        #[arg(short, long)]
        app: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            app,
            wait_for,
            timeout,
            backend_timeout,
            email,
            password,
        } => {
            let config = HubConfig::load(config.as_deref()).context("Failed to load hub config")?;
            init_logging(&config.log_level);
            let credentials = match (email, password) {
                (Some(email), Some(password)) => Some(Credentials::new(email, password)),
                _ => None,
            };
            run(config, app, wait_for, Duration::from_secs(timeout), backend_timeout, credentials)
                .await?;
        }
        Commands::DeviceId { data_dir } => {
            let identity = DeviceIdentity::load_or_create(&data_dir)
                .with_context(|| format!("Failed to load device identity from {:?}", data_dir))?;
            println!("{}", identity.install_id());
        }
        Commands::CheckStores { app } => {
            let app = AppConfig::read(&app).await?;
            check_stores(&app)?;
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run(
    config: HubConfig,
    app: PathBuf,
    wait_for: Option<String>,
    timeout: Duration,
    backend_timeout: Option<u64>,
    credentials: Option<Credentials>,
) -> Result<()> {
    let hub = FieldHub::new(config)?;
    info!("Device: {}", hub.device_identifier());

    let source = ConfigSource::File(app);
    let mut services = match backend_timeout {
        Some(secs) => StandardServices::with_backend_timeout(
            source,
            hub.discovery(),
            Duration::from_secs(secs),
        ),
        None => StandardServices::new(source, hub.discovery()),
    };
    match credentials {
        Some(credentials) => services = services.with_credentials(credentials),
        None => warn!("No credentials given, the auth service will fail to start"),
    }
    services.register(&hub)?;

    let mut events = hub.events();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            println!("EVENT: {}", event);
        }
    });

    // Subscribed before the start pass so no transition is missed.
    let ready = wait_for.map(|id| hub.service_running(&id));

    let report = hub.start_all_services().await;
    print_report("START", &report);

    if let Some(ready) = ready {
        let id = ready.service_id().to_string();
        match tokio::time::timeout(timeout, ready.wait()).await {
            Ok(Ok(_)) => println!("SUCCESS: {} is running", id),
            Ok(Err(e)) => eprintln!("ERROR: {}", e),
            Err(_) => eprintln!("ERROR: {} not running after {:?}", id, timeout),
        }
    }

    println!("Running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    let report = hub.stop_all_services().await;
    print_report("STOP", &report);
    printer.abort();
    Ok(())
}

fn print_report(title: &str, report: &BatchReport) {
    println!("{}", title);
    println!("{:<16} | {:<10} | {}", "SERVICE", "STATUS", "ERROR");
    println!("{:-<16}-+-{:-<10}-+-{:-<20}", "", "", "");
    for outcome in report.outcomes() {
        println!(
            "{:<16} | {:<10} | {}",
            outcome.id,
            outcome.status,
            outcome.error.as_deref().unwrap_or("")
        );
    }
}

fn check_stores(app: &AppConfig) -> Result<()> {
    println!("{:<24} | {:<8} | {:<32} | {}", "UNIQUEID", "TYPE", "URI", "RESULT");
    println!("{:-<24}-+-{:-<8}-+-{:-<32}-+-{:-<10}", "", "", "", "");

    let mut invalid = 0;
    for (index, value) in app.stores.iter().enumerate() {
        match StoreConfig::from_value(value) {
            Ok(store) => println!(
                "{:<24} | {:<8} | {:<32} | OK",
                store.unique_id(),
                store.store_type(),
                store.uri()
            ),
            Err(e) => {
                invalid += 1;
                println!("{:<24} | {:<8} | {:<32} | {}", format!("#{}", index), "", "", e);
            }
        }
    }
    if invalid > 0 {
        bail!("{} invalid store config(s)", invalid);
    }

    let catalog = StoreCatalog::from_structured_list(&app.stores)?;
    println!("SUCCESS: {} store(s)", catalog.len());
    Ok(())
}
