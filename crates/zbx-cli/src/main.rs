//! zbx-bootstrap - one-shot provisioning of a Zabbix server
//!
//! Waits for the web frontend, authenticates against the JSON-RPC API and
//! either imports a template document or registers a monitored host.

mod commands;

use clap::{Parser, Subcommand};
use commands::{EnsureHostCommand, ImportTemplateCommand, WaitCommand};
use tracing_subscriber::{layer::SubscriberExt, Layer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "ZBX_LOG_LEVEL", global = true)]
    log_level: String,

    /// Log format: compact, full
    #[arg(long, default_value = "compact", env = "ZBX_LOG_FORMAT", global = true)]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait until the Zabbix web frontend answers
    Wait(WaitCommand),
    /// Import a template document through configuration.import
    ImportTemplate(ImportTemplateCommand),
    /// Ensure the host group and host exist, linked to a template
    EnsureHost(EnsureHostCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = cli.log_level.clone();

    // RUST_LOG takes full control when set
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::try_from_default_env()?
    } else {
        tracing_subscriber::EnvFilter::try_new(format!(
            "zbx_cli={level},\
             zbx_core={level},\
             zbx_api={level},\
             zbx_provision={level},\
             h2=warn,\
             hyper=warn,\
             reqwest=warn",
            level = log_level
        ))?
    };

    let fmt_layer = match cli.log_format.as_str() {
        "full" => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(err) = run(cli.command) {
        commands::output::print_failure(&err);
        std::process::exit(1);
    }

    Ok(())
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Wait(wait_cmd) => wait_cmd.execute(),
        Commands::ImportTemplate(import_cmd) => import_cmd.execute(),
        Commands::EnsureHost(ensure_cmd) => ensure_cmd.execute(),
    }
}
