//! asm-collector - Tenable ASM input for Splunk
//!
//! Runs one collector, writes its events to stdout as JSON lines and exits.
//! Splunk schedules the binary as a scripted input from the app's `bin/`
//! directory; with no subcommand it collects inventory statistics.
//!
//! # Usage
//! ```sh
//! asm-collector                      # inventory stats
//! asm-collector --app-dir ./app users
//! ASM_API_KEY=... asm-collector check
//! ```
//!
//! # Environment Variables
//! - `SPLUNK_HOME` - Used to locate `etc/apps/<app>/{default,local}/asm_settings.conf`
//! - `ASM_API_KEY`, `ASM_PROXY`, `ASM_TIMEOUT_SECONDS`, ... - Override conf file settings
//! - `ASM_LOG_LEVEL` / `RUST_LOG` - Log verbosity (logs go to stderr)

use anyhow::Context;
use asm_collector::application::collectors::CollectorKind;
use asm_collector::application::runner;
use asm_collector::config::{CONF_STANZA, ObservabilityEnvConfig};
use asm_collector::infrastructure::observability::init_logging;
use asm_collector::infrastructure::settings::{
    ConfFileSettings, EnvSettings, LayeredSettings, resolve_app_dir,
};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "asm-collector", version, about = "Tenable ASM input for Splunk")]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Splunk app directory holding default/ and local/ asm_settings.conf"
    )]
    app_dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        conflicts_with = "app_dir",
        help = "Read settings from this single .conf file instead of the app directory"
    )]
    conf_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Asset totals for the inventory (default)
    InventoryStats,
    /// Asset limit and whether it has been reached
    AssetLimit,
    /// One event per inventory
    Inventories,
    /// One event per user
    Users,
    /// Number of active suggestions
    SuggestionCount,
    /// Active and archived suggestions
    Suggestions,
    /// TXT record search results
    TxtRecords,
    /// Paged user action audit log
    UserActionLogs,
    /// Verify credentials and proxy settings
    Check,
}

impl From<Commands> for CollectorKind {
    fn from(command: Commands) -> Self {
        match command {
            Commands::InventoryStats => CollectorKind::InventoryStats,
            Commands::AssetLimit => CollectorKind::AssetLimit,
            Commands::Inventories => CollectorKind::Inventories,
            Commands::Users => CollectorKind::Users,
            Commands::SuggestionCount => CollectorKind::SuggestionCount,
            Commands::Suggestions => CollectorKind::Suggestions,
            Commands::TxtRecords => CollectorKind::TxtRecords,
            Commands::UserActionLogs => CollectorKind::UserActionLogs,
            Commands::Check => CollectorKind::ConnectionCheck,
        }
    }
}

/// Environment first, then the conf file layers.
fn load_settings(cli: &Cli) -> anyhow::Result<LayeredSettings> {
    let conf = match (&cli.conf_file, resolve_app_dir(cli.app_dir.as_deref())) {
        (Some(path), _) => ConfFileSettings::from_files(std::slice::from_ref(path), CONF_STANZA)?,
        (None, Some(app_dir)) => ConfFileSettings::for_app_dir(&app_dir)?,
        (None, None) => ConfFileSettings::default(),
    };
    debug!("Settings files: {:?}", conf.sources());

    Ok(LayeredSettings::new()
        .with_layer(EnvSettings::new())
        .with_layer(conf))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging(&ObservabilityEnvConfig::from_env());

    let cli = Cli::parse();
    let kind: CollectorKind = cli.command.map(Into::into).unwrap_or_default();
    let collector = kind.collector();

    info!("asm-collector {} starting: {}", env!("CARGO_PKG_VERSION"), kind);

    let result = match load_settings(&cli).context("Failed to load settings") {
        Ok(settings) => runner::run(collector.as_ref(), &settings)
            .await
            .map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };

    let outcome = runner::emit(&mut io::stdout().lock(), collector.error_event_type(), result);
    info!("asm-collector finished: {:?}", outcome);

    ExitCode::from(outcome.exit_code())
}
