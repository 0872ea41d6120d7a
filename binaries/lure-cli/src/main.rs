//! Lure CLI
//!
//! Runs the decoy shell and inspects persisted sessions.

mod console;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lure_config::LureConfig;
use lure_core::EventKind;
use lure_engine::{escalation, DecoyEngine, DecoyTerminal};
use lure_ledger::{JsonFileStore, KvStore, SessionLedger};
use serde_json::Map;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleUi;

#[derive(Parser)]
#[command(name = "lure")]
#[command(about = "Lure - decoy desktop session engine")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/lure/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where sessions are persisted
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// JSON log output on stderr
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive decoy terminal
    Shell {
        /// Continue a persisted session
        #[arg(long)]
        resume: Option<String>,

        /// Skip the response delay
        #[arg(long)]
        no_delay: bool,
    },

    /// Print a session's log
    Logs {
        session: String,
    },

    /// Write a session's log as JSON
    Export {
        session: String,

        /// Output file (default: <prefix>_<session>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear a session's log
    Clear {
        session: String,
    },

    /// Show the lockdown payload captured for a session
    Lockdown {
        session: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config = load_config(cli.config.as_deref(), cli.state_dir.clone())?;
    let store = open_store(&config)?;

    match cli.command {
        Commands::Shell { resume, no_delay } => cmd_shell(config, store, resume, no_delay).await,
        Commands::Logs { session } => cmd_logs(&config, store, &session),
        Commands::Export { session, output } => {
            let path = cmd_export(&config, store, &session, output)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        Commands::Clear { session } => cmd_clear(&config, store, &session),
        Commands::Lockdown { session } => cmd_lockdown(store.as_ref(), &session),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lure=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>, state_dir: Option<PathBuf>) -> Result<LureConfig> {
    let mut config = match path {
        Some(path) => {
            let mut config = LureConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            config.apply_env()?;
            config
        }
        None => LureConfig::load_or_default()?,
    };

    if let Some(dir) = state_dir {
        config.state_dir = Some(dir);
    }
    config.validate()?;
    Ok(config)
}

fn open_store(config: &LureConfig) -> Result<Arc<dyn KvStore>> {
    let dir = config.state_dir();
    let store = JsonFileStore::open(&dir)
        .with_context(|| format!("opening state dir {}", dir.display()))?;
    debug!(dir = %dir.display(), "state store opened");
    Ok(Arc::new(store))
}

async fn cmd_shell(
    config: LureConfig,
    store: Arc<dyn KvStore>,
    resume: Option<String>,
    no_delay: bool,
) -> Result<()> {
    let engine = match resume {
        Some(id) => DecoyEngine::resume(config, store, ConsoleUi::new(), &id)?,
        None => DecoyEngine::new(config, store, ConsoleUi::new())?,
    };

    let terminal = if no_delay {
        DecoyTerminal::immediate(engine)
    } else {
        DecoyTerminal::new(engine)
    };

    let user_agent = format!(
        "lure-cli/{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );
    console::run_shell(terminal, &user_agent).await
}

fn cmd_logs(config: &LureConfig, store: Arc<dyn KvStore>, session: &str) -> Result<()> {
    let ledger = SessionLedger::open(store, session, config.log_prefix.as_str());
    if ledger.is_empty() {
        println!("No log entries for session {}", session);
    } else {
        println!("{}", ledger.render());
    }
    Ok(())
}

fn cmd_export(
    config: &LureConfig,
    store: Arc<dyn KvStore>,
    session: &str,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let ledger = SessionLedger::open(store, session, config.log_prefix.as_str());
    let path = output.unwrap_or_else(|| PathBuf::from(ledger.export_file_name()));
    std::fs::write(&path, ledger.export_all())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn cmd_clear(config: &LureConfig, store: Arc<dyn KvStore>, session: &str) -> Result<()> {
    let mut ledger = SessionLedger::open(store, session, config.log_prefix.as_str());
    let dropped = ledger.len();
    ledger.clear();
    ledger.record(EventKind::LogsCleared, Map::new());
    println!("Cleared {} entries from session {}", dropped, session);
    Ok(())
}

fn cmd_lockdown(store: &dyn KvStore, session: &str) -> Result<()> {
    match escalation::load_payload(store, session)? {
        Some(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
        None => println!("No lockdown recorded for session {}", session),
    }
    Ok(())
}
