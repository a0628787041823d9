//! `HerbTrace` CLI
//!
//! Runs the terminal UI, or a single headless command when one is given.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use herbtrace_cli::herb_cmd::{self, HerbAction};
use herbtrace_cli::tui;
use herbtrace_core::config::{self, Config};
use herbtrace_core::tracing_init::{init_file_tracing, init_tracing};
use herbtrace_core::{Backend, HerbDatabase};

#[derive(Parser, Debug)]
#[command(name = "herbtrace")]
#[command(version, about = "Ayurvedic herb traceability", long_about = None)]
struct Cli {
    /// Hosted object store URL (in-memory store when unset)
    #[arg(long, env = "HERBTRACE_STORE_URL")]
    store_url: Option<String>,

    /// Object store API key
    #[arg(long, env = "HERBTRACE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Listing page size; lookups only see this many newest batches
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    list_limit: Option<u32>,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,

    /// Log file for the terminal UI
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<HerbAction>,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if let Some(ref url) = self.store_url {
            config.store.base_url = Some(url.clone());
        }
        if let Some(ref key) = self.api_key {
            config.store.api_key = Some(key.clone());
        }
        if let Some(limit) = self.list_limit {
            config.store.list_limit = limit;
        }
        if self.log_json {
            config.logging.json = true;
        }
        if let Some(ref file) = self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().ok();
    let mut config = config::load_config(cwd.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    let level = &config.logging.level;
    let filter = format!("herbtrace={level},herbtrace_cli={level},herbtrace_core={level}");

    // Use file-based tracing for TUI mode to avoid polluting terminal
    if cli.command.is_some() {
        init_tracing(&filter, config.logging.json);
    } else {
        let path = config
            .logging
            .file
            .clone()
            .or_else(|| config::data_dir().map(|d| d.join("herbtrace.log")))
            .context("no log file location; pass --log-file")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        init_file_tracing(&filter, config.logging.json, file);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting herbtrace");

    let backend = Backend::from_config(&config.store)?;
    info!(store = backend.label(), limit = config.store.list_limit, "Object store ready");
    let db = HerbDatabase::new(backend).with_list_limit(config.store.list_limit);

    match cli.command {
        Some(action) => herb_cmd::run(&db, action).await,
        None => tui::run(db).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn list_limit_flag_overrides_config() {
        let cli = Cli::try_parse_from(["herbtrace", "--list-limit", "7"]).unwrap();
        let mut config = Config::default();
        cli.apply_to(&mut config);
        assert_eq!(config.store.list_limit, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_list_limit_flag_is_rejected() {
        assert!(Cli::try_parse_from(["herbtrace", "--list-limit", "0"]).is_err());
    }
}
