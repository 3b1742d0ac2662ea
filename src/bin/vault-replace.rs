//! CLI for vault-replace.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vault_replace::prelude::*;

#[derive(Parser)]
#[command(name = "vault-replace")]
#[command(author, version, about = "Regex replace across vault notes", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace a pattern in every note. This modifies notes; make backups.
    Replace {
        /// Pattern to search for (regex); saved to settings
        #[arg(short, long)]
        pattern: Option<String>,

        /// Replacement text; saved to settings
        #[arg(short, long)]
        replacement: Option<String>,

        /// Glob of vault-relative paths to skip
        #[arg(long)]
        exclude: Vec<String>,

        /// Settings file (defaults to <vault>/.vault-replace/data.json)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Path to the vault
        #[arg(default_value = ".")]
        vault: PathBuf,
    },

    /// Show the stored settings
    Show {
        /// Settings file (defaults to <vault>/.vault-replace/data.json)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Path to the vault
        #[arg(default_value = ".")]
        vault: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_settings(settings: Option<PathBuf>, vault: &Path) -> JsonSettingsStore {
    match settings {
        Some(path) => JsonSettingsStore::new(path),
        None => JsonSettingsStore::for_vault(vault),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Replace {
            pattern,
            replacement,
            exclude,
            settings,
            vault,
        } => cmd_replace(pattern, replacement, exclude, settings, vault).await,
        Commands::Show { settings, vault } => cmd_show(settings, vault),
    }
}

async fn cmd_replace(
    pattern: Option<String>,
    replacement: Option<String>,
    exclude: Vec<String>,
    settings: Option<PathBuf>,
    vault: PathBuf,
) -> Result<()> {
    let mut store = VaultStore::open(&vault).context("Failed to open vault")?;
    for glob in exclude {
        store = store.exclude(glob);
    }

    let settings_store = Arc::new(open_settings(settings, &vault));
    let mut session = ReplaceSession::open(settings_store).context("Failed to load settings")?;

    if let Some(pattern) = pattern {
        session
            .set_find_pattern(pattern)
            .context("Failed to save pattern")?;
    }
    if let Some(replacement) = replacement {
        session
            .set_replacement(replacement)
            .context("Failed to save replacement")?;
    }

    if !session.can_replace() {
        println!(
            "Pattern '{}' is empty or invalid; nothing to replace.",
            session.pattern().source()
        );
        return Ok(());
    }

    let sink: Arc<dyn ProgressSink> = if std::io::stderr().is_terminal() {
        Arc::new(NoticeSink::new())
    } else {
        Arc::new(LogSink)
    };

    let summary = session
        .replace_all(Arc::new(store), sink)
        .await
        .context("Replace failed")?;

    if let Some(summary) = summary {
        for name in &summary.modified_names {
            println!("{name}");
        }
        for (name, reason) in &summary.failures {
            eprintln!("skipped {name}: {reason}");
        }
    }

    Ok(())
}

fn cmd_show(settings: Option<PathBuf>, vault: PathBuf) -> Result<()> {
    let store = open_settings(settings, &vault);
    let settings = store.load().context("Failed to load settings")?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
