/// # gemgrind CLI Interface (Module)
///
/// Command parsing and orchestration for the `gemgrind` binary. All pipeline
/// logic (classification, conversion, acceptance) lives in `gemgrind-core`;
/// this module loads the config, acquires the Steam session and hands both to
/// [`gemgrind_core::grind`].
///
/// For programmatic/integration use: call [`run`] with a constructed [`Cli`].
use crate::load_config::load_config;
use crate::progress::BarProgress;
use crate::session::SteamSession;
use crate::steam::SteamCommunityClient;
use anyhow::Result;
use clap::{Parser, Subcommand};
use gemgrind_core::grind::grind;
use std::path::PathBuf;

/// CLI for gemgrind: turn duplicate Steam inventory items into gems.
#[derive(Parser)]
#[clap(
    name = "gemgrind",
    version,
    about = "Grind duplicate Steam Community inventory items into gems"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the inventory, select candidates and grind them into gems
    Grind {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Resolve gem values but do not convert anything
        #[clap(long)]
        dry_run: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Grind { config, dry_run } => {
            let mut config = load_config(config)?;
            config.grind.dry_run |= dry_run;
            config.grind.trace_loaded();

            let session = SteamSession::acquire(&config.credentials, &config.steam)?;
            let api = SteamCommunityClient::new(session, config.steam.profile.as_deref());
            let progress = BarProgress::new();

            match grind(&config.grind, &api, &config.accept, &progress).await {
                Ok(report) => {
                    tracing::info!(
                        command = "grind",
                        candidates = report.candidates,
                        completed = report.completed,
                        skipped = report.skipped.len(),
                        "Grind complete"
                    );
                    if config.grind.dry_run {
                        println!(
                            "Dry run: {} of {} candidates would be ground.",
                            report.planned.len(),
                            report.candidates
                        );
                    } else {
                        println!(
                            "Ground {} of {} candidates into gems ({} skipped).",
                            report.completed,
                            report.candidates,
                            report.skipped.len()
                        );
                    }
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "grind", error = %e, "Grind failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
