//! Headless Dominion session runner.
//!
//! Runs scripted game sessions without graphics, for CI verification
//! and replay checking.
//!
//! # Usage
//!
//! ```bash
//! # Run a scripted session and save its replay
//! cargo run -p dominion_headless -- run --players 8 --ticks 1200 --output session.replay
//!
//! # Verify a recorded replay reproduces its final hash
//! cargo run -p dominion_headless -- verify --input session.replay
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dominion_core::replay::{Replay, ReplayPlayer};
use dominion_headless::session::{run_session, SessionParams};

#[derive(Parser)]
#[command(name = "dominion_headless")]
#[command(about = "Headless Dominion session runner for CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session
    Run {
        /// Number of standard players
        #[arg(short, long, default_value = "4")]
        players: u32,

        /// Ticks to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,

        /// Seed for the grant script
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Write the recorded replay here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a recorded replay reproduces its final hash
    Verify {
        /// Replay file to check
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Run {
            players,
            ticks,
            seed,
            output,
        } => {
            let params = SessionParams {
                players,
                ticks,
                seed,
            };
            let outcome = match run_session(&params) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(error = %e, "session failed");
                    return ExitCode::FAILURE;
                }
            };
            println!("final_tick={}", outcome.game.ticks());
            println!("final_hash={:#018x}", outcome.game.state_hash());

            if let Some(path) = output {
                if let Err(e) = outcome.replay.save(&path) {
                    tracing::error!(error = %e, path = %path.display(), "replay save failed");
                    return ExitCode::FAILURE;
                }
                tracing::info!(path = %path.display(), "replay saved");
            }
            ExitCode::SUCCESS
        }

        Commands::Verify { input } => {
            let replay = match Replay::load(&input) {
                Ok(replay) => replay,
                Err(e) => {
                    tracing::error!(error = %e, path = %input.display(), "replay load failed");
                    return ExitCode::FAILURE;
                }
            };
            let expected = replay.final_hash;
            let mut player = match ReplayPlayer::new(replay) {
                Ok(player) => player,
                Err(e) => {
                    tracing::error!(error = %e, "replay restore failed");
                    return ExitCode::FAILURE;
                }
            };
            match player.verify() {
                Ok(true) => {
                    println!("verified final_hash={expected:#018x}");
                    ExitCode::SUCCESS
                }
                Ok(false) => {
                    tracing::error!(
                        expected = expected,
                        actual = player.game().state_hash(),
                        "replay hash mismatch"
                    );
                    ExitCode::FAILURE
                }
                Err(e) => {
                    tracing::error!(error = %e, "replay verification failed");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
