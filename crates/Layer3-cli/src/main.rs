//! Rollcall CLI - Main entry point

mod script;
mod sinks;

use clap::{Parser, Subcommand};
use rollcall_foundation::{RollcallConfig, ZeroCapacityPolicy};
use rollcall_signup::{NoopSink, PromotionNotifier, RenderSink, SignupService};
use script::{Script, DEMO_SCRIPT};
use sinks::{StdoutBoard, StdoutDirectMessage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Rollcall - role sign-ups with FIFO waitlists
#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to global + project config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every board update, not just the final board
    #[arg(long)]
    live: bool,

    /// Print board updates as JSON (with --live)
    #[arg(long)]
    json: bool,

    /// Queue claims against zero-capacity roles instead of rejecting them
    #[arg(long)]
    queue_closed_roles: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a TOML sign-up script
    Run {
        /// Script path
        script: PathBuf,
    },
    /// Replay the built-in reference session
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => RollcallConfig::load_from(path)?,
        None => RollcallConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}", e);
            RollcallConfig::new()
        }),
    };
    if args.queue_closed_roles {
        config = config.with_zero_capacity(ZeroCapacityPolicy::Waitlist);
    }

    // Initialize logging
    let log_level = if args.debug { "debug" } else { config.log_level() };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let session = match &args.command {
        Command::Run { script } => Script::load(script)?,
        Command::Demo => Script::parse(DEMO_SCRIPT)?,
    };

    let render_sink: Arc<dyn RenderSink> = if args.live {
        Arc::new(StdoutBoard { json: args.json })
    } else {
        Arc::new(NoopSink)
    };
    let notifier: Arc<dyn PromotionNotifier> = Arc::new(StdoutDirectMessage);
    let service = SignupService::new(config, render_sink, notifier);

    let mut stdout = std::io::stdout();
    let summary = script::run(&service, &session, &mut stdout).await?;
    info!(
        applied = summary.applied,
        unchanged = summary.unchanged,
        rejected = summary.rejected,
        "Replay finished"
    );

    Ok(())
}
