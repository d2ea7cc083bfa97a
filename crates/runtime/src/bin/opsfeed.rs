//! Operations feed console.
//!
//! Prints every event as one JSON line on stdout and reads operator input
//! from stdin. Logs and console replies go to stderr.

use anyhow::Context;
use clap::Parser;
use opsfeed_runtime::{init_tracing, parse_line, ConsoleCommand, Feed, FeedConfig};
use opsfeed_types::Event;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "opsfeed")]
#[command(about = "Live logistics operations feed")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interval between ambient events (e.g. "500ms", "2s")
    #[arg(long)]
    cadence: Option<humantime::Duration>,

    /// Do not start the ambient generator
    #[arg(long)]
    no_ambient: bool,

    /// Directory holding <id>.json scenario files
    #[arg(long)]
    scenario_dir: Option<PathBuf>,

    /// Seed for reproducible ambient traffic
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Configuration file (or defaults) with command-line overrides applied.
    fn load_config(&self) -> anyhow::Result<FeedConfig> {
        let mut config = match &self.config {
            Some(path) => FeedConfig::from_file(path)?,
            None => FeedConfig::default(),
        };

        if let Some(cadence) = &self.cadence {
            config.ambient = config.ambient.with_cadence(**cadence);
        }
        if self.no_ambient {
            config.ambient.enabled = false;
        }
        if let Some(seed) = self.seed {
            config.ambient = config.ambient.with_seed(seed);
        }
        if let Some(dir) = &self.scenario_dir {
            config.scenarios = config.scenarios.with_dir(dir);
        }

        config.validate()?;
        Ok(config)
    }
}

fn print_event(out: &mut impl Write, event: &Event) {
    match serde_json::to_string(event) {
        Ok(line) => {
            if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
                warn!(error = ?e, "Failed to write event");
            }
        }
        Err(e) => warn!(error = ?e, sequence = %event.sequence(), "Failed to encode event"),
    }
}

fn reply(value: &impl serde::Serialize) {
    match serde_json::to_string(value) {
        Ok(line) => eprintln!("{line}"),
        Err(e) => warn!(error = ?e, "Failed to encode reply"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("loading configuration")?;
    init_tracing(&config.telemetry);

    let feed = Feed::new(config).context("building feed")?;
    let mut subscription = feed.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            print_event(&mut std::io::stdout().lock(), &event);
        }
        if let Some(reason) = subscription.drop_reason() {
            warn!(?reason, "Console subscription dropped");
        }
    });

    feed.start();
    info!(
        scenario_dir = %feed.config().scenarios.dir.display(),
        ambient = feed.config().ambient.enabled,
        "Feed running; type a command, /scenario <id>, /health, /history or /quit"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            line = lines.next_line() => line.context("reading stdin")?,
        };
        let Some(line) = line else {
            break;
        };

        match parse_line(&line) {
            ConsoleCommand::Chat(text) => reply(&feed.submit_command(&text)),
            ConsoleCommand::Scenario(id) => reply(&feed.trigger_scenario(&id)),
            ConsoleCommand::Health => reply(&feed.health()),
            ConsoleCommand::History => {
                for event in feed.history() {
                    print_event(&mut std::io::stderr().lock(), &event);
                }
            }
            ConsoleCommand::Quit => break,
            ConsoleCommand::Invalid(message) => eprintln!("{message}"),
        }
    }

    feed.shutdown().await;
    printer.abort();
    Ok(())
}
