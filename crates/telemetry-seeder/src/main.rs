//! CLI entry point for the telemetry seeder.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use telemetry_seeder::{
    generate_fleet, resolver_from_config, run_seeder, Config, DryRunPublisher, HttpPublisher,
    RunReport, SignalGenerator,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "telemetry-seeder")]
#[command(about = "Seed a telemetry store with synthetic sensor history")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate history and publish it to the ingestion endpoint
    Publish {
        #[command(flatten)]
        run: RunArgs,

        /// Fixed endpoint address (skips directory lookup)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Directory service base URL used to look up the endpoint
        #[arg(long)]
        directory_url: Option<String>,

        /// Topic to publish to
        #[arg(short, long)]
        topic: Option<String>,

        /// Delay between sample points in milliseconds
        #[arg(long)]
        pace_ms: Option<u64>,

        /// Generate and print payloads without sending them
        #[arg(long)]
        dry_run: bool,

        /// Output file for the JSON run report
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print generated payloads without publishing
    Preview {
        #[command(flatten)]
        run: RunArgs,

        /// Stop after this many payloads
        #[arg(short, long)]
        limit: Option<u64>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Days of history to generate
    #[arg(short, long)]
    days: Option<u32>,

    /// Samples per simulated day
    #[arg(short, long)]
    samples_per_day: Option<u32>,

    /// Number of simulated devices
    #[arg(long)]
    devices: Option<usize>,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    fn apply(self, config: &mut Config) {
        if let Some(days) = self.days {
            config.days = days;
        }
        if let Some(samples) = self.samples_per_day {
            config.samples_per_day = samples;
        }
        if let Some(count) = self.devices {
            config.devices = generate_fleet(count);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Publish {
            run,
            endpoint,
            directory_url,
            topic,
            pace_ms,
            dry_run,
            output,
        } => {
            run.apply(&mut config);
            if endpoint.is_some() {
                config.endpoint.address = endpoint;
            }
            if directory_url.is_some() {
                config.endpoint.directory_url = directory_url;
            }
            if let Some(topic) = topic {
                config.publish.topic = topic;
            }
            if let Some(ms) = pace_ms {
                config.publish.pace = Duration::from_millis(ms);
            }
            if output.is_some() {
                config.output_file = output;
            }
            config.validate()?;

            let report = publish(&config, dry_run).await?;
            report.print_summary();

            if let Some(path) = &config.output_file {
                std::fs::write(path, report.to_json())
                    .with_context(|| format!("Failed to write report to {}", path))?;
                info!("JSON report saved to: {}", path);
            }
        }

        Commands::Preview { run, limit } => {
            run.apply(&mut config);
            config.publish.pace = Duration::ZERO;
            config.publish.max_messages = limit.or(config.publish.max_messages);
            config.validate()?;

            let mut generator =
                SignalGenerator::new(config.signal.clone(), config.samples_per_day, config.seed);
            let mut publisher = DryRunPublisher::new();
            run_seeder(&config, &mut generator, &mut publisher, Utc::now()).await?;
        }
    }

    Ok(())
}

async fn publish(config: &Config, dry_run: bool) -> Result<RunReport> {
    let mut generator =
        SignalGenerator::new(config.signal.clone(), config.samples_per_day, config.seed);

    if dry_run {
        info!("Dry run: payloads are generated but not sent");
        let mut publisher = DryRunPublisher::new();
        return Ok(run_seeder(config, &mut generator, &mut publisher, Utc::now()).await?);
    }

    let resolver = resolver_from_config(&config.endpoint, config.publish.timeout)?;
    let endpoint = resolver
        .resolve()
        .await
        .context("Failed to resolve ingestion endpoint")?;
    info!("Publishing to {}", endpoint);

    let mut publisher = HttpPublisher::new(&endpoint, &config.publish)?;
    let report = run_seeder(config, &mut generator, &mut publisher, Utc::now())
        .await
        .context("Publishing aborted")?;

    Ok(report)
}
