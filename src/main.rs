use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tweet_harvest::collector::{Collector, CollectorSettings, TopicOutcome};
use tweet_harvest::config::{Config, ConfigOverrides, parse_amount};
use tweet_harvest::gopher::GopherClient;

#[derive(Parser, Debug)]
#[command(name = "tweet-harvest", version, about = "Collect tweets from the Gopher search API into JSON files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect tweets for one search query.
    Search {
        /// Search query, overrides QUERY.
        #[arg(short, long)]
        query: Option<String>,

        /// Number of tweets to collect, overrides AMOUNT.
        #[arg(short, long, value_parser = parse_amount)]
        amount: Option<usize>,

        /// Output directory, overrides DATA_DIR.
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Collect tweets for every currently trending topic.
    Trends {
        /// Number of tweets to collect per trend, overrides AMOUNT.
        #[arg(short, long, value_parser = parse_amount)]
        amount: Option<usize>,

        /// Output directory, overrides DATA_DIR.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Minimum likes filter appended to trend queries, overrides TREND_MIN_FAVES.
        #[arg(long)]
        min_faves: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Search {
            query,
            amount,
            data_dir,
        } => {
            let overrides = ConfigOverrides {
                query,
                amount,
                data_dir,
                trend_min_faves: None,
            };
            let config = Config::from_env(&overrides).context("invalid configuration")?;

            let collector = build_collector(&config)?;
            let report = collector
                .collect_query(&config.query, config.amount)
                .await
                .context("failed to collect tweets")?;
            tracing::info!(
                saved = report.saved,
                requests = report.requests,
                path = %report.path.display(),
                "successfully collected and saved tweets"
            );
        }
        Command::Trends {
            amount,
            data_dir,
            min_faves,
        } => {
            let overrides = ConfigOverrides {
                query: None,
                amount,
                data_dir,
                trend_min_faves: min_faves,
            };
            let config = Config::from_env(&overrides).context("invalid configuration")?;

            let collector = build_collector(&config)?;
            let report = collector
                .collect_trends(config.amount)
                .await
                .context("failed to collect trends")?;
            for topic in &report.topics {
                if let TopicOutcome::Saved(saved) = &topic.outcome {
                    tracing::info!(trend = %topic.trend, path = %saved.path.display(), "written");
                }
            }
        }
    }

    Ok(())
}

fn build_collector(config: &Config) -> anyhow::Result<Collector<GopherClient>> {
    let client = GopherClient::new(config.client_settings()).context("failed to create client")?;
    Ok(Collector::new(client, CollectorSettings::from(config)))
}
