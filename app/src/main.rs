// In app/src/main.rs

use analytics::PortfolioTracker;
use anyhow::{Context, Result};
use api_client::{ApiClient, LiveConnector};
use backtester::{DEFAULT_PRICE_COLUMN, EpisodeRunner, load_prices_csv};
use clap::{Parser, Subcommand};
use core_types::Symbol;
use engine::{LiveSession, PaperSession};
use environment::SimulationEnvironment;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A trading simulation environment with paper and live price feeds.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Streams live prices for a symbol, optionally paper trading them with a policy.
    Run {
        /// The trading symbol (e.g., "BTCUSDT").
        #[arg(short, long)]
        symbol: String,

        /// Trade the stream on a paper ledger instead of only monitoring it.
        #[arg(long)]
        paper: bool,

        /// Policy used in paper mode.
        #[arg(long, default_value = "ma_crossover")]
        policy: String,

        /// Stop after this many price updates.
        #[arg(long)]
        max_ticks: Option<usize>,

        /// Write the portfolio history and trades to this JSON file.
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Evaluates a policy on a historical price series in the simulation environment.
    Evaluate {
        /// CSV file containing the price series.
        #[arg(short, long)]
        data: PathBuf,

        /// Name of the price column in the CSV header.
        #[arg(long, default_value = DEFAULT_PRICE_COLUMN)]
        column: String,

        #[arg(long, default_value = "buy_and_hold")]
        policy: String,

        #[arg(long, default_value_t = 1)]
        episodes: usize,

        /// Write the last episode's history and trades to this JSON file.
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Fetches the exchange trading rules for a symbol.
    Rules {
        #[arg(short, long)]
        symbol: String,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments first so `--help` works without a config directory.
    let cli = Cli::parse();

    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let settings = app_config::load_settings().context("Failed to load configuration")?;

    let level: tracing::Level = settings
        .app
        .log_level
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid log level '{}'", settings.app.log_level))?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("tungstenite", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();

    match cli.command {
        Commands::Run {
            symbol,
            paper,
            policy,
            max_ticks,
            report,
        } => {
            handle_run(&settings, symbol, paper, &policy, max_ticks, report.as_deref()).await?;
        }
        Commands::Evaluate {
            data,
            column,
            policy,
            episodes,
            report,
        } => {
            handle_evaluate(&settings, &data, &column, &policy, episodes, report.as_deref())?;
        }
        Commands::Rules { symbol } => {
            handle_rules(&settings, symbol).await?;
        }
    }

    Ok(())
}

async fn handle_run(
    settings: &app_config::Settings,
    symbol: String,
    paper: bool,
    policy: &str,
    max_ticks: Option<usize>,
    report: Option<&Path>,
) -> Result<()> {
    let symbol = Symbol::new(symbol.to_uppercase());
    let connector = LiveConnector::new(settings.binance.ws_url());
    let prices = Box::pin(connector.stream_live_prices(&symbol));

    let tracker = if paper {
        let policy = policies::create_policy(policy, &settings.policies)?;
        let mut session = PaperSession::new(symbol, &settings.paper, policy);
        session.run(prices, max_ticks).await?;

        let ledger = session.ledger();
        let summary = ledger.lock().await.summary();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        session.tracker().clone()
    } else {
        let mut session = LiveSession::new(symbol);
        session.run(prices, max_ticks).await?;
        session.tracker().clone()
    };

    write_report(&tracker, report)
}

fn handle_evaluate(
    settings: &app_config::Settings,
    data: &Path,
    column: &str,
    policy: &str,
    episodes: usize,
    report: Option<&Path>,
) -> Result<()> {
    let prices = load_prices_csv(data, column)?;
    tracing::info!(path = %data.display(), points = prices.len(), "Loaded price series.");

    let env = SimulationEnvironment::new(prices, settings.environment.clone())?;
    let policy = policies::create_policy(policy, &settings.policies)?;
    let mut runner = EpisodeRunner::new(env, policy);
    let reports = runner.run(episodes)?;

    println!("{:<8} | {:>6} | {:>14} | {:>16} | {:>5} | {:>5} | {:>5}", "Episode", "Steps", "Total Reward", "Final Value", "Hold", "Buy", "Sell");
    for (i, episode) in reports.iter().enumerate() {
        println!(
            "{:<8} | {:>6} | {:>14.4} | {:>16.4} | {:>5} | {:>5} | {:>5}",
            i + 1,
            episode.steps,
            episode.total_reward,
            episode.final_portfolio_value,
            episode.actions.hold,
            episode.actions.buy,
            episode.actions.sell,
        );
    }

    if !reports.is_empty() {
        let mean = reports.iter().map(|r| r.total_reward).sum::<Decimal>() / Decimal::from(reports.len());
        println!("Mean total reward: {:.4}", mean);
        let summary = reports[reports.len() - 1].tracker.summary();
        println!("Max drawdown (last episode): {:.4}", summary.max_drawdown);
    }

    match reports.last() {
        Some(last) => write_report(&last.tracker, report),
        None => Ok(()),
    }
}

async fn handle_rules(settings: &app_config::Settings, symbol: String) -> Result<()> {
    let client = ApiClient::new(&settings.binance)?;
    let symbol = Symbol::new(symbol.to_uppercase());
    let rules = client.get_price_rules(&symbol).await?;
    println!("{}", serde_json::to_string_pretty(&rules)?);
    Ok(())
}

fn write_report(tracker: &PortfolioTracker, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    tracker
        .write_json(path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "Report written.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_is_handled_by_the_parser() {
        let err = Cli::try_parse_from(["rl-trader", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn evaluate_defaults() {
        let cli = Cli::try_parse_from(["rl-trader", "evaluate", "--data", "prices.csv"]).unwrap();
        match cli.command {
            Commands::Evaluate {
                data,
                column,
                policy,
                episodes,
                report,
            } => {
                assert_eq!(data, PathBuf::from("prices.csv"));
                assert_eq!(column, "price");
                assert_eq!(policy, "buy_and_hold");
                assert_eq!(episodes, 1);
                assert!(report.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
