//! imbalance-forecast CLI: order search and one-step SARIMA forecasting.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use imbalance_forecast::config::PipelineConfig;
use imbalance_forecast::io::{load_series, write_forecast, write_search_table};
use imbalance_forecast::models::arima::{parse_triple, SarimaOrder};
use imbalance_forecast::pipeline::{run_forecast, run_search};
use imbalance_forecast::search::LogProgress;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "imbalance-forecast")]
#[command(author, version)]
#[command(about = "Seasonal ARIMA order search and one-step forecasting for grid imbalance")]
#[command(long_about = "Seasonal ARIMA order search and one-step forecasting for grid imbalance.

EXAMPLES:
  # Rank the default order grid by validation RMSE
  imbalance-forecast search --input imbalance.csv --output search.csv --jobs 7

  # Forecast the test range with a chosen order
  imbalance-forecast forecast --input imbalance.csv --output sarima.csv --order 2,1,1 --seasonal 0,1,1")]
struct Cli {
    /// Increase verbosity (-v, -vv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the order grid and write the ranked diagnostics table
    Search {
        /// Input series file
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Output table file
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// JSON configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Number of search workers
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Per-candidate estimation budget in seconds
        #[arg(long, value_name = "SECONDS")]
        timeout_secs: Option<f64>,
    },
    /// Fit the final order and write one-step forecasts for the test range
    Forecast {
        /// Input series file
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Output forecast file
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// JSON configuration file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Non-seasonal order as p,d,q
        #[arg(long, value_name = "P,D,Q")]
        order: Option<String>,

        /// Seasonal order as P,D,Q
        #[arg(long, value_name = "P,D,Q")]
        seasonal: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let fallback = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Search {
            input,
            output,
            config,
            jobs,
            timeout_secs,
        } => handle_search(&input, &output, config.as_deref(), jobs, timeout_secs),
        Commands::Forecast {
            input,
            output,
            config,
            order,
            seasonal,
        } => handle_forecast(&input, &output, config.as_deref(), order, seasonal),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("reading configuration {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn handle_search(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    jobs: Option<usize>,
    timeout_secs: Option<f64>,
) -> Result<()> {
    let mut config = load_config(config)?;
    if jobs.is_some() {
        config.concurrency = jobs;
    }
    if timeout_secs.is_some() {
        config.candidate_timeout_secs = timeout_secs;
    }
    config.validate().context("validating configuration")?;

    let series = load_series(input, &config.format, &config.value_column, config.period)
        .with_context(|| format!("loading input {}", input.display()))?;
    let table = run_search(&series, &config, &LogProgress)
        .context("order search")?
        .table;

    write_search_table(&table, output)
        .with_context(|| format!("writing search table {}", output.display()))?;

    match table.best() {
        Some(best) => println!("best order: {} ({})", best.order, best.outcome),
        None => bail!("no candidate order could be scored"),
    }
    Ok(())
}

fn handle_forecast(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    order: Option<String>,
    seasonal: Option<String>,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(order) = order {
        config.order = parse_triple(&order).context("parsing --order")?;
    }
    if let Some(seasonal) = seasonal {
        config.seasonal_order = parse_triple(&seasonal).context("parsing --seasonal")?;
    }
    config.validate().context("validating configuration")?;
    let order: SarimaOrder = config.final_order();

    let series = load_series(input, &config.format, &config.value_column, config.period)
        .with_context(|| format!("loading input {}", input.display()))?;
    let forecast = run_forecast(&series, &config, order)
        .with_context(|| format!("one-step forecast with SARIMA{}", order))?
        .forecast;

    write_forecast(&forecast, output, &config.format)
        .with_context(|| format!("writing forecast {}", output.display()))?;
    println!("wrote {} forecasts to {}", forecast.len(), output.display());
    Ok(())
}
