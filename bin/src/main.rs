//! almanac CLI - Download open economic and market data.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod display;

use commands::Options;
use display::Format;

#[derive(Parser)]
#[command(name = "almanac")]
#[command(about = "Download open data from FRED, EIA and Yahoo Finance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Read API keys from this file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Federal Reserve Economic Data (FRED)
    Fred {
        #[command(subcommand)]
        action: FredAction,
    },

    /// Download rows from an EIA Open Data API v2 URL
    Eia {
        /// Data URL copied from the EIA API browser
        url: String,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,

        /// Output CSV file
        #[arg(short, long, default_value = "data/EIA/eia_data.csv")]
        output: PathBuf,

        /// Rows per request (max 5000)
        #[arg(long, default_value = "5000")]
        page_size: u32,

        /// Pause between page requests in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,
    },

    /// Download price bars from Yahoo Finance
    Yahoo {
        /// Ticker symbol (e.g., SPY, AAPL, BTC-USD)
        ticker: String,

        /// Start date (YYYY-MM-DD). Defaults to the earliest available bar.
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD, inclusive). Defaults to today.
        #[arg(short, long)]
        end: Option<String>,

        /// Bar interval (1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo)
        #[arg(short, long, default_value = "1d")]
        interval: String,

        /// Output directory. Files named <TICKER>_<interval>_data.<format>
        #[arg(long, default_value = "data/yFinance")]
        output_dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },

    /// List providers and well-known series
    List {
        /// Search pattern for well-known series
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show provider or series details
    Info {
        /// Provider (fred, eia, yahoo) or well-known series ID
        id: String,
    },
}

/// FRED actions.
#[derive(Subcommand)]
enum FredAction {
    /// Download one series with its metadata
    Series {
        /// Series ID (e.g., GDP, DGS10, CPIAUCSL)
        id: String,

        /// Start date (YYYY-MM-DD). Defaults to the full history.
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to the latest observation.
        #[arg(short, long)]
        end: Option<String>,

        /// Output directory
        #[arg(long, default_value = "data/FRED")]
        output_dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },

    /// Search series by keyword
    Search {
        /// Search text
        text: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: u32,

        /// Also save the results as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Crawl the category tree and list every series
    Crawl {
        /// Category to start from (0 is the root)
        #[arg(long, default_value = "0")]
        root: u64,

        /// Output CSV file
        #[arg(short, long, default_value = "fred_all_series.csv")]
        output: PathBuf,

        /// Pause between requests in milliseconds
        #[arg(long, default_value = "500")]
        delay_ms: u64,

        /// Save intermediate results every N series
        #[arg(long, default_value = "10000")]
        checkpoint: usize,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Installs the console subscriber. `RUST_LOG` takes precedence over flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let opts = Options {
        env_file: cli.env_file,
        quiet: cli.quiet,
    };

    match command {
        Commands::Fred { action } => match action {
            FredAction::Series {
                id,
                start,
                end,
                output_dir,
                format,
            } => {
                commands::fred::series(
                    &opts,
                    &id,
                    start.as_deref(),
                    end.as_deref(),
                    &output_dir,
                    format,
                )
                .await
            }
            FredAction::Search {
                text,
                limit,
                output,
            } => commands::fred::search(&opts, &text, limit, output.as_deref()).await,
            FredAction::Crawl {
                root,
                output,
                delay_ms,
                checkpoint,
                yes,
            } => commands::fred::crawl(&opts, root, &output, delay_ms, checkpoint, yes).await,
        },
        Commands::Eia {
            url,
            start,
            end,
            output,
            page_size,
            delay_ms,
        } => {
            commands::eia::download(
                &opts,
                &url,
                start.as_deref(),
                end.as_deref(),
                &output,
                page_size,
                delay_ms,
            )
            .await
        }
        Commands::Yahoo {
            ticker,
            start,
            end,
            interval,
            output_dir,
            format,
        } => {
            commands::yahoo::download(
                &opts,
                &ticker,
                start.as_deref(),
                end.as_deref(),
                &interval,
                &output_dir,
                format,
            )
            .await
        }
        Commands::List { search } => commands::list::list(search.as_deref()),
        Commands::Info { id } => commands::info::show_info(&opts, &id),
    }
}
