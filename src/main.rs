// src/main.rs
mod extractors;
mod finanzen;
mod utils;

use clap::{Parser, Subcommand};
use serde::Serialize;

use finanzen::{chart, estimates, fundamentals, indices, models, quote, search};
use utils::html_debug;
use utils::AppError;

/// Command Line Interface for scraping stock data from finanzen.net
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Save every fetched page into this directory with the recognized
    /// landmarks highlighted (for diagnosing markup drift)
    #[arg(long, value_name = "DIR")]
    debug_html: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Balance sheet, income statement and key ratios of a stock
    Fundamentals {
        /// Name slug (e.g. "basf") or ISIN
        stock: String,
    },
    /// Performance overview from the stock's chart page
    Chart {
        stock: String,
    },
    /// Analyst estimates for the coming years
    Estimates {
        stock: String,
    },
    /// Current price summary from a specific exchange
    Quote {
        stock: String,

        /// Exchange code (e.g. TGT, FSE, XETRA)
        #[arg(short, long, default_value = models::DEFAULT_EXCHANGE)]
        exchange: String,
    },
    /// Search stocks by name, WKN or ISIN
    Search {
        query: String,

        /// Maximum number of results to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Known index overview pages
    Indices,
    /// Stocks listed on an index page
    IndexStocks {
        /// Index page URL, as listed by the indices subcommand
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);

    if let Some(dir) = &args.debug_html {
        std::env::set_var(html_debug::DEBUG_DIR_ENV, dir);
        tracing::info!("Annotated page dumps go to {}", dir);
    }

    // 3. Dispatch
    match args.command {
        Command::Fundamentals { stock } => {
            print_json(&fundamentals::get_fundamentals(&stock).await?)?;
        }
        Command::Chart { stock } => {
            print_json(&chart::get_chart_infos(&stock).await?)?;
        }
        Command::Estimates { stock } => {
            print_json(&estimates::get_estimates(&stock).await?)?;
        }
        Command::Quote { stock, exchange } => {
            print_json(&quote::get_quote(&stock, &exchange).await?)?;
        }
        Command::Search { query, limit } => {
            let results = search::search_stock(&query, limit).await?;
            if results.is_empty() {
                println!("No results for '{}'", query);
            }
            for result in &results {
                println!("{}: {}", result.name, result.slug.as_deref().unwrap_or("-"));
            }
        }
        Command::Indices => {
            print_json(&indices::get_indices().await?)?;
        }
        Command::IndexStocks { url } => {
            print_json(&indices::get_stocks_in_index(&url).await?)?;
        }
    }

    Ok(())
}

/// Prints a result record to stdout, wrapped in an envelope carrying
/// the retrieval timestamp.
fn print_json<T: Serialize>(data: &T) -> Result<(), AppError> {
    let envelope = serde_json::json!({
        "retrieved_at": chrono::Utc::now().to_rfc3339(),
        "data": data,
    });

    let rendered = serde_json::to_string_pretty(&envelope)
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", rendered);

    Ok(())
}
