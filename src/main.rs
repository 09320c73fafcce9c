//! # Topic Scout
//!
//! A topic-driven article search tool. Give it a comma-separated list of
//! topics, a per-topic article count, and a time window; it asks an
//! OpenAI-compatible chat endpoint for recent articles as strict JSON,
//! renders them grouped by topic, keeps a capped local history of searches
//! (with each search's full result set), and exports any result set to CSV.
//!
//! ## Usage
//!
//! ```sh
//! topic_scout search --topics "rust, distributed systems" --count 5 --range 2weeks
//! topic_scout history
//! topic_scout show 1
//! topic_scout export 1 --output ./exports
//! ```
//!
//! ## Architecture
//!
//! One search runs as a pipeline:
//! 1. **Prompt**: Build a per-topic request embedding count and start date
//! 2. **Complete**: Query the endpoint, one topic at a time
//! 3. **Validate**: Each reply must be a JSON array of five-field articles
//! 4. **Record**: On full success, upsert the search into the history store
//!
//! Any failure abandons the whole run and leaves stored history untouched.

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod history;
mod models;
mod outputs;
mod search;
mod store;
mod utils;

use api::ChatClient;
use cli::{Cli, Command};
use config::Config;
use error::{Result, ScoutError};
use history::HistoryStore;
use outputs::{csv, text};
use search::SearchWorkflow;
use store::FileStore;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Cli::parse();
    let config = Config::load(args.config.as_deref())?;
    debug!(api_base = %config.api_base, model = %config.model, "Configuration ready");

    let data_dir = config.resolve_data_dir()?;
    let history = HistoryStore::load(FileStore::open(&data_dir)?)?;
    debug!(
        path = %data_dir.display(),
        entries = history.entries().len(),
        "History loaded"
    );

    match args.command {
        Command::Search {
            topics,
            count,
            range,
            api_key,
            csv: export_csv,
            output,
        } => {
            let key = config.resolve_api_key(api_key)?;
            let client = ChatClient::new(&config.api_base, &config.model, config.temperature, key);
            let workflow = SearchWorkflow::new(client, history);

            let articles = workflow.execute(&topics, count, range).await?;
            print!("{}", text::render_results(&articles));

            if export_csv {
                ensure_writable_dir(&output).await?;
                if let Some(path) = csv::export(&articles, &output)? {
                    println!("Exported {}", path.display());
                }
            }
        }

        Command::History => {
            let counts: Vec<usize> = history
                .entries()
                .iter()
                .map(|p| history.articles_for(&p.timestamp).map_or(0, |a| a.len()))
                .collect();
            print!("{}", text::render_history(history.entries(), &counts));
        }

        Command::Show { index } => {
            let entry = index
                .checked_sub(1)
                .and_then(|i| history.entry(i))
                .ok_or(ScoutError::NoSuchHistoryEntry { index })?;
            print!("{}", text::render_show(entry));
        }

        Command::Export { index, output } => {
            let entry = index
                .checked_sub(1)
                .and_then(|i| history.entry(i))
                .ok_or(ScoutError::NoSuchHistoryEntry { index })?;
            let articles = history.articles_for(&entry.timestamp).unwrap_or(&[]);

            ensure_writable_dir(&output).await?;
            match csv::export(articles, &output)? {
                Some(path) => println!("Exported {}", path.display()),
                None => println!("No articles stored for this search"),
            }
        }
    }

    Ok(())
}
