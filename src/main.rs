//! # HN News Reader
//!
//! An interactive terminal client for the Hacker News API. Pick a section,
//! get a short list of readable stories, and read a generated summary of any
//! of them before going back to the list.
//!
//! ## Usage
//!
//! ```sh
//! hn_news_reader
//! hn_news_reader --max-articles 8 --summarizer llm
//! ```
//!
//! ## Architecture
//!
//! 1. **Catalog**: map a section to its id-list resource on the API
//! 2. **Acquisition**: walk the ids in order, keeping the first N readable stories
//! 3. **Navigation**: a loop over explicit menu states (main menu, listing, reading)
//! 4. **Summarization**: extractive by default, or an LLM through awful_aj
//!
//! Logs go to stderr and default to `warn`; set `RUST_LOG=info` to see the
//! request flow.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tokio::io::{BufReader, stdin, stdout};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod acquire;
mod catalog;
mod cli;
mod config;
mod error;
mod gateway;
mod input;
mod models;
mod navigation;
mod render;
mod summarizer;
#[cfg(test)]
mod testing;
mod utils;

use catalog::SectionCatalog;
use cli::Cli;
use config::Config;
use gateway::HttpGateway;
use input::Prompter;
use navigation::{Navigator, SessionEnd};
use summarizer::SummarizerBackend;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Session aborted");
            eprintln!("{}", render::fatal_message(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

#[instrument(level = "info", skip_all)]
async fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    let start_time = std::time::Instant::now();

    let config = Config::load(args).await?;
    info!(
        base_url = %config.base_url,
        max_articles = config.max_articles,
        summarizer = ?config.summarizer,
        "Configuration loaded"
    );

    let catalog = SectionCatalog::new(&config);
    let gateway = HttpGateway::new(&config)?;
    let summarizer = SummarizerBackend::from_config(&config, gateway.client().clone()).await?;

    let console = Prompter::new(BufReader::new(stdin()), stdout());
    let mut navigator = Navigator::new(&config, &catalog, &gateway, &summarizer, console);
    let end = navigator.run().await?;

    let elapsed = start_time.elapsed();
    info!(?end, secs = elapsed.as_secs(), "Session complete");
    if end == SessionEnd::InputClosed {
        debug!("Input closed before an explicit exit");
    }
    Ok(())
}
