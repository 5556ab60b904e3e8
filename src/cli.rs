//! Command-line interface definitions for the Hacker News reader.
//!
//! Every option can also be supplied through an environment variable or a
//! YAML settings file (see [`crate::config`]). Command-line values win over
//! the file, and the file wins over built-in defaults.

use crate::config::SummarizerKind;
use clap::Parser;

/// Command-line arguments for the reader.
///
/// # Examples
///
/// ```sh
/// # Browse with the built-in extractive summarizer
/// hn_news_reader
///
/// # Show eight articles per section and summarize with the configured LLM
/// hn_news_reader -n 8 --summarizer llm --template news_summarizer
///
/// # Load settings from a file
/// hn_news_reader --config ~/.config/hn_news_reader.yaml
/// ```
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, env = "HN_READER_CONFIG")]
    pub config: Option<String>,

    /// Base URL of the Hacker News API
    #[arg(long, env = "HN_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Maximum number of articles listed per section
    #[arg(short = 'n', long, env = "HN_READER_MAX_ARTICLES")]
    pub max_articles: Option<usize>,

    /// Summarization backend
    #[arg(short, long, value_enum, env = "HN_READER_SUMMARIZER")]
    pub summarizer: Option<SummarizerKind>,

    /// Number of sentences kept by the extractive summarizer
    #[arg(long, env = "HN_READER_SUMMARY_SENTENCES")]
    pub summary_sentences: Option<usize>,

    /// awful_aj chat template used by the LLM summarizer
    #[arg(short, long, env = "HN_READER_TEMPLATE")]
    pub template: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "HN_READER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Column at which summaries are wrapped
    #[arg(short, long, env = "HN_READER_WRAP_WIDTH")]
    pub wrap_width: Option<usize>,

    /// Hide the progress bar while articles are fetched
    #[arg(long)]
    pub no_progress: bool,
}
