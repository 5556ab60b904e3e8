//! Article summarization backends.
//!
//! The navigation layer only sees the [`Summarizer`] trait. Two backends
//! implement it:
//!
//! | Backend | Module | Needs |
//! |---------|--------|-------|
//! | Extractive | [`extractive`] | Nothing beyond HTTP access to the article |
//! | LLM | [`llm`] | An awful_aj `config.yaml` and chat template |
//!
//! Both download the article page and pull its paragraph text through
//! [`page::fetch_page_text`] before summarizing.

pub mod extractive;
pub mod llm;
pub mod page;

use crate::config::{Config, SummarizerKind};
use crate::error::SummaryError;
use extractive::ExtractiveSummarizer;
use llm::LlmSummarizer;
use std::error::Error;
use tracing::{info, instrument};

/// Produces summary text for the article behind a URL.
pub trait Summarizer {
    /// Summarize the article at `url`.
    ///
    /// # Errors
    ///
    /// Any failure to download, read or summarize the page.
    async fn summarize(&self, url: &str) -> Result<String, SummaryError>;
}

/// The backend selected at start-up.
pub enum SummarizerBackend {
    Extractive(ExtractiveSummarizer),
    Llm(LlmSummarizer),
}

impl SummarizerBackend {
    /// Build the backend named in `config`, sharing `client` for page downloads.
    ///
    /// # Errors
    ///
    /// The LLM backend fails here when its configuration or template cannot
    /// be loaded.
    #[instrument(level = "info", skip_all, fields(kind = ?config.summarizer))]
    pub async fn from_config(
        config: &Config,
        client: reqwest::Client,
    ) -> Result<Self, Box<dyn Error>> {
        let backend = match config.summarizer {
            SummarizerKind::Extractive => SummarizerBackend::Extractive(
                ExtractiveSummarizer::new(client, config.summary_sentences),
            ),
            SummarizerKind::Llm => {
                SummarizerBackend::Llm(LlmSummarizer::load(client, &config.template).await?)
            }
        };
        info!("Summarizer ready");
        Ok(backend)
    }
}

impl Summarizer for SummarizerBackend {
    async fn summarize(&self, url: &str) -> Result<String, SummaryError> {
        match self {
            SummarizerBackend::Extractive(s) => s.summarize(url).await,
            SummarizerBackend::Llm(s) => s.summarize(url).await,
        }
    }
}
