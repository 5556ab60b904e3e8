//! LLM-backed summarization with exponential backoff.
//!
//! The article page is downloaded and its text sent to an OpenAI-compatible
//! model through `awful_aj`. Transient model failures are retried by
//! [`RetryAsk`]; page download failures are not, because the page is not
//! going to change between attempts.
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..=max_jitter)
//! ```
//!
//! With the defaults: up to 5 retries at 1s, 2s, 4s, 8s, 16s plus 0–250ms jitter.

use super::Summarizer;
use super::page::fetch_page_text;
use crate::error::SummaryError;
use crate::utils::{truncate_chars, truncate_for_log};
use awful_aj::api::ask;
use awful_aj::{config, config::AwfulJadeConfig, config_dir, template, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Upper bound on article text sent to the model.
const MAX_PROMPT_CHARS: usize = 12_000;

/// Async question/answer exchange with a model.
pub trait AskAsync {
    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>>;
}

/// Backoff parameters for [`RetryAsk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based), without jitter.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(31) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    fn jittered(&self, attempt: usize) -> Duration {
        let jitter_ms = rng().random_range(0..=self.max_jitter.as_millis() as u64);
        self.backoff(attempt) + Duration::from_millis(jitter_ms)
    }
}

/// Decorator adding retries with exponential backoff to any [`AskAsync`].
pub struct RetryAsk<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: AskAsync> RetryAsk<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T: AskAsync> AskAsync for RetryAsk<T> {
    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let err = match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };
            attempt += 1;

            if attempt > self.policy.max_retries {
                error!(
                    attempt,
                    max = self.policy.max_retries,
                    elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                    error = %err,
                    "ask() exhausted retries"
                );
                return Err(err);
            }

            let delay = self.policy.jittered(attempt);
            warn!(
                attempt,
                max = self.policy.max_retries,
                ?delay,
                error = %err,
                "ask() attempt failed; backing off"
            );
            drop(err);
            sleep(delay).await;
        }
    }
}

/// [`AskAsync`] over `awful_aj::api::ask`.
#[derive(Debug)]
pub struct AskFnWrapper<'a> {
    pub config: &'a AwfulJadeConfig,
    pub template: &'a ChatTemplate,
}

impl AskAsync for AskFnWrapper<'_> {
    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(self.config, text.to_string(), self.template, None, None).await;
        if let Err(e) = &res {
            warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "Model call failed");
        }
        res
    }
}

/// Summarizes articles with the model and template configured for awful_aj.
pub struct LlmSummarizer {
    client: reqwest::Client,
    config: AwfulJadeConfig,
    template: ChatTemplate,
    policy: RetryPolicy,
}

impl LlmSummarizer {
    /// Load `config.yaml` from the awful_aj config directory and the named template.
    #[instrument(level = "info", skip(client))]
    pub async fn load(client: reqwest::Client, template_name: &str) -> Result<Self, Box<dyn Error>> {
        let template = template::load_template(template_name).await?;
        info!(template_name, "Loaded template");

        let conf_file = config_dir()?.join("config.yaml");
        let config_path = conf_file
            .to_str()
            .ok_or("awful_aj config path is not valid UTF-8")?;
        let config = config::load_config(config_path)?;
        info!(config_path, "Loaded model configuration");

        Ok(Self {
            client,
            config,
            template,
            policy: RetryPolicy::default(),
        })
    }
}

impl Summarizer for LlmSummarizer {
    #[instrument(level = "info", skip(self))]
    async fn summarize(&self, url: &str) -> Result<String, SummaryError> {
        let text = fetch_page_text(&self.client, url).await?;
        let prompt = truncate_chars(&text, MAX_PROMPT_CHARS);

        let t0 = Instant::now();
        let model = AskFnWrapper {
            config: &self.config,
            template: &self.template,
        };
        let response = RetryAsk::new(model, self.policy)
            .ask(prompt)
            .await
            .map_err(|e| SummaryError::Model(e.to_string()))?;

        let summary = response.trim();
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            preview = %truncate_for_log(summary, 120),
            "Model summary received"
        );
        if summary.is_empty() {
            return Err(SummaryError::Model("model returned an empty summary".to_string()));
        }
        Ok(summary.to_string())
    }
}
