//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! command-line flags. The merged [`Settings`] are validated once into an
//! immutable [`Config`] that the rest of the program borrows.
//!
//! # Settings file
//!
//! ```yaml
//! base_url: https://hacker-news.firebaseio.com/v0
//! max_articles: 5
//! summarizer: extractive   # or `llm`
//! summary_sentences: 5
//! template: news_summarizer
//! timeout_secs: 30
//! wrap_width: 80
//! show_progress: true
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use clap::ValueEnum;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";
pub const DEFAULT_MAX_ARTICLES: usize = 5;
pub const DEFAULT_SUMMARY_SENTENCES: usize = 5;
pub const DEFAULT_TEMPLATE: &str = "news_summarizer";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_WRAP_WIDTH: usize = 80;

const MIN_WRAP_WIDTH: usize = 20;

/// Which [`crate::summarizer::Summarizer`] backend reads articles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerKind {
    /// Frequency-scored sentence extraction, no external service needed.
    #[default]
    Extractive,
    /// An OpenAI-compatible model configured through awful_aj.
    Llm,
}

/// Unvalidated settings as read from a file and the command line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub base_url: String,
    pub max_articles: usize,
    pub summarizer: SummarizerKind,
    pub summary_sentences: usize,
    pub template: String,
    pub timeout_secs: u64,
    pub wrap_width: usize,
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_articles: DEFAULT_MAX_ARTICLES,
            summarizer: SummarizerKind::default(),
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
            template: DEFAULT_TEMPLATE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            wrap_width: DEFAULT_WRAP_WIDTH,
            show_progress: true,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    #[instrument(level = "debug")]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;
        Self::from_yaml_str(&yaml, path)
    }

    /// Overlay any values given on the command line.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(n) = cli.max_articles {
            self.max_articles = n;
        }
        if let Some(kind) = cli.summarizer {
            self.summarizer = kind;
        }
        if let Some(n) = cli.summary_sentences {
            self.summary_sentences = n;
        }
        if let Some(template) = &cli.template {
            self.template = template.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(width) = cli.wrap_width {
            self.wrap_width = width;
        }
        if cli.no_progress {
            self.show_progress = false;
        }
    }
}

/// Validated, immutable configuration shared by every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// API root; always ends with a `/` so endpoint paths can be appended.
    pub base_url: Url,
    /// Target size of each article batch.
    pub max_articles: usize,
    pub summarizer: SummarizerKind,
    pub summary_sentences: usize,
    pub template: String,
    pub request_timeout: Duration,
    pub wrap_width: usize,
    pub show_progress: bool,
}

impl Config {
    /// Build the configuration from defaults, the optional file named by
    /// `--config`, and command-line overrides.
    #[instrument(level = "info", skip_all)]
    pub async fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut settings = match &cli.config {
            Some(path) => {
                let settings = Settings::load(path).await?;
                info!(path = %path, "Loaded settings file");
                settings
            }
            None => Settings::default(),
        };
        settings.apply_cli(cli);
        debug!(?settings, "Merged settings");
        Self::from_settings(settings)
    }

    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&settings.base_url)?;

        if settings.max_articles == 0 {
            return Err(ConfigError::Invalid {
                key: "max_articles",
                message: "must be at least 1".to_string(),
            });
        }
        if settings.summary_sentences == 0 {
            return Err(ConfigError::Invalid {
                key: "summary_sentences",
                message: "must be at least 1".to_string(),
            });
        }
        if settings.wrap_width < MIN_WRAP_WIDTH {
            return Err(ConfigError::Invalid {
                key: "wrap_width",
                message: format!("must be at least {MIN_WRAP_WIDTH}"),
            });
        }
        if settings.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            base_url,
            max_articles: settings.max_articles,
            summarizer: settings.summarizer,
            summary_sentences: settings.summary_sentences,
            template: settings.template,
            request_timeout: Duration::from_secs(settings.timeout_secs),
            wrap_width: settings.wrap_width,
            show_progress: settings.show_progress,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::BaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be used as a base"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_validate() {
        let config = Config::from_settings(Settings::default()).unwrap();

        assert_eq!(
            config.base_url.as_str(),
            "https://hacker-news.firebaseio.com/v0/"
        );
        assert_eq!(config.max_articles, 5);
        assert_eq!(config.summarizer, SummarizerKind::Extractive);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.wrap_width, 80);
    }

    #[test]
    fn test_yaml_partial_keeps_defaults() {
        let yaml = "max_articles: 8\nsummarizer: llm\n";
        let settings = Settings::from_yaml_str(yaml, "reader.yaml").unwrap();

        assert_eq!(settings.max_articles, 8);
        assert_eq!(settings.summarizer, SummarizerKind::Llm);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(settings.show_progress);
    }

    #[test]
    fn test_yaml_unknown_key_rejected() {
        let err = Settings::from_yaml_str("max_article: 3\n", "reader.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut settings = Settings::from_yaml_str("max_articles: 8\nwrap_width: 60\n", "f").unwrap();
        let cli = Cli::parse_from(["hn_news_reader", "-n", "2", "--no-progress"]);
        settings.apply_cli(&cli);

        assert_eq!(settings.max_articles, 2);
        assert_eq!(settings.wrap_width, 60);
        assert!(!settings.show_progress);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let settings = Settings {
            base_url: "http://127.0.0.1:9000/api/v0".to_string(),
            ..Default::default()
        };
        let config = Config::from_settings(settings).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:9000/api/v0/");
    }

    #[test]
    fn test_invalid_base_urls_rejected() {
        for raw in ["not a url", "mailto:someone@example.com", "ftp://example.com/v0"] {
            let settings = Settings {
                base_url: raw.to_string(),
                ..Default::default()
            };
            let err = Config::from_settings(settings).unwrap_err();
            assert!(matches!(err, ConfigError::BaseUrl { .. }), "{raw} accepted");
        }
    }

    #[test]
    fn test_zero_max_articles_rejected() {
        let settings = Settings {
            max_articles: 0,
            ..Default::default()
        };
        let err = Config::from_settings(settings).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "max_articles", .. }));
    }

    #[test]
    fn test_narrow_wrap_width_rejected() {
        let settings = Settings {
            wrap_width: 5,
            ..Default::default()
        };
        assert!(Config::from_settings(settings).is_err());
    }

    #[tokio::test]
    async fn test_missing_settings_file() {
        let err = Settings::load("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
