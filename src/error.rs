//! Error types shared across the reader.
//!
//! Each layer absorbs the failures it can decide on and only surfaces the
//! rest:
//! - [`TransportError`]: one failed request against the remote API
//! - [`SummaryError`]: a summarizer backend could not produce text
//! - [`ConfigError`]: invalid settings detected at start-up
//! - [`InputError`]: the console stopped delivering lines
//! - [`SessionError`]: failures that end the interactive session

use reqwest::StatusCode;
use thiserror::Error;

/// A single request/response exchange failed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS, timeout or body read failure.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// The body was not valid JSON.
    #[error("malformed response body from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// A summarizer backend failed for one article.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("could not download article: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("article page returned HTTP {0}")]
    Status(StatusCode),

    #[error("no readable text found on the article page")]
    NoContent,

    #[error("language model request failed: {0}")]
    Model(String),
}

/// Settings that cannot be turned into a usable [`crate::config::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// The console can no longer be read from or written to.
#[derive(Debug, Error)]
pub enum InputError {
    /// Standard input reached end of file.
    #[error("input closed")]
    Closed,

    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures that terminate the interactive session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The candidate id list for a section could not be retrieved.
    #[error("could not load {section}: {source}")]
    SectionFetch {
        section: &'static str,
        #[source]
        source: TransportError,
    },

    /// The section list was retrieved but was not a list of ids.
    #[error("unexpected article list for {section}: {source}")]
    SectionFormat {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The section list was empty (or `null`).
    #[error("No articles found in {section}.")]
    NoArticles { section: &'static str },

    #[error(transparent)]
    Console(std::io::Error),
}

impl From<InputError> for SessionError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Closed => {
                SessionError::Console(std::io::Error::from(std::io::ErrorKind::UnexpectedEof))
            }
            InputError::Io(e) => SessionError::Console(e),
        }
    }
}
