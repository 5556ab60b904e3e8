//! Deterministic fakes for the network-facing traits.

use crate::catalog::SectionCatalog;
use crate::config::{Config, Settings};
use crate::error::{SummaryError, TransportError};
use crate::gateway::RemoteGateway;
use crate::models::{CandidateId, Section};
use crate::summarizer::Summarizer;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use url::Url;

pub fn config() -> Config {
    Config::from_settings(Settings {
        show_progress: false,
        ..Default::default()
    })
    .unwrap()
}

/// Serves canned JSON keyed by URL and records every request.
pub struct FakeGateway {
    catalog: SectionCatalog,
    responses: HashMap<String, Value>,
    calls: RefCell<Vec<String>>,
}

impl FakeGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            catalog: SectionCatalog::new(config),
            responses: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_section(mut self, section: Section, ids: &[u64]) -> Self {
        let url = self.catalog.resource_for(section).to_string();
        self.responses.insert(url, json!(ids));
        self
    }

    pub fn with_section_body(mut self, section: Section, body: Value) -> Self {
        let url = self.catalog.resource_for(section).to_string();
        self.responses.insert(url, body);
        self
    }

    /// A displayable story with a title and url derived from `id`.
    pub fn with_story(self, id: u64) -> Self {
        self.with_item(
            id,
            json!({
                "id": id,
                "type": "story",
                "by": "pg",
                "time": 1_700_000_000 + id as i64,
                "title": format!("Story {id}"),
                "url": format!("https://news.example/{id}"),
            }),
        )
    }

    pub fn with_item(mut self, id: u64, body: Value) -> Self {
        let url = self.catalog.item_resource(CandidateId(id)).to_string();
        self.responses.insert(url, body);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn item_calls(&self) -> Vec<u64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|url| {
                url.rsplit_once("/item/")
                    .and_then(|(_, tail)| tail.strip_suffix(".json"))
                    .and_then(|id| id.parse().ok())
            })
            .collect()
    }
}

impl RemoteGateway for FakeGateway {
    async fn fetch(&self, resource: &Url) -> Result<Value, TransportError> {
        let url = resource.to_string();
        self.calls.borrow_mut().push(url.clone());
        match self.responses.get(&url) {
            Some(value) => Ok(value.clone()),
            None => Err(TransportError::Status {
                url,
                status: StatusCode::SERVICE_UNAVAILABLE,
            }),
        }
    }
}

/// Returns `"Summary of <url>"` unless the url was marked as failing.
#[derive(Default)]
pub struct FakeSummarizer {
    failing: HashSet<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeSummarizer {
    pub fn failing_for(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Summarizer for FakeSummarizer {
    async fn summarize(&self, url: &str) -> Result<String, SummaryError> {
        self.calls.borrow_mut().push(url.to_string());
        if self.failing.contains(url) {
            Err(SummaryError::NoContent)
        } else {
            Ok(format!("Summary of {url}"))
        }
    }
}
