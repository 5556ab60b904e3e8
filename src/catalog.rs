//! Endpoint catalog for the Hacker News API.
//!
//! Resolves a [`Section`] to the resource holding its id list, and a
//! [`CandidateId`] to its item detail record. Built once from the validated
//! base URL, so every lookup is infallible.

use crate::config::Config;
use crate::models::{CandidateId, Section};
use url::Url;

#[derive(Debug, Clone)]
pub struct SectionCatalog {
    base_url: Url,
    sections: [Url; 3],
}

impl SectionCatalog {
    pub fn new(config: &Config) -> Self {
        let base_url = config.base_url.clone();
        let sections = Section::ALL.map(|s| endpoint(&base_url, &[&format!("{}.json", s.slug())]));
        Self { base_url, sections }
    }

    /// The id-list resource for `section`.
    pub fn resource_for(&self, section: Section) -> &Url {
        &self.sections[section.choice() - 1]
    }

    /// The detail record resource for one item.
    pub fn item_resource(&self, id: CandidateId) -> Url {
        endpoint(&self.base_url, &["item", &format!("{id}.json")])
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // Base URLs are checked to be hierarchical in `Config::from_settings`.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
