//! Data models for sections, remote items and the article batches shown to the user.
//!
//! - [`Section`]: the closed set of browsable Hacker News sections
//! - [`CandidateId`]: an item id that may or may not resolve to a displayable story
//! - [`ItemRecord`]: the raw item detail record returned by the API
//! - [`Article`]: a validated story with its position in the current batch
//! - [`ArticleBatch`]: the bounded, append-only list built for one section visit

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// A browsable section of the remote news source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Top,
    New,
    Best,
}

impl Section {
    /// All sections in menu order.
    pub const ALL: [Section; 3] = [Section::Top, Section::New, Section::Best];

    /// Map a main-menu selector (1..=3) to a section.
    pub fn from_choice(choice: usize) -> Option<Section> {
        match choice {
            1 => Some(Section::Top),
            2 => Some(Section::New),
            3 => Some(Section::Best),
            _ => None,
        }
    }

    /// The selector shown next to this section in the main menu.
    pub fn choice(self) -> usize {
        match self {
            Section::Top => 1,
            Section::New => 2,
            Section::Best => 3,
        }
    }

    /// Resource name of the id list on the remote API.
    pub fn slug(self) -> &'static str {
        match self {
            Section::Top => "topstories",
            Section::New => "newstories",
            Section::Best => "beststories",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Top => "Top Stories",
            Section::New => "New Stories",
            Section::Best => "Best Stories",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An opaque remote item id, in the relevance order returned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Item detail record as returned by `item/{id}.json`.
///
/// Every field is optional: deleted items, jobs, polls and comments all come
/// back through the same endpoint with different subsets populated.
#[derive(Debug, Default, Deserialize)]
pub struct ItemRecord {
    pub title: Option<String>,
    pub url: Option<String>,
    pub by: Option<String>,
    pub score: Option<i64>,
    /// Creation time in unix seconds.
    pub time: Option<i64>,
}

/// A validated story with a title and a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// 1-based position inside the batch it was accepted into.
    pub display_index: usize,
    pub title: String,
    pub url: String,
    pub author: Option<String>,
    pub score: Option<i64>,
    pub published: Option<DateTime<Utc>>,
}

impl Article {
    /// Validate a record and turn it into an article at `display_index`.
    ///
    /// Returns `None` when the title or url is missing or blank.
    pub fn from_record(display_index: usize, record: ItemRecord) -> Option<Article> {
        let title = non_blank(record.title)?;
        let url = non_blank(record.url)?;
        Some(Article {
            display_index,
            title,
            url,
            author: non_blank(record.by),
            score: record.score,
            published: record.time.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// The articles built for one section visit.
///
/// Append-only and bounded by `capacity`; display indices always run
/// `1..=len()` without gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBatch {
    articles: Vec<Article>,
    capacity: usize,
}

impl ArticleBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            articles: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Validate `record` and append it with the next display index.
    ///
    /// Returns `false` when the record is not displayable or the batch is full.
    pub fn try_accept(&mut self, record: ItemRecord) -> bool {
        if self.is_full() {
            return false;
        }
        match Article::from_record(self.articles.len() + 1, record) {
            Some(article) => {
                self.articles.push(article);
                true
            }
            None => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.articles.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Look up an article by its 1-based display index.
    pub fn get(&self, display_index: usize) -> Option<&Article> {
        display_index
            .checked_sub(1)
            .and_then(|i| self.articles.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.articles.iter()
    }
}
