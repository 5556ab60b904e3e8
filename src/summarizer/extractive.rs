//! Frequency-scored extractive summarization.
//!
//! Sentences are scored by the average normalised frequency of their content
//! words (stop words ignored). The best `max_sentences` are returned in their
//! original order, so the summary still reads top to bottom.

use super::Summarizer;
use super::page::fetch_page_text;
use crate::error::SummaryError;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, instrument};

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^.!?]+[.!?]+["')\]]*|[^.!?]+$"#).unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z'-]*").unwrap());

/// Fragments shorter than this (menu items, bylines) are not sentences.
const MIN_SENTENCE_WORDS: usize = 4;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "more", "most",
    "not", "of", "on", "one", "or", "our", "out", "she", "so", "some", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "to", "up", "was", "we", "were",
    "what", "when", "which", "who", "will", "with", "would", "you", "your",
];

pub struct ExtractiveSummarizer {
    client: reqwest::Client,
    max_sentences: usize,
}

impl ExtractiveSummarizer {
    pub fn new(client: reqwest::Client, max_sentences: usize) -> Self {
        Self {
            client,
            max_sentences,
        }
    }
}

impl Summarizer for ExtractiveSummarizer {
    #[instrument(level = "info", skip(self))]
    async fn summarize(&self, url: &str) -> Result<String, SummaryError> {
        let text = fetch_page_text(&self.client, url).await?;
        let summary = summarize_text(&text, self.max_sentences).ok_or(SummaryError::NoContent)?;
        debug!(chars = summary.len(), "Built extractive summary");
        Ok(summary)
    }
}

/// Pick the `max_sentences` most representative sentences of `text`.
///
/// Returns `None` when the text holds no sentence-like content.
pub fn summarize_text(text: &str, max_sentences: usize) -> Option<String> {
    let sentences: Vec<&str> = text
        .lines()
        .flat_map(|line| SENTENCE.find_iter(line))
        .map(|m| m.as_str().trim())
        .filter(|s| WORD.find_iter(s).count() >= MIN_SENTENCE_WORDS)
        .collect();

    if sentences.is_empty() || max_sentences == 0 {
        return None;
    }
    if sentences.len() <= max_sentences {
        return Some(sentences.join(" "));
    }

    let frequencies = content_word_frequencies(&sentences);
    let peak = frequencies.values().copied().max().unwrap_or(1) as f64;

    let summary = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| (i, score(sentence, &frequencies, peak)))
        .sorted_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        })
        .take(max_sentences)
        .map(|(i, _)| i)
        .sorted()
        .map(|i| sentences[i])
        .join(" ");
    Some(summary)
}

fn content_words(sentence: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(sentence)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
}

fn content_word_frequencies(sentences: &[&str]) -> HashMap<String, usize> {
    sentences
        .iter()
        .flat_map(|s| content_words(s))
        .counts()
}

fn score(sentence: &str, frequencies: &HashMap<String, usize>, peak: f64) -> f64 {
    let weights: Vec<f64> = content_words(sentence)
        .map(|w| frequencies.get(&w).copied().unwrap_or(0) as f64 / peak)
        .collect();
    if weights.is_empty() {
        0.0
    } else {
        weights.iter().sum::<f64>() / weights.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEXT: &str = "Rust is a systems language. The weather was pleasant today. \
        Rust compilers check memory safety in Rust code. Lunch was served at noon. \
        Many teams adopt Rust for safety.";

    #[test]
    fn test_keeps_highest_scoring_sentences_in_order() {
        let summary = summarize_text(TEXT, 3).unwrap();

        assert_eq!(
            summary,
            "Rust is a systems language. Rust compilers check memory safety in Rust code. \
             Many teams adopt Rust for safety."
        );
    }

    #[test]
    fn test_short_text_is_returned_whole() {
        let text = "Only one sentence lives here.\nAnd a second one follows it!";
        assert_eq!(
            summarize_text(text, 5).unwrap(),
            "Only one sentence lives here. And a second one follows it!"
        );
    }

    #[test]
    fn test_fragments_are_not_sentences() {
        assert!(summarize_text("Home. About. Contact us.", 3).is_none());
        assert!(summarize_text("", 3).is_none());
    }

    #[test]
    fn test_trailing_sentence_without_punctuation() {
        let summary = summarize_text("The final line has no full stop", 2).unwrap();
        assert_eq!(summary, "The final line has no full stop");
    }

    #[tokio::test]
    async fn test_summarizes_remote_page() {
        let server = MockServer::start().await;
        let html = format!("<article><p>{TEXT}</p></article>");
        Mock::given(method("GET"))
            .and(path("/rust"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let summarizer = ExtractiveSummarizer::new(reqwest::Client::new(), 1);
        let summary = summarizer
            .summarize(&format!("{}/rust", server.uri()))
            .await
            .unwrap();

        assert_eq!(summary, "Rust is a systems language.");
    }
}
