//! Bounded, filtered article acquisition.
//!
//! The remote id lists mix stories with deleted items, jobs, polls and
//! records that fail to load. [`ArticleAcquirer::acquire`] walks the ids in
//! order and keeps only displayable stories, stopping as soon as the batch is
//! full so the number of requests stays close to the target.

use crate::catalog::SectionCatalog;
use crate::error::SessionError;
use crate::gateway::RemoteGateway;
use crate::models::{ArticleBatch, CandidateId, ItemRecord, Section};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

pub struct ArticleAcquirer<'a, G> {
    gateway: &'a G,
    catalog: &'a SectionCatalog,
    show_progress: bool,
}

impl<'a, G> ArticleAcquirer<'a, G>
where
    G: RemoteGateway,
{
    pub fn new(gateway: &'a G, catalog: &'a SectionCatalog, show_progress: bool) -> Self {
        Self {
            gateway,
            catalog,
            show_progress,
        }
    }

    /// Retrieve the candidate id list for `section`.
    ///
    /// # Errors
    ///
    /// Every failure here is fatal to the session: the list cannot be
    /// fetched, is not an array, or holds no usable ids. Individual entries
    /// that are not ids are dropped.
    #[instrument(level = "info", skip_all, fields(%section))]
    pub async fn fetch_candidates(&self, section: Section) -> Result<Vec<CandidateId>, SessionError> {
        let resource = self.catalog.resource_for(section);
        let value = self
            .gateway
            .fetch(resource)
            .await
            .map_err(|source| SessionError::SectionFetch {
                section: section.label(),
                source,
            })?;

        if value.is_null() {
            warn!("Section list is null");
            return Err(SessionError::NoArticles {
                section: section.label(),
            });
        }

        let entries: Vec<Value> =
            serde_json::from_value(value).map_err(|source| SessionError::SectionFormat {
                section: section.label(),
                source,
            })?;
        let total = entries.len();
        let ids: Vec<CandidateId> = entries
            .into_iter()
            .filter_map(|entry| match entry.as_u64() {
                Some(id) => Some(CandidateId(id)),
                None => {
                    debug!(%entry, "Dropping malformed candidate id");
                    None
                }
            })
            .collect();
        if ids.len() < total {
            warn!(dropped = total - ids.len(), "Section list contained malformed ids");
        }
        if ids.is_empty() {
            warn!("Section list has no usable ids");
            return Err(SessionError::NoArticles {
                section: section.label(),
            });
        }

        info!(count = ids.len(), "Fetched candidate ids");
        Ok(ids)
    }

    /// Build a batch of at most `target` articles from `candidates`.
    ///
    /// Shows a progress bar on stderr when progress is enabled.
    pub async fn acquire(&self, candidates: &[CandidateId], target: usize) -> ArticleBatch {
        let progress = self.progress_bar(target);
        let batch = self.acquire_with_progress(candidates, target, &progress).await;
        progress.finish();
        batch
    }

    /// Same as [`Self::acquire`], reporting to a caller-supplied bar.
    ///
    /// The bar advances once per accepted article; skipped candidates never
    /// move it.
    #[instrument(level = "info", skip_all, fields(candidates = candidates.len(), wanted = target))]
    pub async fn acquire_with_progress(
        &self,
        candidates: &[CandidateId],
        target: usize,
        progress: &ProgressBar,
    ) -> ArticleBatch {
        let mut batch = ArticleBatch::with_capacity(target);
        let mut attempted = 0usize;
        let mut transport_skips = 0usize;
        let mut invalid_skips = 0usize;

        for &id in candidates {
            if batch.is_full() {
                break;
            }
            attempted += 1;

            let resource = self.catalog.item_resource(id);
            let value = match self.gateway.fetch(&resource).await {
                Ok(value) => value,
                Err(e) => {
                    debug!(%id, error = %e, "Skipping candidate: fetch failed");
                    transport_skips += 1;
                    continue;
                }
            };

            let record = match serde_json::from_value::<ItemRecord>(value) {
                Ok(record) => record,
                Err(e) => {
                    debug!(%id, error = %e, "Skipping candidate: not an item record");
                    invalid_skips += 1;
                    continue;
                }
            };

            if batch.try_accept(record) {
                progress.inc(1);
            } else {
                debug!(%id, "Skipping candidate: missing title or url");
                invalid_skips += 1;
            }
        }

        info!(
            attempted,
            accepted = batch.len(),
            transport_skips,
            invalid_skips,
            "Article batch ready"
        );
        batch
    }

    fn progress_bar(&self, target: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(target as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Fetching Articles");
        pb
    }
}
