//! Interactive menu flow.
//!
//! The session is an explicit state machine driven by a single loop in
//! [`Navigator::run`]:
//!
//! ```text
//! MainMenu ──(1..3)──▶ SectionListing ──(k)──▶ Reading
//!    ▲  │                 │    ▲                 │  │
//!    │  └─(0) exit        │    └──────(1)────────┘  └─(0) exit
//!    └────────(0)─────────┘
//! ```
//!
//! Each state handler returns the next state instead of calling it, so long
//! reading sessions never grow the stack. The article batch moves between
//! `SectionListing` and `Reading` by value and is dropped on return to the
//! main menu.

use crate::acquire::ArticleAcquirer;
use crate::catalog::SectionCatalog;
use crate::config::Config;
use crate::error::{InputError, SessionError};
use crate::gateway::RemoteGateway;
use crate::input::Prompter;
use crate::models::{ArticleBatch, Section};
use crate::render;
use crate::summarizer::Summarizer;
use std::ops::RangeInclusive;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info, instrument, warn};

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    SectionListing {
        section: Section,
        batch: ArticleBatch,
    },
    /// Only built through [`MenuState::select`], so `selected` is always a
    /// member of a non-empty `batch`.
    Reading {
        section: Section,
        batch: ArticleBatch,
        selected: usize,
    },
}

impl MenuState {
    /// Move to `Reading` for `selected`, or stay on the listing when the
    /// index is not in the batch.
    pub fn select(section: Section, batch: ArticleBatch, selected: usize) -> MenuState {
        if batch.get(selected).is_some() {
            MenuState::Reading {
                section,
                batch,
                selected,
            }
        } else {
            MenuState::SectionListing { section, batch }
        }
    }
}

/// Why a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user chose exit from the main menu or after reading.
    UserExit,
    /// Standard input was closed.
    InputClosed,
}

enum Transition {
    Next(MenuState),
    Exit(SessionEnd),
}

/// Drives one interactive session.
pub struct Navigator<'a, G, S, R, W> {
    config: &'a Config,
    acquirer: ArticleAcquirer<'a, G>,
    summarizer: &'a S,
    console: Prompter<R, W>,
}

impl<'a, G, S, R, W> Navigator<'a, G, S, R, W>
where
    G: RemoteGateway,
    S: Summarizer,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        config: &'a Config,
        catalog: &'a SectionCatalog,
        gateway: &'a G,
        summarizer: &'a S,
        console: Prompter<R, W>,
    ) -> Self {
        Self {
            config,
            acquirer: ArticleAcquirer::new(gateway, catalog, config.show_progress),
            summarizer,
            console,
        }
    }

    /// Run the session from the main menu until the user exits.
    ///
    /// # Errors
    ///
    /// A section whose article list cannot be loaded ends the session with
    /// [`SessionError`]; so does a console that can no longer be written.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&mut self) -> Result<SessionEnd, SessionError> {
        let mut state = MenuState::MainMenu;
        loop {
            let transition = match state {
                MenuState::MainMenu => self.main_menu().await?,
                MenuState::SectionListing { section, batch } => {
                    self.section_listing(section, batch).await?
                }
                MenuState::Reading {
                    section,
                    batch,
                    selected,
                } => self.reading(section, batch, selected).await?,
            };

            match transition {
                Transition::Next(next) => state = next,
                Transition::Exit(end) => {
                    info!(?end, "Session finished");
                    if end == SessionEnd::UserExit {
                        self.console.say(render::GOODBYE).await?;
                    }
                    return Ok(end);
                }
            }
        }
    }

    async fn main_menu(&mut self) -> Result<Transition, SessionError> {
        self.console.say(&render::sections_menu()).await?;
        let Some(choice) = self
            .choose(render::MAIN_PROMPT, 0..=Section::ALL.len())
            .await?
        else {
            return Ok(Transition::Exit(SessionEnd::InputClosed));
        };

        let Some(section) = Section::from_choice(choice) else {
            return Ok(Transition::Exit(SessionEnd::UserExit));
        };
        info!(%section, "Section selected");

        let candidates = self.acquirer.fetch_candidates(section).await?;
        let batch = self
            .acquirer
            .acquire(&candidates, self.config.max_articles)
            .await;
        if batch.len() < self.config.max_articles {
            warn!(
                %section,
                accepted = batch.len(),
                wanted = self.config.max_articles,
                "Section ran out of readable articles"
            );
        }

        Ok(Transition::Next(MenuState::SectionListing { section, batch }))
    }

    async fn section_listing(
        &mut self,
        section: Section,
        batch: ArticleBatch,
    ) -> Result<Transition, SessionError> {
        self.console
            .say(&render::articles_menu(section, &batch))
            .await?;
        let prompt = render::article_prompt(&batch);
        let Some(choice) = self.choose(&prompt, 0..=batch.len()).await? else {
            return Ok(Transition::Exit(SessionEnd::InputClosed));
        };

        if choice == 0 {
            debug!(%section, "Back to main menu; dropping batch");
            return Ok(Transition::Next(MenuState::MainMenu));
        }
        Ok(Transition::Next(MenuState::select(section, batch, choice)))
    }

    async fn reading(
        &mut self,
        section: Section,
        batch: ArticleBatch,
        selected: usize,
    ) -> Result<Transition, SessionError> {
        let Some(article) = batch.get(selected) else {
            return Ok(Transition::Next(MenuState::SectionListing { section, batch }));
        };
        info!(index = selected, url = %article.url, "Reading article");

        let summary = self.summarizer.summarize(&article.url).await;
        if let Err(e) = &summary {
            warn!(url = %article.url, error = %e, "Summary unavailable");
        }
        let view = render::reading_view(article, summary.as_deref(), self.config.wrap_width);
        self.console.say(&view).await?;

        let Some(choice) = self.choose(render::REREAD_PROMPT, 0..=1).await? else {
            return Ok(Transition::Exit(SessionEnd::InputClosed));
        };
        if choice == 0 {
            return Ok(Transition::Exit(SessionEnd::UserExit));
        }
        Ok(Transition::Next(MenuState::SectionListing { section, batch }))
    }

    /// Read a validated choice; `None` once input is closed.
    async fn choose(
        &mut self,
        prompt: &str,
        allowed: RangeInclusive<usize>,
    ) -> Result<Option<usize>, SessionError> {
        match self.console.choose(prompt, allowed).await {
            Ok(choice) => Ok(Some(choice)),
            Err(InputError::Closed) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.console.into_writer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{FORMAT_ERROR, RANGE_ERROR};
    use crate::models::ItemRecord;
    use crate::testing::{FakeGateway, FakeSummarizer, config};
    use serde_json::json;

    async fn session(
        gateway: &FakeGateway,
        summarizer: &FakeSummarizer,
        input: &str,
    ) -> (Result<SessionEnd, SessionError>, String) {
        let config = config();
        let catalog = SectionCatalog::new(&config);
        let console = Prompter::new(input.as_bytes(), Vec::new());
        let mut navigator = Navigator::new(&config, &catalog, gateway, summarizer, console);

        let result = navigator.run().await;
        let output = String::from_utf8(navigator.into_output()).unwrap();
        (result, output)
    }

    fn seven_top_stories() -> FakeGateway {
        (1..=7).fold(
            FakeGateway::new(&config()).with_section(Section::Top, &[1, 2, 3, 4, 5, 6, 7]),
            |g, id| g.with_story(id),
        )
    }

    #[test]
    fn test_select_only_reads_members_of_the_batch() {
        let mut batch = ArticleBatch::with_capacity(2);
        batch.try_accept(ItemRecord {
            title: Some("Only".to_string()),
            url: Some("https://n.example/only".to_string()),
            ..Default::default()
        });

        assert!(matches!(
            MenuState::select(Section::Top, batch.clone(), 1),
            MenuState::Reading { selected: 1, .. }
        ));
        assert!(matches!(
            MenuState::select(Section::Top, batch.clone(), 2),
            MenuState::SectionListing { .. }
        ));
        assert!(matches!(
            MenuState::select(Section::Top, ArticleBatch::with_capacity(5), 1),
            MenuState::SectionListing { .. }
        ));
    }

    #[tokio::test]
    async fn test_exit_from_main_menu() {
        let gateway = seven_top_stories();
        let summarizer = FakeSummarizer::default();

        let (result, output) = session(&gateway, &summarizer, "0\n").await;

        assert_eq!(result.unwrap(), SessionEnd::UserExit);
        assert!(output.contains("Top Stories"));
        assert!(output.trim_end().ends_with("END"));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_read_article_then_exit() {
        let gateway = seven_top_stories();
        let summarizer = FakeSummarizer::default();

        let (result, output) = session(&gateway, &summarizer, "1\n2\n0\n").await;

        assert_eq!(result.unwrap(), SessionEnd::UserExit);
        assert_eq!(gateway.item_calls(), vec![1, 2, 3, 4, 5]);
        assert_eq!(summarizer.calls(), vec!["https://news.example/2"]);
        assert!(output.contains("Story 5"));
        assert!(!output.contains("Story 6"));
        assert!(output.contains("Summary of https://news.example/2"));
        assert!(output.contains("Ctrl + Click to read full article:"));
    }

    #[tokio::test]
    async fn test_reading_again_reuses_the_batch() {
        let gateway = seven_top_stories();
        let summarizer = FakeSummarizer::default();

        let (result, output) = session(&gateway, &summarizer, "1\n1\n1\n3\n1\n2\n0\n").await;

        assert_eq!(result.unwrap(), SessionEnd::UserExit);
        // One section list plus five items, however many articles are read.
        assert_eq!(gateway.call_count(), 6);
        assert_eq!(
            summarizer.calls(),
            vec![
                "https://news.example/1",
                "https://news.example/3",
                "https://news.example/2",
            ]
        );
        assert_eq!(output.matches("Previous Menu").count(), 3);
        assert_eq!(output.matches("Story 4").count(), 3);
    }

    #[tokio::test]
    async fn test_back_to_main_menu_builds_a_fresh_batch() {
        let gateway = seven_top_stories().with_section(Section::New, &[7, 6]);
        let summarizer = FakeSummarizer::default();

        let (result, _) = session(&gateway, &summarizer, "1\n0\n2\n0\n0\n").await;

        assert_eq!(result.unwrap(), SessionEnd::UserExit);
        assert_eq!(gateway.item_calls(), vec![1, 2, 3, 4, 5, 7, 6]);
        assert!(gateway.calls().iter().any(|u| u.ends_with("/newstories.json")));
        assert!(summarizer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_section_is_fatal() {
        let gateway = FakeGateway::new(&config()).with_section(Section::Best, &[]);
        let summarizer = FakeSummarizer::default();

        let (result, output) = session(&gateway, &summarizer, "3\n1\n").await;

        assert!(matches!(result, Err(SessionError::NoArticles { .. })));
        assert_eq!(gateway.call_count(), 1);
        assert!(gateway.item_calls().is_empty());
        assert!(!output.contains("Previous Menu"));
    }

    #[tokio::test]
    async fn test_unreachable_section_is_fatal() {
        let gateway = FakeGateway::new(&config());
        let summarizer = FakeSummarizer::default();

        let (result, _) = session(&gateway, &summarizer, "2\n").await;

        assert!(matches!(result, Err(SessionError::SectionFetch { .. })));
    }

    #[tokio::test]
    async fn test_short_batch_limits_article_choices() {
        let gateway = FakeGateway::new(&config())
            .with_section(Section::Top, &[1, 2, 3])
            .with_story(1)
            .with_item(2, json!({"id": 2, "type": "poll", "title": "Poll"}))
            .with_story(3);
        let summarizer = FakeSummarizer::default();

        let (result, output) = session(&gateway, &summarizer, "1\n3\n2\n0\n").await;

        assert_eq!(result.unwrap(), SessionEnd::UserExit);
        assert!(output.contains("(1-2)"));
        assert_eq!(output.matches(RANGE_ERROR).count(), 1);
        assert_eq!(summarizer.calls(), vec!["https://news.example/3"]);
    }

    #[tokio::test]
    async fn test_section_without_readable_articles() {
        let gateway = FakeGateway::new(&config()).with_section(Section::New, &[8, 9]);
        let summarizer = FakeSummarizer::default();

        let (result, output) = session(&gateway, &summarizer, "2\n1\n0\n0\n").await;

        assert_eq!(result.unwrap(), SessionEnd::UserExit);
        assert!(output.contains("No readable articles"));
        assert_eq!(output.matches(RANGE_ERROR).count(), 1);
        assert!(summarizer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_summary_keeps_session_alive() {
        let gateway = seven_top_stories();
        let summarizer = FakeSummarizer::default().failing_for("https://news.example/1");

        let (result, output) = session(&gateway, &summarizer, "1\n1\n1\n2\n0\n").await;

        assert_eq!(result.unwrap(), SessionEnd::UserExit);
        assert!(output.contains("Summary unavailable"));
        assert!(output.contains("Summary of https://news.example/2"));
    }

    #[tokio::test]
    async fn test_invalid_menu_input_is_recoverable() {
        let gateway = seven_top_stories();
        let summarizer = FakeSummarizer::default();

        let (result, output) = session(&gateway, &summarizer, "abc\n9\n0\n").await;

        assert_eq!(result.unwrap(), SessionEnd::UserExit);
        assert_eq!(output.matches(FORMAT_ERROR).count(), 1);
        assert_eq!(output.matches(RANGE_ERROR).count(), 1);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_closed_input_ends_session_quietly() {
        let gateway = seven_top_stories();
        let summarizer = FakeSummarizer::default();

        let (result, output) = session(&gateway, &summarizer, "1\n").await;

        assert_eq!(result.unwrap(), SessionEnd::InputClosed);
        assert!(!output.contains("END"));
    }
}
