//! Terminal rendering for menus and the reading view.
//!
//! Everything here returns a `String`; the navigation layer decides where it
//! is written. Tables use `comfy-table`, colours use `console`, and summaries
//! are wrapped with `textwrap`.

use crate::error::SummaryError;
use crate::models::{Article, ArticleBatch, Section};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use console::style;
use std::fmt::Write;

pub const MAIN_PROMPT: &str = "\nPlease choose a section to browse (1-3) or 0 to exit: ";
pub const REREAD_PROMPT: &str = "Enter 1 to choose another article to read or 0 to exit: ";
pub const GOODBYE: &str = "END";

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn menu_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| header_cell(h)));
    table
}

/// The main menu: one row per section, a spacer, and the exit option.
pub fn sections_menu() -> String {
    let mut table = menu_table(&["No.", "Sections"]);
    for section in Section::ALL {
        table.add_row(vec![
            Cell::new(section.choice()),
            Cell::new(section.label()),
        ]);
    }
    table.add_row(vec![Cell::new(""), Cell::new("")]);
    table.add_row(vec![Cell::new(0), Cell::new("Exit")]);

    format!("\n{}\n\n{table}", style("WELCOME TO HACKER NEWS!").bold())
}

/// The article listing for one section visit.
pub fn articles_menu(section: Section, batch: &ArticleBatch) -> String {
    let mut table = menu_table(&["No.", "Articles", "URLs"]);
    for article in batch.iter() {
        table.add_row(vec![
            Cell::new(article.display_index),
            Cell::new(&article.title),
            Cell::new(&article.url),
        ]);
    }
    table.add_row(vec![Cell::new(""), Cell::new(""), Cell::new("")]);
    table.add_row(vec![Cell::new(0), Cell::new("Previous Menu"), Cell::new("")]);

    let mut out = format!("\n{}\n\n{table}", style(section.label()).cyan().bold());
    if batch.is_empty() {
        let _ = write!(
            out,
            "\n\n{}",
            style("No readable articles were found in this section.").yellow()
        );
    }
    out
}

/// Prompt for the article listing, naming the valid range.
pub fn article_prompt(batch: &ArticleBatch) -> String {
    match batch.len() {
        0 => "\nEnter 0 to return to the previous menu: ".to_string(),
        1 => "\nPlease choose an article to read (1) or 0 to return to the previous menu: "
            .to_string(),
        n => format!(
            "\nPlease choose an article to read (1-{n}) or 0 to return to the previous menu: "
        ),
    }
}

/// Title, optional byline, wrapped summary and link for one article.
///
/// A failed summary is shown as unavailable rather than ending the session.
pub fn reading_view(
    article: &Article,
    summary: Result<&str, &SummaryError>,
    wrap_width: usize,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{} {}", style("Title:").bold(), article.title);

    let mut byline = Vec::new();
    if let Some(score) = article.score {
        byline.push(format!("{score} points"));
    }
    if let Some(author) = &article.author {
        byline.push(format!("by {author}"));
    }
    if let Some(when) = article.published {
        let verb = if article.author.is_some() { "on" } else { "posted" };
        byline.push(format!("{verb} {}", when.format("%Y-%m-%d %H:%M UTC")));
    }
    let byline = (!byline.is_empty()).then(|| byline.join(" "));
    if let Some(byline) = byline {
        let _ = writeln!(out, "{}", style(byline).dim());
    }

    let _ = writeln!(out, "\n{}", style("Article Summary:").bold());
    match summary {
        Ok(text) => {
            let _ = writeln!(out, "{}", textwrap::fill(text, wrap_width));
        }
        Err(e) => {
            let notice = format!("Summary unavailable: {e}");
            let _ = writeln!(out, "{}", style(textwrap::fill(&notice, wrap_width)).yellow());
        }
    }

    let _ = write!(
        out,
        "\n{}\n{}\n",
        style("Ctrl + Click to read full article:").bold(),
        article.url
    );
    out
}

/// A fatal error line for stderr.
pub fn fatal_message(message: &str) -> String {
    style(message).red().to_string()
}
