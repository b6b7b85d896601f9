//! Terminal rendering of a [`View`].

use std::fmt::Write;

use anyhow::{Context, Result};
use cvmatch_core::{Locale, Message, ResultPanel, ResultView, SkillsView, View};

use crate::truncate_string;

const PREVIEW_WIDTH: usize = 120;

/// Output format for rendered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(view: &View, locale: Locale, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(view, locale)),
        OutputFormat::Json => serde_json::to_string_pretty(view).context("Serialize view"),
    }
}

pub fn render_text(view: &View, locale: Locale) -> String {
    let mut out = String::new();

    if let Some(busy) = &view.busy_indicator {
        let _ = writeln!(out, "{}", busy);
    }
    if let Some(error) = &view.error_banner {
        let _ = writeln!(out, "! {}", error);
    }

    match &view.panel {
        ResultPanel::Placeholder { message } => {
            let _ = writeln!(out, "{}", message);
        }
        ResultPanel::Result(result) => write_result(&mut out, result, locale),
    }

    out
}

fn write_result(out: &mut String, result: &ResultView, locale: Locale) {
    let _ = writeln!(out, "{}", Message::ScoreHeading.text(locale));
    let _ = writeln!(out, "  {}/100  {}", result.score, result.band_label);

    let _ = writeln!(out, "\n{}", Message::MissingSkillsHeading.text(locale));
    match &result.missing_skills {
        SkillsView::Tags(skills) => {
            let tags: Vec<String> = skills.iter().map(|s| format!("[{}]", s)).collect();
            let _ = writeln!(out, "  {}", tags.join(" "));
        }
        SkillsView::AllCovered(message) => {
            let _ = writeln!(out, "  {}", message);
        }
    }

    let _ = writeln!(out, "\n{}", Message::RecommendationsHeading.text(locale));
    for (idx, recommendation) in result.recommendations.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", idx + 1, recommendation);
    }

    let preview = result.cv_text_preview.split_whitespace().collect::<Vec<_>>().join(" ");
    if !preview.is_empty() {
        let _ = writeln!(out, "\n{}", Message::PreviewHeading.text(locale));
        let _ = writeln!(out, "  {}", truncate_string(&preview, PREVIEW_WIDTH));
    }
}
