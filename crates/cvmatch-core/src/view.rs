//! Presentation state derived from the workflow.
//!
//! Everything here is a pure function of [`WorkflowState`]; a renderer only has
//! to lay out a [`View`], it never decides what to show.

use serde::Serialize;

use crate::i18n::{Locale, Message};
use crate::models::{AnalysisResult, JobId, Score};
use crate::workflow::WorkflowState;

/// Qualitative fit label for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FitBand {
    High,
    Medium,
    Low,
}

impl FitBand {
    /// Scores strictly above this are a high fit.
    pub const HIGH_ABOVE: u8 = 70;
    /// Scores strictly above this (and not high) are a medium fit.
    pub const MEDIUM_ABOVE: u8 = 40;

    pub fn from_score(score: Score) -> Self {
        match score.value() {
            s if s > Self::HIGH_ABOVE => FitBand::High,
            s if s > Self::MEDIUM_ABOVE => FitBand::Medium,
            _ => FitBand::Low,
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match self {
            FitBand::High => Message::HighFit.text(locale),
            FitBand::Medium => Message::MediumFit.text(locale),
            FitBand::Low => Message::LowFit.text(locale),
        }
    }
}

/// Missing skills either as tags or, when there are none, an affirming message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SkillsView {
    Tags(Vec<String>),
    AllCovered(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub id: JobId,
    pub status: String,
    pub score: Score,
    pub band: FitBand,
    pub band_label: String,
    pub overall_score: Option<f64>,
    pub missing_skills: SkillsView,
    pub recommendations: Vec<String>,
    pub cv_text_preview: String,
    /// The result belongs to an earlier attempt and is only kept on screen.
    pub stale: bool,
}

impl ResultView {
    pub fn new(result: &AnalysisResult, locale: Locale, stale: bool) -> Self {
        let band = FitBand::from_score(result.score);
        let missing_skills = if result.result.missing_skills.is_empty() {
            SkillsView::AllCovered(Message::NoMissingSkills.text(locale).to_string())
        } else {
            SkillsView::Tags(result.result.missing_skills.clone())
        };

        Self {
            id: result.id.clone(),
            status: result.status.clone(),
            score: result.score,
            band,
            band_label: band.label(locale).to_string(),
            overall_score: result.result.overall_score,
            missing_skills,
            recommendations: result.result.recommendations.clone(),
            cv_text_preview: result.cv_text_preview.clone(),
            stale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultPanel {
    Placeholder { message: String },
    Result(ResultView),
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub busy_indicator: Option<String>,
    pub error_banner: Option<String>,
    pub panel: ResultPanel,
}

impl View {
    pub fn from_state(state: &WorkflowState, locale: Locale) -> Self {
        let busy_indicator = state
            .is_busy()
            .then(|| Message::Analyzing.text(locale).to_string());
        let error_banner = state.failure().map(|failure| failure.message.clone());
        let panel = match state.displayed_result() {
            Some(result) => {
                let stale = !matches!(state, WorkflowState::Success { .. });
                ResultPanel::Result(ResultView::new(result, locale, stale))
            }
            None => ResultPanel::Placeholder {
                message: Message::Placeholder.text(locale).to_string(),
            },
        };

        Self {
            busy_indicator,
            error_banner,
            panel,
        }
    }

    /// View of a result fetched outside the submit workflow.
    pub fn for_result(result: &AnalysisResult, locale: Locale) -> Self {
        Self {
            busy_indicator: None,
            error_banner: None,
            panel: ResultPanel::Result(ResultView::new(result, locale, false)),
        }
    }

    pub fn result(&self) -> Option<&ResultView> {
        match &self.panel {
            ResultPanel::Result(view) => Some(view),
            ResultPanel::Placeholder { .. } => None,
        }
    }
}
