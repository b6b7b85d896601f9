use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier issued by the analysis service on submission.
///
/// The service currently hands out integers, but nothing in the client relies
/// on that; string identifiers are accepted and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Numeric(id) => write!(f, "{}", id),
            JobId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for JobId {
    fn from(id: i64) -> Self {
        JobId::Numeric(id)
    }
}

impl From<&str> for JobId {
    /// Canonical integers become `Numeric` so that ids typed on a command line
    /// compare equal to the ones the service returns. Anything else, including
    /// "007" or "+7", stays `Text` and is sent back verbatim.
    fn from(id: &str) -> Self {
        let trimmed = id.trim();
        match trimmed.parse::<i64>() {
            Ok(n) if n.to_string() == trimmed => JobId::Numeric(n),
            _ => JobId::Text(trimmed.to_string()),
        }
    }
}

/// Overall compatibility score, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Score(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Score(value as u8))
        } else {
            Err(format!("score {} is outside 0..=100", value))
        }
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        i64::from(score.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Response of `POST /analysis/upload`. Only `id` is part of the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisJobReference {
    pub id: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Preliminary score; never shown, the lookup result is authoritative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Response of `GET /analysis/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: JobId,
    pub status: String,
    pub score: Score,
    pub result: AnalysisDetails,
    #[serde(default)]
    pub cv_text_preview: String,
}

/// Nested `result` object of a lookup response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisDetails {
    /// Supplied independently of [`AnalysisResult::score`]; the two are not
    /// reconciled by the client.
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}
