//! User-facing message catalog.
//!
//! The workflow never shows raw error text to the user; every banner, label and
//! placeholder is looked up here for the configured [`Locale`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display language for user-facing messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Tr => "tr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "tr" | "turkish" | "türkçe" => Ok(Locale::Tr),
            other => Err(format!("Unsupported locale '{}'. Must be: en or tr", other)),
        }
    }
}

/// Keys for every message the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    MissingInput,
    UnsupportedFormat,
    SubmissionFailed,
    LookupFailed,
    Cancelled,
    TimedOut,
    Busy,
    HighFit,
    MediumFit,
    LowFit,
    NoMissingSkills,
    Placeholder,
    Analyzing,
    ScoreHeading,
    MissingSkillsHeading,
    RecommendationsHeading,
    PreviewHeading,
}

impl Message {
    pub fn text(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => english(self),
            Locale::Tr => turkish(self),
        }
    }
}

fn english(message: Message) -> &'static str {
    match message {
        Message::MissingInput => "Please upload your CV and enter the job posting text.",
        Message::UnsupportedFormat => "Only PDF and DOCX documents are supported.",
        Message::SubmissionFailed => "An error occurred during the analysis.",
        Message::LookupFailed => "The analysis was created but its result could not be retrieved.",
        Message::Cancelled => "The analysis was cancelled.",
        Message::TimedOut => "The analysis did not finish in time.",
        Message::Busy => "An analysis is already in progress.",
        Message::HighFit => "High fit",
        Message::MediumFit => "Medium fit",
        Message::LowFit => "Low fit",
        Message::NoMissingSkills => "Great! No significant missing skills were found.",
        Message::Placeholder => "Start an analysis to see the results.",
        Message::Analyzing => "Analyzing...",
        Message::ScoreHeading => "Overall fit score",
        Message::MissingSkillsHeading => "Missing skills",
        Message::RecommendationsHeading => "Recommendations",
        Message::PreviewHeading => "CV preview",
    }
}

fn turkish(message: Message) -> &'static str {
    match message {
        Message::MissingInput => "Lütfen hem CV dosyasını yükleyin hem de ilan metnini girin.",
        Message::UnsupportedFormat => "Yalnızca PDF ve DOCX dosyaları desteklenir.",
        Message::SubmissionFailed => "Analiz sırasında bir hata oluştu.",
        Message::LookupFailed => "Analiz oluşturuldu ancak sonucu alınamadı.",
        Message::Cancelled => "Analiz iptal edildi.",
        Message::TimedOut => "Analiz zamanında tamamlanamadı.",
        Message::Busy => "Devam eden bir analiz var.",
        Message::HighFit => "Yüksek Uyum",
        Message::MediumFit => "Orta Uyum",
        Message::LowFit => "Düşük Uyum",
        Message::NoMissingSkills => "Harika! Önemli bir eksik bulunamadı.",
        Message::Placeholder => "Sonuçları görmek için analiz başlatın.",
        Message::Analyzing => "Analiz Ediliyor...",
        Message::ScoreHeading => "Genel Uyum Skoru",
        Message::MissingSkillsHeading => "Eksik Beceriler",
        Message::RecommendationsHeading => "Öneriler",
        Message::PreviewHeading => "CV Önizleme",
    }
}
