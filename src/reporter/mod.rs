//! Report rendering module.
//!
//! A [`Report`](crate::types::Report) is rendered into an ordered list of
//! [`Section`]s, each made of ready-to-print lines. The caller decides where
//! the lines go (terminal, file, buffer).
//!
//! # Example
//!
//! ```rust
//! use sitecheck::reporter::TextReporter;
//! use sitecheck::types::Report;
//! use sitecheck::Config;
//!
//! let report = Report::from_slice(br#"{"SCAN": {"SITE": ["http://example.com"]}}"#).unwrap();
//! let reporter = TextReporter::new(&Config::default()).with_colors(false);
//!
//! let text = reporter.generate(&report);
//! assert!(text.contains("Website Information"));
//! ```

use colored::Color;

mod justify;
mod text;

pub use justify::{clean, justify, truncate, JustifyOptions, ELLIPSIS};
pub use text::TextReporter;

/// Identifies a rendered section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionKind {
    WebsiteInformation,
    ApplicationDetails,
    Recommendations,
    OutdatedComponents,
    /// One link category, such as `internal` or `iframes`
    Links(String),
    BlacklistStatus,
    MalwarePayloads,
}

impl SectionKind {
    /// Header text for the section.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::WebsiteInformation => "Website Information".to_string(),
            Self::ApplicationDetails => "Application Details".to_string(),
            Self::Recommendations => "Recommendations".to_string(),
            Self::OutdatedComponents => "Outdated Components".to_string(),
            Self::Links(category) => format!("Links {category}"),
            Self::BlacklistStatus => "Blacklist Status".to_string(),
            Self::MalwarePayloads => "Malware Payloads".to_string(),
        }
    }
}

/// Status conveyed by a section header color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Neutral,
    Advice,
    Links,
    Alert,
    Clean,
}

impl Tone {
    /// Header background. Named colors keep every tone distinct on
    /// 16-color terminals.
    #[must_use]
    pub const fn background(self) -> Color {
        match self {
            Self::Neutral => Color::BrightBlack,
            Self::Advice => Color::Blue,
            Self::Links => Color::Magenta,
            Self::Alert => Color::Red,
            Self::Clean => Color::Green,
        }
    }
}

/// One rendered section of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub tone: Tone,
    /// Body lines, without the header
    pub lines: Vec<String>,
}

impl Section {
    #[must_use]
    pub fn new(kind: SectionKind, tone: Tone) -> Self {
        Self {
            kind,
            tone,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}
