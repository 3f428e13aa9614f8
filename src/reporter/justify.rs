//! Fixed-width reflow for long text blocks such as malware payloads.
//!
//! Text is cleaned of line breaks and tabs, capped to a maximum number of
//! lines, then cut into lines of exactly `line_width` characters. Breaks fall
//! on character counts, not word boundaries.

use serde::{Deserialize, Serialize};

/// Marker appended to text cut at the line cap.
pub const ELLIPSIS: &str = "...";

/// Layout for [`justify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JustifyOptions {
    /// Characters per line, excluding the indent.
    pub line_width: usize,

    /// Lines kept before the text is cut and [`ELLIPSIS`] appended.
    pub max_lines: usize,

    /// Spaces written before each line.
    pub indent: usize,
}

impl Default for JustifyOptions {
    fn default() -> Self {
        Self {
            line_width: 97,
            max_lines: 10,
            indent: 3,
        }
    }
}

impl JustifyOptions {
    /// Maximum number of characters kept before truncation.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.line_width.saturating_mul(self.max_lines)
    }
}

/// Remove every newline, tab and carriage return.
#[must_use]
pub fn clean(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

/// Cap `text` at `limit` characters, appending [`ELLIPSIS`] when cut.
#[must_use]
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Reflow `text` into indented fixed-width lines.
///
/// The returned block always ends with one empty line. An empty input yields
/// only that terminator.
#[must_use]
pub fn justify(text: &str, options: &JustifyOptions) -> Vec<String> {
    let text = truncate(&clean(text), options.limit());
    let width = options.line_width.max(1);
    let indent = " ".repeat(options.indent);

    let chars: Vec<char> = text.chars().collect();
    let mut lines: Vec<String> = chars
        .chunks(width)
        .map(|chunk| {
            let mut line = String::with_capacity(indent.len() + chunk.len());
            line.push_str(&indent);
            line.extend(chunk);
            line
        })
        .collect();

    lines.push(String::new());
    lines
}
