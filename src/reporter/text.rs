//! Plain text report generator for terminal output.

use crate::config::Config;
use crate::reporter::{justify, JustifyOptions, Section, SectionKind, Tone};
use crate::types::{Advisory, Report};
use colored::{ColoredString, Colorize};

const BULLET: &str = "\u{2022}";
const CROSS: &str = "\u{2718}";
const CHECK: &str = "\u{2714}";

/// Text report generator for CLI output.
#[derive(Debug, Clone)]
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Layout for malware payload blocks
    layout: JustifyOptions,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
            layout: config.render,
        }
    }

    /// Override the configured color setting.
    #[must_use]
    pub const fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Build every section that applies to `report`, in display order.
    #[must_use]
    pub fn sections(&self, report: &Report) -> Vec<Section> {
        let mut sections = vec![self.website_information(report)];
        sections.extend(self.application_details(report));
        sections.extend(self.advisories(SectionKind::Recommendations, &report.recommendations, true));
        sections.extend(self.advisories(SectionKind::OutdatedComponents, &report.outdated, false));
        sections.extend(self.links(report));
        sections.extend(self.blacklist_status(report));
        sections.extend(self.malware_payloads(report));
        sections
    }

    /// Render `report` into display lines. Sections are separated by one
    /// empty line.
    #[must_use]
    pub fn render(&self, report: &Report) -> Vec<String> {
        let mut lines = Vec::new();
        for (i, section) in self.sections(report).into_iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(self.header(&section));
            lines.extend(section.lines);
        }
        lines
    }

    /// Render `report` into a single newline-terminated string.
    #[must_use]
    pub fn generate(&self, report: &Report) -> String {
        let mut output = self.render(report).join("\n");
        output.push('\n');
        output
    }
}

impl TextReporter {
    fn header(&self, section: &Section) -> String {
        let title = format!(" @ {} ", section.kind.title());
        if self.use_colors {
            title.bright_white().on_color(section.tone.background()).to_string()
        } else {
            title
        }
    }

    fn paint(&self, text: &str, style: fn(ColoredString) -> ColoredString) -> String {
        if self.use_colors {
            style(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }

    fn field(&self, label: &str, value: &str) -> String {
        format!(" {} {value}", self.paint(label, |s| s.bright_magenta().bold()))
    }

    fn website_information(&self, report: &Report) -> Section {
        let mut section = Section::new(SectionKind::WebsiteInformation, Tone::Neutral);
        let target = &report.target;

        section.push(self.field("Site:", &target.site.join(", ")));
        section.push(self.field("Domain:", &target.domains.join(", ")));
        section.push(self.field("IP:", &target.ips.join(", ")));
        section.push(self.field("CMS:", &target.cms.join(", ")));

        let firewall = report.firewall_status();
        let status = if firewall.is_alert() {
            self.paint(firewall.as_str(), |s| s.bright_red())
        } else {
            firewall.as_str().to_string()
        };
        section.push(self.field("Firewall:", &status));

        for note in report.system_notes.values().flatten() {
            section.push(format!(" {}", self.paint(note, |s| s.dimmed())));
        }

        section
    }

    fn application_details(&self, report: &Report) -> Option<Section> {
        let app = &report.application;
        if app.is_empty() {
            return None;
        }

        let mut section = Section::new(SectionKind::ApplicationDetails, Tone::Neutral);
        for warning in &app.warnings {
            section.push(format!(" {warning}"));
        }
        for info in &app.info {
            section.push(format!(" {} {}", info.label, self.paint(&info.detail, |s| s.dimmed())));
        }
        for version in &app.versions {
            section.push(format!(" {version}"));
        }
        for notice in &app.notices {
            section.push(format!(" {notice}"));
        }

        Some(section)
    }

    fn advisories(&self, kind: SectionKind, advisories: &[Advisory], bold_title: bool) -> Option<Section> {
        if advisories.is_empty() {
            return None;
        }

        let mut section = Section::new(kind, Tone::Advice);
        let bullet = self.paint(BULLET, |s| s.bright_blue());
        for advisory in advisories {
            let title = if bold_title {
                self.paint(&advisory.title, |s| s.bold())
            } else {
                advisory.title.clone()
            };
            section.push(format!(" {bullet} {title}"));
            section.push(format!("   {}", advisory.detail));
            section.push(format!("   {}", advisory.extra));
        }

        Some(section)
    }

    fn links(&self, report: &Report) -> Vec<Section> {
        report
            .links
            .iter()
            .filter(|(_, urls)| !urls.is_empty())
            .map(|(category, urls)| {
                let mut section = Section::new(SectionKind::Links(category.clone()), Tone::Links);
                for url in urls {
                    section.push(format!(" {url}"));
                }
                section
            })
            .collect()
    }

    fn blacklist_status(&self, report: &Report) -> Option<Section> {
        let blacklist = &report.blacklist;
        if blacklist.is_empty() {
            return None;
        }

        let tone = if blacklist.is_blacklisted() { Tone::Alert } else { Tone::Clean };
        let mut section = Section::new(SectionKind::BlacklistStatus, tone);

        let cross = self.paint(CROSS, |s| s.bright_red());
        for entry in &blacklist.warnings {
            section.push(format!(" {cross} {}", entry.label));
            section.push(format!("   {}", entry.detail));
        }

        let check = self.paint(CHECK, |s| s.bright_green());
        for entry in &blacklist.clean {
            section.push(format!(" {check} {}", entry.label));
            section.push(format!("   {}", entry.detail));
        }

        Some(section)
    }

    fn malware_payloads(&self, report: &Report) -> Option<Section> {
        let payloads = &report.malware.payloads;
        if payloads.is_empty() {
            return None;
        }

        let mut section = Section::new(SectionKind::MalwarePayloads, Tone::Alert);
        let bullet = self.paint(BULLET, |s| s.bright_red());
        for entry in payloads {
            section.push(format!(" {bullet} {}", entry.label));
            section.lines.extend(justify(&entry.payload, &self.layout));
        }

        Some(section)
    }
}
