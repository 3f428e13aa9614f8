//! # SiteCheck
//!
//! A command-line client for the Sucuri SiteCheck website malware scanner.
//!
//! SiteCheck sends one scan request for a domain, decodes the JSON report
//! returned by the API, and renders it as a color-coded terminal report
//! covering firewall detection, application details, recommendations,
//! outdated software, links, blacklist status and malware payloads.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sitecheck::{Config, Scanner};
//! use sitecheck::reporter::TextReporter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let scanner = Scanner::new(config.clone())?;
//!
//!     let report = scanner.scan("example.com").await?;
//!     print!("{}", TextReporter::new(&config).generate(&report));
//!
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms
)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod reporter;
pub mod types;

// Re-export commonly used types at crate root
pub use client::{HttpTransport, Transport};
pub use config::Config;
pub use error::{Result, SiteCheckError};
pub use types::{FirewallStatus, Report};

use url::Url;

/// An undecoded scanner response.
///
/// Keeping the bytes around lets export mode print them verbatim and lets a
/// failed decode report what the API actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub const fn new(body: Vec<u8>) -> Self {
        Self { body }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Decode the body into a [`Report`].
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::MalformedResponse`] if the body is not a report.
    pub fn decode(&self) -> Result<Report> {
        Report::from_slice(&self.body)
    }
}

/// Main scanner orchestrator.
///
/// The `Scanner` builds the scan URL from its configuration, fetches the
/// response through a [`Transport`], and decodes it.
///
/// # Example
///
/// ```rust,no_run
/// use sitecheck::{Config, Scanner};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut config = Config::default();
///     config.api.use_cached_results = true;
///
///     let raw = Scanner::new(config)?.fetch("example.com").await?;
///     println!("{}", String::from_utf8_lossy(raw.as_bytes()));
///     Ok(())
/// }
/// ```
pub struct Scanner {
    config: Config,
    transport: Box<dyn Transport>,
}

impl Scanner {
    /// Create a scanner that talks to the API over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config.api)?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    /// Create a scanner with a custom transport.
    #[must_use]
    pub fn with_transport(config: Config, transport: Box<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// The configuration this scanner was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// URL that a scan of `domain` will request.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn scan_url(&self, domain: &str) -> Result<Url> {
        client::scan_url(
            &self.config.api.base_url,
            domain,
            self.config.api.use_cached_results,
        )
    }

    /// Request a scan of `domain` and return the undecoded response.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the request fails.
    pub async fn fetch(&self, domain: &str) -> Result<RawResponse> {
        tracing::info!(
            domain = %domain,
            cached = self.config.api.use_cached_results,
            "Scanning domain"
        );

        let url = self.scan_url(domain)?;
        let body = self.transport.get(&url).await?;
        Ok(RawResponse::new(body))
    }

    /// Request a scan of `domain` and decode the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub async fn scan(&self, domain: &str) -> Result<Report> {
        let raw = self.fetch(domain).await?;
        let report = raw.decode()?;

        tracing::debug!(
            engine_version = %report.engine.version.join(", "),
            database_date = %report.engine.database_date.join(", "),
            recommendations = report.recommendations.len(),
            outdated = report.outdated.len(),
            link_categories = report.links.len(),
            blacklisted = report.blacklist.is_blacklisted(),
            malware = report.malware.payloads.len(),
            "Decoded scan report"
        );

        Ok(report)
    }
}
