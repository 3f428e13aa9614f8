//! Configuration module for SiteCheck.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`sitecheck.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # sitecheck.yaml
//!
//! api:
//!   base_url: https://sitecheck.sucuri.net/api/v2/
//!   use_cached_results: false
//!   timeout_secs: 60
//!
//! output:
//!   colored: true
//!   export: false
//!
//! render:
//!   line_width: 97
//!   max_lines: 10
//!   indent: 3
//! ```

use crate::error::{Result, SiteCheckError};
use crate::reporter::JustifyOptions;
use serde::{Deserialize, Serialize};

/// Default scanner API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://sitecheck.sucuri.net/api/v2/";

/// Scanner API options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiOptions {
    /// Endpoint that receives the scan request.
    pub base_url: String,

    /// Ask the API for its cached results instead of forcing a fresh scan.
    pub use_cached_results: bool,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with the request.
    pub user_agent: String,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            use_cached_results: false,
            timeout_secs: 60,
            user_agent: "Mozilla/5.0 (KHTML, like Gecko) Safari/537.36".to_string(),
        }
    }
}

/// Output options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    pub colored: bool,

    /// Print the raw JSON response instead of the rendered report.
    pub export: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            export: false,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanner API options
    pub api: ApiOptions,

    /// Output options
    pub output: OutputOptions,

    /// Payload justification options
    pub render: JustifyOptions,
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a value is out of range.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let config: Self = serde_yaml::from_str(&expanded).map_err(|e| {
            SiteCheckError::config_parse(e.to_string(), Some(Box::new(e)), file!(), line!())
        })?;
        config.validate()?;

        tracing::debug!(
            base_url = %config.api.base_url,
            use_cached_results = config.api.use_cached_results,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SiteCheckError::ConfigValue`] naming the first bad key.
    pub fn validate(&self) -> Result<()> {
        match url::Url::parse(&self.api.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(crate::err!(ConfigValue {
                    key: "api.base_url".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                }));
            }
            Err(e) => {
                return Err(crate::err!(ConfigValue {
                    key: "api.base_url".to_string(),
                    message: e.to_string(),
                }));
            }
        }

        let positive = [
            ("api.timeout_secs", self.api.timeout_secs),
            ("render.line_width", self.render.line_width as u64),
            ("render.max_lines", self.render.max_lines as u64),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(crate::err!(ConfigValue {
                    key: key.to_string(),
                    message: "must be greater than zero".to_string(),
                }));
            }
        }

        Ok(())
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# SiteCheck Configuration File
# https://github.com/cixtor/sitecheck

# Scanner API options
api:
  # Endpoint that receives the scan request
  base_url: https://sitecheck.sucuri.net/api/v2/

  # Reuse the results of a previous scan instead of forcing a new one
  use_cached_results: false

  # Request timeout in seconds
  timeout_secs: 60

  # User-Agent header (can use environment variable)
  # user_agent: ${SITECHECK_USER_AGENT}

# Output options
output:
  # Use colored output in terminal
  colored: true

  # Print the raw JSON response instead of the report
  export: false

# Malware payload layout
render:
  # Characters per line
  line_width: 97

  # Lines kept before the payload is cut with "..."
  max_lines: 10

  # Spaces before each payload line
  indent: 3
"#
        .to_string()
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &crate::cli::ScanArgs) {
        if args.cache {
            self.api.use_cached_results = true;
        }
        if args.export {
            self.output.export = true;
        }
        if let Some(ref api_url) = args.api_url {
            self.api.base_url.clone_from(api_url);
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_secs = timeout;
        }
        if args.output.is_some() {
            self.output.colored = false;
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unknown variables are left as-is.
fn expand_env_vars(content: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid static regex");

    re.replace_all(content, |caps: &regex::Captures<'_>| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
