//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap.
//!
//! # Commands
//!
//! - `scan`: Scan a domain and print the report
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Force a fresh scan
//! sitecheck scan example.com
//!
//! # Reuse the results of a previous scan
//! sitecheck scan example.com --cache
//!
//! # Print the raw JSON response
//! sitecheck scan example.com --export --output report.json
//!
//! # Initialize configuration
//! sitecheck init
//! ```

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// SiteCheck - website malware, blacklist and security scanner.
#[derive(Parser, Debug)]
#[command(
    name = "sitecheck",
    author,
    version,
    about = "Website malware and security scanner powered by Sucuri SiteCheck",
    long_about = "The malware scanner is a free tool powered by Sucuri SiteCheck. It checks \
                  your website for known malware, blacklisting status, website errors, and \
                  out-of-date software. Full accuracy is not realistic and not guaranteed.",
    after_help = "For more information, visit: https://sitecheck.sucuri.net/"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "SITECHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a domain or web application
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the scan command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Domain name or web application to scan
    #[arg(value_name = "DOMAIN", value_parser = NonEmptyStringValueParser::new())]
    pub domain: String,

    /// Recycle the results from a previous scan
    #[arg(long)]
    pub cache: bool,

    /// Print the raw JSON response instead of the report
    #[arg(short, long)]
    pub export: bool,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Scanner API endpoint
    #[arg(long, value_name = "URL", env = "SITECHECK_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "sitecheck.yaml")]
    pub config: PathBuf,
}
