//! SiteCheck CLI entry point.
//!
//! This binary provides the command-line interface for SiteCheck.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sitecheck::cli::{Cli, Commands, ScanArgs};
use sitecheck::error::ResultExt;
use sitecheck::reporter::TextReporter;
use sitecheck::{Config, Scanner, SiteCheckError};
use std::error::Error as _;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_CONFIG_PATHS: [&str; 3] = ["sitecheck.yaml", "sitecheck.yml", ".sitecheck.yaml"];

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("Error: {e}");

            // Print error chain (cause chain)
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            match e.downcast_ref::<SiteCheckError>() {
                Some(err) => {
                    if let Some(payload) = err.raw_payload() {
                        eprintln!("\nRaw response:\n{payload}");
                    }
                    ExitCode::from(err.exit_code())
                }
                None => ExitCode::from(1),
            }
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // First try to use RUST_LOG from environment, otherwise use verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,sitecheck={base_level}"))
        })
    };

    // stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Scan(ref args) => {
            tracing::debug!("Loading configuration");
            let mut config = load_config(&cli)?;
            config.merge_cli_args(args);
            if cli.no_color {
                config.output.colored = false;
            }
            config.validate()?;
            tracing::debug!("Configuration loaded successfully");

            scan(&config, args, cli.quiet).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Init => {
            // Generate example configuration file
            let config_path = Path::new(DEFAULT_CONFIG_PATHS[0]);

            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml()).with_path(config_path)?;
            println!("Created example configuration: {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate(ref args) => {
            let content = std::fs::read_to_string(&args.config).with_path(&args.config)?;
            match Config::from_yaml(&content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.config.display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(ExitCode::from(e.exit_code()))
                }
            }
        }
    }
}

async fn scan(config: &Config, args: &ScanArgs, quiet: bool) -> anyhow::Result<()> {
    let scanner = Scanner::new(config.clone())?;

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        spinner.set_message(format!("Scanning {}", args.domain));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };

    let raw = scanner.fetch(&args.domain).await;
    spinner.finish_and_clear();
    let raw = raw?;

    if config.output.export {
        return write_output(args.output.as_deref(), raw.as_bytes());
    }

    let report = raw.decode()?;
    let text = TextReporter::new(config).generate(&report);
    tracing::debug!(bytes = text.len(), "Rendered report");

    write_output(args.output.as_deref(), text.as_bytes())
}

fn write_output(path: Option<&Path>, content: &[u8]) -> anyhow::Result<()> {
    if let Some(output_path) = path {
        std::fs::write(output_path, content).with_path(output_path)?;
        tracing::info!(path = %output_path.display(), "Report written");
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content)?;
        stdout.flush()?;
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    // Check for explicit config file
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        let content = std::fs::read_to_string(config_path).with_path(config_path)?;
        return Ok(Config::from_yaml(&content)?);
    }

    // Look for default config files
    for path in DEFAULT_CONFIG_PATHS {
        if Path::new(path).exists() {
            tracing::debug!(path = %path, "Found configuration file");
            let content = std::fs::read_to_string(path).with_path(path)?;
            return Ok(Config::from_yaml(&content)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
