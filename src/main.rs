//! Lexin Fetcher CLI application
//!
//! Command-line interface for downloading the Lexin dictionary XML
//! collections. Features concurrent collection downloads, live per-language
//! reporting, and a final summary.

use std::process;

use tracing::{info, warn};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::{fmt, EnvFilter};

// Import CLI modules through the library
use lexin_fetcher::cli::{handle_config, handle_download, handle_list, Cli, Commands};
use lexin_fetcher::config::AppConfig;
use lexin_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration before logging so the configured level can apply
    let config = AppConfig::load(cli.global.config.clone()).await?;

    // Initialize logging based on verbosity
    init_logging(&cli, &config);

    info!("Lexin Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    // Execute the appropriate command
    match cli.command {
        Commands::List(args) => {
            info!("Executing list command");
            handle_list(args, &config).await
        }
        Commands::Download(args) => {
            info!("Executing download command");
            handle_download(args, &config).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args, &config, cli.global.config.clone()).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
///
/// Flags win over the configured level; `RUST_LOG` directives are honoured
/// for other targets.
fn init_logging(cli: &Cli, config: &AppConfig) {
    let log_level = cli
        .log_level()
        .map(|level| level.as_str().to_lowercase())
        .unwrap_or_else(|| config.logging.level.to_lowercase());

    // Create environment filter
    let mut filter = EnvFilter::from_default_env();
    let mut rejected = None;
    match format!("lexin_fetcher={}", log_level).parse::<Directive>() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(_) => {
            filter = filter.add_directive(LevelFilter::WARN.into());
            rejected = Some(log_level);
        }
    }

    // Initialize subscriber
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .with_writer(std::io::stderr)
        .init();

    if let Some(level) = rejected {
        warn!("Ignoring unknown log level '{}'", level);
    }

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
