//! Command handlers for Lexin Fetcher CLI
//!
//! This module implements the command handlers that coordinate between CLI
//! arguments, the loaded configuration, and the core application
//! functionality.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::app::models::Collection;
use crate::app::{CollectionDownloader, DownloadManager, LexinClient, ManagerConfig, OutcomeStream};
use crate::app::manager::DownloadSummary;
use crate::cli::progress::{OutcomeReporter, ProgressConfig};
use crate::cli::selection::{interactive_selection, resolve_codes, select_all};
use crate::cli::{ConfigAction, ConfigArgs, DownloadArgs, ListArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the list command
pub async fn handle_list(args: ListArgs, config: &AppConfig) -> Result<()> {
    let base_url = args
        .base_url
        .unwrap_or_else(|| config.download.base_url.clone());
    let (client_config, _) = config.to_runtime_config();
    let client = LexinClient::with_config(&client_config)?;

    let catalog = fetch_catalog_with_spinner(&client, &base_url).await?;

    println!("{:<4} {:<18} {:<28} DESCRIPTION", "#", "CODE", "LANGUAGE");
    for (i, collection) in catalog.iter().enumerate() {
        println!(
            "{:<4} {:<18} {:<28} {}",
            i + 1,
            collection.code,
            collection.display_name,
            collection.description
        );
    }
    println!();
    println!("{} languages available at {}", catalog.len(), base_url);

    Ok(())
}

/// Handle the download command
///
/// Fetches the catalog, resolves the selection (flags or interactive
/// prompt), runs the download session, and reports each outcome as it
/// arrives. Fails if any collection failed, carrying the last error.
pub async fn handle_download(args: DownloadArgs, config: &AppConfig) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.download.base_url.clone());
    let (client_config, manager_config) = config.to_runtime_config();
    let manager_config = apply_overrides(manager_config, &args);
    info!(
        "Download requested: output {}, concurrency {}",
        manager_config.output_root.display(),
        manager_config.max_concurrency
    );

    let client = Arc::new(LexinClient::with_config(&client_config)?);
    let catalog = fetch_catalog_with_spinner(&client, &base_url).await?;

    let selected = match select_collections(&args, &catalog)? {
        Some(selected) => selected,
        None => {
            println!("Exiting without downloading.");
            return Ok(());
        }
    };

    if selected.is_empty() {
        println!("No languages selected. Exiting.");
        return Ok(());
    }

    let manager = DownloadManager::new(
        manager_config,
        Arc::new(CollectionDownloader::new(Arc::clone(&client))),
    )?;

    println!(
        "\nStarting download of {} language directories...\n",
        selected.len()
    );
    let summary = report_outcomes(manager.start(selected), ProgressConfig::default()).await;

    if let Some(last_error) = summary.last_error {
        warn!("{} of {} languages failed", summary.failed, summary.processed);
        return Err(AppError::generic(format!(
            "{} of {} languages failed; last error: {}",
            summary.failed, summary.processed, last_error
        )));
    }

    println!("\nAll downloads complete!");
    Ok(())
}

/// Handle the config command
pub async fn handle_config(
    args: ConfigArgs,
    config: &AppConfig,
    config_path: Option<PathBuf>,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            match config_path.or_else(AppConfig::find_config_file) {
                Some(path) => println!("# Loaded from {}", path.display()),
                None => println!("# No configuration file found, showing defaults"),
            }
            print!("{}", config.to_toml_string()?);
        }
        ConfigAction::Init { path, force } => match AppConfig::init(path, force).await? {
            Some(written) => {
                println!("📁 Created configuration file:");
                println!("   {}", written.display());
            }
            None => {
                println!("Configuration file already exists; use --force to overwrite it.");
            }
        },
    }

    Ok(())
}

fn apply_overrides(mut manager_config: ManagerConfig, args: &DownloadArgs) -> ManagerConfig {
    if let Some(out) = &args.out {
        manager_config = manager_config.with_output_root(out);
    }
    if let Some(concurrency) = args.concurrency {
        manager_config = manager_config.with_max_concurrency(concurrency);
    }
    manager_config
}

/// Resolve the selection; `None` means the operator chose to quit
fn select_collections(
    args: &DownloadArgs,
    catalog: &[Collection],
) -> Result<Option<Vec<Collection>>> {
    if args.all {
        debug!("Selecting all {} collections", catalog.len());
        return Ok(Some(select_all(catalog)));
    }

    if let Some(codes) = &args.languages {
        return Ok(Some(resolve_codes(catalog, codes)?));
    }

    Ok(interactive_selection(catalog)?)
}

/// Drain an outcome stream through the reporter
async fn report_outcomes(mut stream: OutcomeStream, progress: ProgressConfig) -> DownloadSummary {
    let mut reporter = OutcomeReporter::new(stream.expected(), progress);
    reporter.start();

    while let Some(outcome) = stream.recv().await {
        reporter.report(&outcome);
    }

    reporter.finish()
}

async fn fetch_catalog_with_spinner(
    client: &LexinClient,
    base_url: &str,
) -> Result<Vec<Collection>> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
    }
    spinner.set_message(format!("Fetching catalog from {}...", base_url));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = client.fetch_catalog(base_url).await;
    spinner.finish_and_clear();
    result
}
