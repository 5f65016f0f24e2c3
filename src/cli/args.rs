//! Command-line argument parsing for Lexin Fetcher
//!
//! This module defines the CLI structure using clap derive macros,
//! providing catalog listing, collection downloading, and configuration
//! management.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::constants::workers;

/// Lexin Fetcher - Download the Lexin dictionary collections
#[derive(Parser, Debug)]
#[command(
    name = "lexin_fetcher",
    version,
    about = "Download the Lexin dictionary XML collections",
    long_about = "Discovers the Lexin dictionary collections (one per language) and downloads
every XML file of the selected collections, several collections at a time."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the collections offered by the catalog
    List(ListArgs),

    /// Download selected collections
    Download(DownloadArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the list command
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Catalog URL (overrides the configuration file)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Arguments for the download command
#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// Output directory (one subdirectory per collection)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Number of collections downloaded at the same time
    #[arg(short, long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Comma-separated collection codes, e.g. "svenska,grekiska"
    #[arg(short, long, value_delimiter = ',', value_name = "CODES")]
    pub languages: Option<Vec<String>>,

    /// Download every collection in the catalog
    #[arg(long, conflicts_with = "languages")]
    pub all: bool,

    /// Catalog URL (overrides the configuration file)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Destination (defaults to the user config directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level requested by flags, if any
    ///
    /// `None` means no verbosity flag was given and the configured level
    /// applies.
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}

impl DownloadArgs {
    /// Check argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if let Some(concurrency) = self.concurrency {
            if concurrency == 0 {
                return Err("Concurrency must be greater than 0".to_string());
            }
            if concurrency > workers::MAX_CONCURRENCY {
                return Err(format!(
                    "Concurrency must not exceed {}",
                    workers::MAX_CONCURRENCY
                ));
            }
        }

        if let Some(languages) = &self.languages {
            if languages.iter().all(|code| code.trim().is_empty()) {
                return Err("--languages needs at least one collection code".to_string());
            }
        }

        Ok(())
    }

    /// Whether the selection comes from flags rather than a prompt
    pub fn is_non_interactive(&self) -> bool {
        self.all || self.languages.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_args_validation() {
        let mut args = DownloadArgs::default();
        assert!(args.validate().is_ok());

        args.concurrency = Some(0);
        assert!(args.validate().is_err());

        args.concurrency = Some(workers::MAX_CONCURRENCY + 1);
        assert!(args.validate().is_err());

        args.concurrency = Some(4);
        assert!(args.validate().is_ok());

        args.languages = Some(vec![" ".to_string()]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_download_flags() {
        let cli = Cli::try_parse_from([
            "lexin_fetcher",
            "-v",
            "download",
            "-o",
            "/tmp/out",
            "-c",
            "5",
            "--languages",
            "svenska,grekiska",
        ])
        .unwrap();

        assert!(cli.global.verbose);
        match cli.command {
            Commands::Download(args) => {
                assert_eq!(args.out, Some(PathBuf::from("/tmp/out")));
                assert_eq!(args.concurrency, Some(5));
                assert_eq!(
                    args.languages,
                    Some(vec!["svenska".to_string(), "grekiska".to_string()])
                );
                assert!(args.is_non_interactive());
            }
            other => panic!("Expected download command, got {:?}", other),
        }
    }

    #[test]
    fn test_all_conflicts_with_languages() {
        let result = Cli::try_parse_from([
            "lexin_fetcher",
            "download",
            "--all",
            "--languages",
            "svenska",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_init_parsing() {
        let cli = Cli::try_parse_from(["lexin_fetcher", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert!(path.is_none());
                assert!(force);
            }
            other => panic!("Expected config init, got {:?}", other),
        }
    }

    #[test]
    fn test_log_level() {
        let mut cli = Cli {
            global: GlobalArgs {
                quiet: true,
                ..Default::default()
            },
            command: Commands::List(ListArgs::default()),
        };
        assert_eq!(cli.log_level(), Some(tracing::Level::ERROR));

        cli.global = GlobalArgs {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(cli.log_level(), Some(tracing::Level::INFO));

        cli.global.very_verbose = true;
        assert_eq!(cli.log_level(), Some(tracing::Level::DEBUG));

        cli.global = GlobalArgs::default();
        assert_eq!(cli.log_level(), None);
    }
}
