//! Command-line interface components
//!
//! This module contains CLI-specific code for the Lexin Fetcher application,
//! including argument parsing, collection selection, outcome reporting, and
//! command handlers.

pub mod args;
pub mod commands;
pub mod progress;
pub mod selection;

pub use args::{Cli, Commands, ConfigAction, ConfigArgs, DownloadArgs, GlobalArgs, ListArgs};
pub use commands::{handle_config, handle_download, handle_list};
pub use progress::{OutcomeReporter, ProgressConfig};
pub use selection::{interactive_selection, parse_selection, resolve_codes, SelectionInput};
