//! Report formatting
//!
//! - `console` - colored one-line-per-finding output with a summary
//! - `json` - tslint-compatible JSON

mod config;
mod console;
mod json;

pub use config::{OutputConfig, OutputFormat};
pub use console::write_console;
pub use json::{to_json, write_json};

use std::io;

use termcolor::{ColorChoice, StandardStream};

use crate::lint::FileReport;

/// `use_color` is already resolved against the terminal and environment, so
/// termcolor is not asked to detect again.
fn color_choice(use_color: bool) -> ColorChoice {
    if use_color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    }
}

/// Print reports to stdout in the configured format.
pub fn print_reports(
    config: &OutputConfig,
    reports: &[&FileReport],
    files_checked: usize,
) -> io::Result<()> {
    match config.format {
        OutputFormat::Json => write_json(&mut io::stdout().lock(), reports),
        OutputFormat::Console => {
            let mut stdout = StandardStream::stdout(color_choice(config.use_color));
            write_console(&mut stdout, reports, files_checked)
        }
    }
}
