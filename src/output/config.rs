//! Output configuration types

use clap::ValueEnum;

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per finding, for humans
    #[default]
    Console,
    /// tslint-compatible JSON array
    Json,
}

/// Configuration for output formatting.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    pub use_color: bool,
    pub format: OutputFormat,
}
