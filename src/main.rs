//! CLI entry point for no-commented-code

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use no_commented_code::{
    Error, FileReport, LintConfig, NoCommentedCode, OutputConfig, OutputFormat, RuleOptions,
    RuleSetting, WalkerConfig, discover_files, file_utils, lint_files, load_options, print_reports,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Exit code when findings were reported.
const EXIT_FINDINGS: u8 = 1;
/// Exit code for usage, configuration, and I/O errors.
const EXIT_ERROR: u8 = 2;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "no-commented-code")]
#[command(about = "Report blocks of commented-out code in TypeScript and JavaScript sources")]
#[command(version)]
struct Args {
    /// Files or directories to lint
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// JSON options file (bare options or a tslint.json with a "no-commented-code" rule)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Lines matching this pattern are ignored before judging a comment
    #[arg(long = "ignored-comment-regex", value_name = "REGEX")]
    ignored_comment_regex: Option<String>,

    /// Comments with fewer lines than this are never reported
    #[arg(long = "min-line-count", value_name = "N")]
    min_line_count: Option<usize>,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "console")]
    format: OutputFormat,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Lint all files (ignore .gitignore and hidden-file filtering)
    #[arg(short, long)]
    all: bool,

    /// Skip files matching pattern (can be used multiple times)
    #[arg(short = 'e', long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Number of parallel workers
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Maximum file size to lint (default: 1MB)
    /// Files larger than this are skipped. Use suffixes: K, M, G (e.g., 5M for 5MB)
    #[arg(long = "max-file-size", value_name = "SIZE")]
    max_file_size: Option<String>,

    /// Log debug information to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Combine the options file with command-line overrides.
fn resolve_setting(args: &Args) -> Result<RuleSetting, Error> {
    let setting = match &args.config {
        Some(path) => load_options(path)?,
        None => RuleSetting::default(),
    };

    let mut options = match setting {
        RuleSetting::Enabled(options) => options,
        RuleSetting::Disabled => return Ok(RuleSetting::Disabled),
    };

    if let Some(pattern) = &args.ignored_comment_regex {
        options.ignored_comment_regex = pattern.clone();
    }
    if let Some(count) = args.min_line_count {
        options.min_line_count = count;
    }

    Ok(RuleSetting::Enabled(options))
}

fn run(args: &Args) -> Result<u8, Error> {
    let max_file_size = match &args.max_file_size {
        Some(size) => file_utils::parse_file_size(size).map_err(|message| Error::InvalidOption {
            name: "--max-file-size",
            message,
        })?,
        None => file_utils::DEFAULT_MAX_FILE_SIZE,
    };

    let options: RuleOptions = match resolve_setting(args)? {
        RuleSetting::Enabled(options) => options,
        RuleSetting::Disabled => {
            debug!("rule disabled by configuration");
            return Ok(0);
        }
    };
    let rule: NoCommentedCode = options.compile()?;

    let walker_config = WalkerConfig {
        show_all: args.all,
        exclude_patterns: args.exclude.clone(),
    };
    let files = discover_files(&args.paths, &walker_config);

    let lint_config = LintConfig {
        parallel_workers: args.jobs,
        max_file_size,
    };
    let results = lint_files(&files, &rule, &lint_config);

    let mut had_errors = false;
    let mut reports: Vec<&FileReport> = Vec::new();
    for (path, result) in &results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                had_errors = true;
                warn!(path = %path.display(), "skipping file");
                eprintln!("no-commented-code: {}", e);
            }
        }
    }

    let output_config = OutputConfig {
        use_color: should_use_color(args.color),
        format: args.format,
    };
    print_reports(&output_config, &reports, reports.len()).map_err(|source| Error::Io {
        path: PathBuf::from("<stdout>"),
        source,
    })?;

    let has_findings = reports.iter().any(|r| !r.findings.is_empty());
    Ok(if had_errors {
        EXIT_ERROR
    } else if has_findings {
        EXIT_FINDINGS
    } else {
        0
    })
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("no-commented-code: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
