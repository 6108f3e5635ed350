//! Running the rule over files
//!
//! Files are linted independently, so they are spread over a rayon pool.
//! Results come back in the order the files were given.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::file_utils::{DEFAULT_MAX_FILE_SIZE, read_source_file};
use crate::rule::{Failure, NoCommentedCode, RULE_NAME};

/// Configuration for a lint run.
#[derive(Debug, Clone)]
pub struct LintConfig {
    /// Number of parallel workers.
    /// 0 = auto-detect (use all available cores)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub parallel_workers: usize,
    /// Files larger than this many bytes are skipped
    pub max_file_size: u64,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 0,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// A 1-based line and column, with the column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A failure located in its file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub offset: usize,
    pub length: usize,
    pub start: Position,
    pub end: Position,
    pub message: &'static str,
    pub rule: &'static str,
}

/// All findings for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
}

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Position of a byte offset. Offsets past the end clamp to the end.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        Position {
            line: line + 1,
            column: column + 1,
        }
    }
}

impl Finding {
    fn locate(failure: &Failure, index: &LineIndex<'_>) -> Self {
        Self {
            offset: failure.offset,
            length: failure.length,
            start: index.position(failure.offset),
            end: index.position(failure.offset + failure.length),
            message: failure.message,
            rule: RULE_NAME,
        }
    }
}

/// Lint a single file.
///
/// Returns `Ok(None)` when the file is skipped for its size.
pub fn lint_file(
    path: &Path,
    rule: &NoCommentedCode,
    max_file_size: u64,
) -> Result<Option<FileReport>> {
    let Some((source, language)) = read_source_file(path, max_file_size)? else {
        return Ok(None);
    };

    let failures = rule.check_source(&source, language)?;
    debug!(path = %path.display(), failures = failures.len(), "linted file");

    let index = LineIndex::new(&source);
    let findings = failures
        .iter()
        .map(|failure| Finding::locate(failure, &index))
        .collect();

    Ok(Some(FileReport {
        path: path.to_path_buf(),
        findings,
    }))
}

/// Lint many files, possibly in parallel. Skipped files are left out.
pub fn lint_files(
    files: &[PathBuf],
    rule: &NoCommentedCode,
    config: &LintConfig,
) -> Vec<(PathBuf, Result<FileReport>)> {
    info!(files = files.len(), workers = config.parallel_workers, "linting");

    let lint_one = |path: &PathBuf| {
        lint_file(path, rule, config.max_file_size)
            .transpose()
            .map(|result| (path.clone(), result))
    };

    match config.parallel_workers {
        1 => files.iter().filter_map(lint_one).collect(),
        0 => files.par_iter().filter_map(lint_one).collect(),
        workers => match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => {
                pool.install(|| files.par_iter().filter_map(lint_one).collect::<Vec<_>>())
            }
            Err(e) => {
                debug!(error = %e, "falling back to the global thread pool");
                files.par_iter().filter_map(lint_one).collect()
            }
        },
    }
}
