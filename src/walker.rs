//! Discovering the files to lint
//!
//! Directories are walked with the `ignore` crate so `.gitignore`, `.ignore`
//! and hidden-file rules apply unless `show_all` is set. Files passed
//! explicitly are always kept when their extension is supported.

use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;
use tracing::warn;

use crate::language::Language;

/// Configuration for file discovery.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Include ignored and hidden files
    pub show_all: bool,
    /// Glob patterns matched against file names and relative paths
    pub exclude_patterns: Vec<String>,
}

/// Expand `paths` into the ordered, de-duplicated list of files to lint.
pub fn discover_files(paths: &[PathBuf], config: &WalkerConfig) -> Vec<PathBuf> {
    let patterns = compile_patterns(&config.exclude_patterns);
    let mut files = Vec::new();

    for root in paths {
        if root.is_file() {
            if Language::from_path(root).is_some() && !is_excluded(root, root, &patterns) {
                files.push(root.clone());
            }
            continue;
        }

        if !root.is_dir() {
            warn!(path = %root.display(), "no such file or directory");
            continue;
        }

        let walker = WalkBuilder::new(root)
            .hidden(!config.show_all)
            .ignore(!config.show_all)
            .git_ignore(!config.show_all)
            .git_global(!config.show_all)
            .git_exclude(!config.show_all)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker.flatten() {
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if Language::from_path(path).is_none() || is_excluded(path, root, &patterns) {
                continue;
            }
            files.push(path.to_path_buf());
        }
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|path| seen.insert(path.clone()));
    files
}

fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(pattern = %p, error = %e, "ignoring invalid exclude pattern");
                None
            }
        })
        .collect()
}

/// Check a file against the exclude patterns by name and by path relative to
/// the walk root.
fn is_excluded(path: &Path, root: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let relative = path.strip_prefix(root).unwrap_or(path);

    patterns
        .iter()
        .any(|p| p.matches(&name) || p.matches_path(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, path: &str, content: &str) -> PathBuf {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content).unwrap();
        full
    }

    fn names(files: &[PathBuf], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_discover_supported_files_sorted() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.ts", "");
        write(&dir, "a.js", "");
        write(&dir, "notes.md", "");
        write(&dir, "src/c.tsx", "");

        let files = discover_files(&[dir.path().to_path_buf()], &WalkerConfig::default());
        assert_eq!(names(&files, dir.path()), vec!["a.js", "b.ts", "src/c.tsx"]);
    }

    #[test]
    fn test_discover_respects_gitignore() {
        let dir = TempDir::new().unwrap();
        write(&dir, ".gitignore", "dist/\n");
        write(&dir, "app.ts", "");
        write(&dir, "dist/app.js", "");

        let files = discover_files(&[dir.path().to_path_buf()], &WalkerConfig::default());
        assert_eq!(names(&files, dir.path()), vec!["app.ts"]);

        let config = WalkerConfig {
            show_all: true,
            ..Default::default()
        };
        let files = discover_files(&[dir.path().to_path_buf()], &config);
        assert_eq!(names(&files, dir.path()), vec!["app.ts", "dist/app.js"]);
    }

    #[test]
    fn test_discover_exclude_patterns() {
        let dir = TempDir::new().unwrap();
        write(&dir, "app.ts", "");
        write(&dir, "app.spec.ts", "");
        write(&dir, "vendor/lib.js", "");

        let config = WalkerConfig {
            exclude_patterns: vec!["*.spec.ts".to_string(), "vendor/*".to_string()],
            ..Default::default()
        };
        let files = discover_files(&[dir.path().to_path_buf()], &config);
        assert_eq!(names(&files, dir.path()), vec!["app.ts"]);
    }

    #[test]
    fn test_discover_explicit_file_and_dedup() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "app.ts", "");

        let files = discover_files(
            &[file.clone(), dir.path().to_path_buf()],
            &WalkerConfig::default(),
        );
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_discover_missing_path() {
        let files = discover_files(
            &[PathBuf::from("/nonexistent/dir")],
            &WalkerConfig::default(),
        );
        assert!(files.is_empty());
    }
}
