//! Shared file reading utilities
//!
//! Reads a lintable source file, skipping files that are too large or have an
//! unsupported extension.

use std::path::Path;

use tracing::warn;

use crate::error::{Error, Result};
use crate::language::Language;

/// Default maximum file size for linting (1MB).
/// Larger files are usually generated or bundled and are skipped.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_000_000;

/// Read a source file if it meets size requirements.
///
/// Returns `Ok(None)` if the file is larger than `max_size`. Fails with
/// [`Error::UnsupportedLanguage`] for extensions the rule cannot lint and
/// with [`Error::Io`] when the file cannot be read.
pub fn read_source_file(path: &Path, max_size: u64) -> Result<Option<(String, Language)>> {
    let language =
        Language::from_path(path).ok_or_else(|| Error::UnsupportedLanguage(path.to_path_buf()))?;

    let metadata = path.metadata().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > max_size {
        warn!(
            path = %path.display(),
            size = metadata.len(),
            max_size,
            "skipping file larger than the size limit"
        );
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some((content, language)))
}

/// Parse a file size string like "5M", "100K", "1G" into bytes.
/// Supports suffixes: K/KB (1024), M/MB (1024^2), G/GB (1024^3)
/// Without suffix, interprets as bytes.
pub fn parse_file_size(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size too large: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_source_file_success() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("app.ts");
        fs::write(&file_path, "const a = 1;").unwrap();

        let (content, language) = read_source_file(&file_path, DEFAULT_MAX_FILE_SIZE)
            .unwrap()
            .unwrap();
        assert_eq!(content, "const a = 1;");
        assert_eq!(language, Language::TypeScript);
    }

    #[test]
    fn test_read_source_file_case_insensitive_extension() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("APP.JS");
        fs::write(&file_path, "var a;").unwrap();

        let (_, language) = read_source_file(&file_path, DEFAULT_MAX_FILE_SIZE)
            .unwrap()
            .unwrap();
        assert_eq!(language, Language::JavaScript);
    }

    #[test]
    fn test_read_source_file_unsupported() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("notes.md");
        fs::write(&file_path, "# notes").unwrap();

        let result = read_source_file(&file_path, DEFAULT_MAX_FILE_SIZE);
        assert!(matches!(result, Err(Error::UnsupportedLanguage(_))));
    }

    #[test]
    fn test_read_source_file_nonexistent() {
        let result = read_source_file(Path::new("/nonexistent/file.ts"), DEFAULT_MAX_FILE_SIZE);
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_read_source_file_too_large() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("bundle.js");
        fs::write(&file_path, "x".repeat(200)).unwrap();

        assert!(read_source_file(&file_path, 100).unwrap().is_none());
        assert!(read_source_file(&file_path, 200).unwrap().is_some());
    }

    #[test]
    fn test_parse_file_size() {
        assert_eq!(parse_file_size("100"), Ok(100));
        assert_eq!(parse_file_size("5K"), Ok(5 * 1024));
        assert_eq!(parse_file_size("5kb"), Ok(5 * 1024));
        assert_eq!(parse_file_size("2M"), Ok(2 * 1024 * 1024));
        assert_eq!(parse_file_size(" 1G "), Ok(1024 * 1024 * 1024));
        assert!(parse_file_size("abc").is_err());
        assert!(parse_file_size("").is_err());
    }
}
