//! Loading rule options from a JSON file
//!
//! Two layouts are accepted:
//!
//! - A bare options object:
//!   `{"ignoredCommentRegex": "^(\\w+$|TODO)", "minLineCount": 3}`
//! - A tslint-style document, where the rule entry is `true`, `false`,
//!   `[true, {...options}]`, or `{"severity": "...", "options": {...}}`:
//!   `{"rules": {"no-commented-code": [true, {"minLineCount": 3}]}}`
//!
//! A tslint document that does not mention the rule leaves it enabled with
//! default options.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::rule::{RULE_NAME, RuleOptions};

/// Whether the rule runs, and with which options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSetting {
    Enabled(RuleOptions),
    Disabled,
}

impl Default for RuleSetting {
    fn default() -> Self {
        RuleSetting::Enabled(RuleOptions::default())
    }
}

/// Read and parse an options file.
pub fn load_options(path: &Path) -> Result<RuleSetting> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loading rule options");
    parse_options(&content).map_err(|message| Error::Config {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse the contents of an options file.
pub fn parse_options(content: &str) -> std::result::Result<RuleSetting, String> {
    let document: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    let Some(rules) = document.get("rules") else {
        return options_from(document).map(RuleSetting::Enabled);
    };

    match rules.get(RULE_NAME) {
        None => Ok(RuleSetting::default()),
        Some(entry) => parse_rule_entry(entry),
    }
}

fn parse_rule_entry(entry: &Value) -> std::result::Result<RuleSetting, String> {
    match entry {
        Value::Bool(true) => Ok(RuleSetting::default()),
        Value::Bool(false) => Ok(RuleSetting::Disabled),
        Value::Array(items) => match items.as_slice() {
            [Value::Bool(false), ..] => Ok(RuleSetting::Disabled),
            [Value::Bool(true)] => Ok(RuleSetting::default()),
            [Value::Bool(true), options] => options_from(options.clone()).map(RuleSetting::Enabled),
            _ => Err(format!(
                "\"{}\" must be [enabled] or [enabled, options]",
                RULE_NAME
            )),
        },
        Value::Object(fields) => {
            let severity = fields.get("severity").and_then(Value::as_str);
            if matches!(severity, Some("off" | "none")) {
                return Ok(RuleSetting::Disabled);
            }
            match fields.get("options") {
                Some(options) => options_from(options.clone()).map(RuleSetting::Enabled),
                None => Ok(RuleSetting::default()),
            }
        }
        _ => Err(format!("unsupported value for \"{}\"", RULE_NAME)),
    }
}

fn options_from(value: Value) -> std::result::Result<RuleOptions, String> {
    serde_json::from_value(value).map_err(|e| e.to_string())
}
