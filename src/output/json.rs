//! JSON output formatting
//!
//! Mirrors tslint's `json` formatter: one record per finding with zero-based
//! line and character positions.

use std::io::{self, Write};

use serde::Serialize;

use crate::lint::{FileReport, Finding, Position};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPosition {
    position: usize,
    line: usize,
    character: usize,
}

impl JsonPosition {
    fn new(offset: usize, position: Position) -> Self {
        Self {
            position: offset,
            line: position.line - 1,
            character: position.column - 1,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonFailure {
    name: String,
    rule_name: &'static str,
    rule_severity: &'static str,
    failure: &'static str,
    start_position: JsonPosition,
    end_position: JsonPosition,
}

impl JsonFailure {
    fn new(report: &FileReport, finding: &Finding) -> Self {
        Self {
            name: report.path.display().to_string(),
            rule_name: finding.rule,
            rule_severity: "ERROR",
            failure: finding.message,
            start_position: JsonPosition::new(finding.offset, finding.start),
            end_position: JsonPosition::new(finding.offset + finding.length, finding.end),
        }
    }
}

/// Render all findings as a pretty-printed JSON array.
pub fn to_json(reports: &[&FileReport]) -> serde_json::Result<String> {
    let failures: Vec<JsonFailure> = reports
        .iter()
        .flat_map(|report| {
            report
                .findings
                .iter()
                .map(move |finding| JsonFailure::new(report, finding))
        })
        .collect();
    serde_json::to_string_pretty(&failures)
}

/// Print findings as JSON.
pub fn write_json<W: Write>(out: &mut W, reports: &[&FileReport]) -> io::Result<()> {
    let json = to_json(reports).map_err(io::Error::other)?;
    writeln!(out, "{}", json)
}
