//! Console output formatter
//!
//! Writes `path:line:column  message  rule` per finding, then a summary.

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

use crate::lint::FileReport;

/// Write findings for humans. `files_checked` feeds the summary line.
pub fn write_console<W: WriteColor>(
    out: &mut W,
    reports: &[&FileReport],
    files_checked: usize,
) -> io::Result<()> {
    let mut location = ColorSpec::new();
    location.set_fg(Some(Color::Cyan));
    let mut message = ColorSpec::new();
    message.set_fg(Some(Color::Red));
    let mut rule = ColorSpec::new();
    rule.set_dimmed(true);

    let mut total = 0;
    let mut files_with_findings = 0;

    for report in reports {
        if report.findings.is_empty() {
            continue;
        }
        files_with_findings += 1;

        for finding in &report.findings {
            total += 1;
            out.set_color(&location)?;
            write!(
                out,
                "{}:{}:{}",
                report.path.display(),
                finding.start.line,
                finding.start.column
            )?;
            out.reset()?;
            write!(out, "  ")?;
            out.set_color(&message)?;
            write!(out, "{}", finding.message)?;
            out.reset()?;
            write!(out, "  ")?;
            out.set_color(&rule)?;
            write!(out, "{}", finding.rule)?;
            out.reset()?;
            writeln!(out)?;
        }
    }

    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    if total == 0 {
        writeln!(
            out,
            "No commented code found in {} {}.",
            files_checked,
            plural(files_checked, "file", "files")
        )?;
    } else {
        writeln!(out)?;
        out.set_color(&bold)?;
        write!(
            out,
            "{} {} in {} of {} {}",
            total,
            plural(total, "problem", "problems"),
            files_with_findings,
            files_checked,
            plural(files_checked, "file", "files")
        )?;
        out.reset()?;
        writeln!(out)?;
    }

    Ok(())
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}
