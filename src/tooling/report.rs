//! Run summary: text (tables) and JSON renderings.

use crate::error::{Mismatch, MismatchKind, MismatchSource};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of the optional data directory check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DataCheck {
    Skipped,
    Checked { path: PathBuf },
    Failed { path: PathBuf, reason: String },
}

/// Result of one merge run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub template: PathBuf,
    pub output: PathBuf,
    pub content_sources: usize,
    pub content_entries: usize,
    pub tables: usize,
    pub fields: usize,
    pub fields_updated: usize,
    pub mismatches: Vec<Mismatch>,
    pub data_check: DataCheck,
}

impl RunReport {
    /// Process exit code: 0, or 2 when the output was written but the data check failed.
    pub fn exit_code(&self) -> i32 {
        match self.data_check {
            DataCheck::Failed { .. } => 2,
            _ => 0,
        }
    }
}

fn heading(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}

fn source_label(source: MismatchSource) -> &'static str {
    match source {
        MismatchSource::Content => "content",
        MismatchSource::Data => "data",
    }
}

fn kind_label(kind: MismatchKind) -> &'static str {
    match kind {
        MismatchKind::UnknownTable => "unknown table",
        MismatchKind::UnknownField => "unknown field",
        MismatchKind::MissingFromData => "missing from data",
        MismatchKind::MissingFromTemplate => "missing from template",
    }
}

/// Format the run summary as human-readable text.
pub fn format_report_text(report: &RunReport, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", heading("Merge", color)));
    out.push_str(&format!("  Template: {}\n", report.template.display()));
    out.push_str(&format!("  Output: {}\n", report.output.display()));
    out.push_str(&format!(
        "  Content: {} source(s), {} entries\n",
        report.content_sources, report.content_entries
    ));
    out.push_str(&format!(
        "  Tables: {}  Fields: {}  Updated: {}\n",
        report.tables, report.fields, report.fields_updated
    ));

    match &report.data_check {
        DataCheck::Skipped => {}
        DataCheck::Checked { path } => {
            out.push_str(&format!("  Data check: {}\n", path.display()));
        }
        DataCheck::Failed { reason, .. } => {
            let line = format!("  Data check failed: {}", reason);
            if color {
                out.push_str(&format!("{}\n", line.red()));
            } else {
                out.push_str(&format!("{}\n", line));
            }
        }
    }
    out.push('\n');

    if report.mismatches.is_empty() {
        out.push_str("No mismatches.\n");
        return out;
    }

    out.push_str(&format!(
        "{}\n\n",
        heading(&format!("Mismatches ({})", report.mismatches.len()), color)
    ));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Source", "Kind", "Location"]);
    for m in &report.mismatches {
        table.add_row(vec![
            source_label(m.source).to_string(),
            kind_label(m.kind).to_string(),
            m.location(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Format the run summary as JSON.
pub fn format_report_json(report: &RunReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Format by name; anything other than "json" is text.
pub fn format_report(report: &RunReport, format: &str, color: bool) -> String {
    if format == "json" {
        format_report_json(report)
    } else {
        format_report_text(report, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(mismatches: Vec<Mismatch>, data_check: DataCheck) -> RunReport {
        RunReport {
            template: PathBuf::from("template.yaml"),
            output: PathBuf::from("out.json"),
            content_sources: 1,
            content_entries: 3,
            tables: 2,
            fields: 5,
            fields_updated: 2,
            mismatches,
            data_check,
        }
    }

    #[test]
    fn test_text_without_mismatches() {
        let text = format_report_text(&report(vec![], DataCheck::Skipped), false);
        assert!(text.contains("Updated: 2"));
        assert!(text.contains("No mismatches."));
        assert!(!text.contains("Data check"));
    }

    #[test]
    fn test_text_lists_mismatches() {
        let mismatches = vec![Mismatch::content(
            MismatchKind::UnknownTable,
            "bar",
            Some("foo"),
        )];
        let text = format_report_text(&report(mismatches, DataCheck::Skipped), false);
        assert!(text.contains("Mismatches (1)"));
        assert!(text.contains("bar.foo"));
        assert!(text.contains("unknown table"));
    }

    #[test]
    fn test_json_contract() {
        let failed = DataCheck::Failed {
            path: PathBuf::from("data"),
            reason: "not found".to_string(),
        };
        let r = report(
            vec![Mismatch::data(MismatchKind::MissingFromData, "sites", None)],
            failed,
        );
        assert_eq!(r.exit_code(), 2);

        let parsed: serde_json::Value = serde_json::from_str(&format_report_json(&r)).unwrap();
        assert_eq!(parsed["fields_updated"], 2);
        assert_eq!(parsed["data_check"]["status"], "failed");
        assert_eq!(parsed["mismatches"][0]["kind"], "missing_from_data");
        assert_eq!(parsed["mismatches"][0]["source"], "data");
        assert!(parsed["mismatches"][0].get("field").is_none());
    }
}
