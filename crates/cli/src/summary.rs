//! Per-source summary rows for the final report

use scout_core::application::workflow::{WorkflowReport, WorkflowSection};
use scout_core::domain::SearchSource;
use serde_json::Value;
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Status")]
    pub status: &'static str,
    #[tabled(rename = "Results")]
    pub results: String,
}

pub const STATUS_OK: &str = "OK";
/// Adapter answered, but with an error payload from its provider
pub const STATUS_PROVIDER_ERROR: &str = "PROVIDER ERROR";
/// Adapter could not be called
pub const STATUS_FAILED: &str = "FAILED";

pub fn rows(report: &WorkflowReport) -> Vec<SummaryRow> {
    report.sections.iter().map(row).collect()
}

fn row(section: &WorkflowSection) -> SummaryRow {
    let (status, results) = if !section.succeeded {
        (STATUS_FAILED, None)
    } else if section.source == SearchSource::WebSearch {
        web_summary(&section.output)
    } else {
        json_summary(&section.output)
    };
    SummaryRow {
        source: section.source.to_string(),
        status,
        results: results.map_or_else(|| "-".to_string(), |n| n.to_string()),
    }
}

/// Reddit / Twitter bodies: a record with `count`, or an error record
fn json_summary(body: &str) -> (&'static str, Option<u64>) {
    match serde_json::from_str::<Value>(body) {
        Ok(doc) if doc.get("error").is_some() => (STATUS_PROVIDER_ERROR, None),
        Ok(doc) => (STATUS_OK, doc.get("count").and_then(Value::as_u64)),
        Err(_) => (STATUS_PROVIDER_ERROR, None),
    }
}

/// Web-search bodies are text: entries, the empty marker, or `Error: ...`
fn web_summary(body: &str) -> (&'static str, Option<u64>) {
    if body.starts_with("Error: ") {
        return (STATUS_PROVIDER_ERROR, None);
    }
    let entries = body.lines().filter(|l| l.starts_with("Title: ")).count();
    (STATUS_OK, Some(entries as u64))
}
