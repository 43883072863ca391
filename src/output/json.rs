//! JSON output formatter for machine processing

use crate::domain::{LagBreakdown, LagReport, SkipReason};
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    package: Option<&'a str>,
    kind: &'static str,
    summary: JsonSummary,
    /// Results keyed by dependency name, in declaration order
    dependencies: IndexMap<&'a str, JsonDependency<'a>>,
    skipped: Vec<JsonSkip<'a>>,
}

#[derive(Serialize)]
struct JsonSummary {
    analyzed: usize,
    outdated: usize,
    skipped: usize,
    total_lag: usize,
}

#[derive(Serialize)]
struct JsonDependency<'a> {
    constraint: &'a str,
    resolved: &'a str,
    latest: &'a str,
    lag: usize,
    breakdown: LagBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved_published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_published_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct JsonSkip<'a> {
    name: &'a str,
    constraint: &'a str,
    reason: &'a SkipReason,
}

impl JsonFormatter {
    fn to_json<'a>(&self, report: &'a LagReport) -> JsonOutput<'a> {
        let dependencies = report
            .results
            .iter()
            .map(|(name, r)| {
                (
                    name.as_str(),
                    JsonDependency {
                        constraint: &r.constraint,
                        resolved: &r.resolved,
                        latest: &r.latest,
                        lag: r.lag,
                        breakdown: r.breakdown,
                        resolved_published_at: r.resolved_published_at,
                        latest_published_at: r.latest_published_at,
                    },
                )
            })
            .collect();

        let skipped = report
            .skipped
            .iter()
            .map(|s| JsonSkip {
                name: &s.name,
                constraint: &s.constraint,
                reason: &s.reason,
            })
            .collect();

        JsonOutput {
            package: report.package.as_deref(),
            kind: report.kind.label(),
            summary: JsonSummary {
                analyzed: report.results.len(),
                outdated: report.outdated_count(),
                skipped: report.skipped.len(),
                total_lag: report.total_lag(),
            },
            dependencies,
            skipped,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &LagReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = self.to_json(report);
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{}", json)
    }
}
