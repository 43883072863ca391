//! Text output formatter for human-readable display
//!
//! This module provides:
//! - An aligned table of resolved and latest versions per dependency
//! - Lag coloured by the largest kind of bump behind (major/minor/patch)
//! - Skipped dependency display with reasons
//! - Summary with a major/minor/patch breakdown

use crate::domain::{LagBreakdown, LagReport, LagResult};
use crate::lag::ReleaseType;
use crate::output::{OutputFormatter, Verbosity};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::io::Write;

const HEADERS: [&str; 8] = [
    "Package",
    "Constraint",
    "Resolved",
    "Latest",
    "Lag",
    "Major",
    "Minor",
    "Patch",
];

const DATE_HEADERS: [&str; 2] = ["Resolved at", "Latest at"];

/// Largest bump kind the dependency is behind by, if any
fn worst_release(breakdown: &LagBreakdown) -> Option<ReleaseType> {
    if breakdown.major > 0 {
        Some(ReleaseType::Major)
    } else if breakdown.minor > 0 {
        Some(ReleaseType::Minor)
    } else if breakdown.patch > 0 {
        Some(ReleaseType::Patch)
    } else {
        None
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn show_dates(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    fn row(&self, result: &LagResult) -> Vec<String> {
        let mut cells = vec![
            result.name.clone(),
            result.constraint.clone(),
            result.resolved.clone(),
            result.latest.clone(),
            result.lag.to_string(),
            result.breakdown.major.to_string(),
            result.breakdown.minor.to_string(),
            result.breakdown.patch.to_string(),
        ];
        if self.show_dates() {
            cells.push(format_date(result.resolved_published_at));
            cells.push(format_date(result.latest_published_at));
        }
        cells
    }

    fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
        if self.show_dates() {
            headers.extend(DATE_HEADERS.iter().map(|h| h.to_string()));
        }
        headers
    }

    /// Colour an already padded cell
    fn paint(&self, column: usize, padded: String, result: &LagResult) -> String {
        if !self.color {
            return padded;
        }
        match column {
            0 => padded.bold().to_string(),
            1 => padded.dimmed().to_string(),
            3 => padded.bright_white().to_string(),
            4 => match worst_release(&result.breakdown) {
                Some(ReleaseType::Major) => padded.red().bold().to_string(),
                Some(ReleaseType::Minor) => padded.yellow().to_string(),
                Some(ReleaseType::Patch) => padded.cyan().to_string(),
                None => padded.green().to_string(),
            },
            _ => padded,
        }
    }

    fn write_header(&self, report: &LagReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let package = report.package.as_deref().unwrap_or("package.json");
        let count = report.results.len() + report.skipped.len();
        let noun = if count == 1 {
            "dependency"
        } else {
            "dependencies"
        };

        if self.color {
            writeln!(
                writer,
                "{} {}: {} {}",
                package.bold(),
                format!("({})", report.kind).dimmed(),
                count,
                noun
            )?;
        } else {
            writeln!(writer, "{} ({}): {} {}", package, report.kind, count, noun)?;
        }
        writeln!(writer)
    }

    fn write_table(&self, report: &LagReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let headers = self.headers();
        let rows: Vec<(&LagResult, Vec<String>)> =
            report.results.values().map(|r| (r, self.row(r))).collect();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for (_, cells) in &rows {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header_line = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:w$}", h, w = *w))
            .collect::<Vec<_>>()
            .join("  ");
        if self.color {
            writeln!(writer, "  {}", header_line.trim_end().underline())?;
        } else {
            writeln!(writer, "  {}", header_line.trim_end())?;
        }

        for (result, cells) in rows {
            let line = cells
                .into_iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, w))| self.paint(i, format!("{:w$}", cell, w = *w), result))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(writer, "  {}", line.trim_end())?;
        }
        Ok(())
    }

    fn write_skipped(&self, report: &LagReport, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer)?;
        if self.color {
            writeln!(writer, "  {}", "Skipped:".yellow())?;
        } else {
            writeln!(writer, "  Skipped:")?;
        }

        let width = report
            .skipped
            .iter()
            .map(|s| s.name.len())
            .max()
            .unwrap_or(0);
        for skipped in &report.skipped {
            let name = format!("{:width$}", skipped.name, width = width);
            if self.color {
                writeln!(
                    writer,
                    "  {} {} {}",
                    name.dimmed(),
                    skipped.constraint.dimmed(),
                    format!("({})", skipped.reason).dimmed()
                )?;
            } else {
                writeln!(
                    writer,
                    "  {} {} ({})",
                    name, skipped.constraint, skipped.reason
                )?;
            }
        }
        Ok(())
    }

    fn write_summary(&self, report: &LagReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let mut breakdown = LagBreakdown::default();
        for result in report.results.values() {
            breakdown.major += result.breakdown.major;
            breakdown.minor += result.breakdown.minor;
            breakdown.patch += result.breakdown.patch;
        }

        let analyzed = report.results.len();
        let outdated = report.outdated_count();
        let skipped = if report.has_skipped() {
            format!(", {} skipped", report.skipped.len())
        } else {
            String::new()
        };

        writeln!(writer)?;
        if self.color {
            writeln!(
                writer,
                "Total lag {} across {} analyzed ({} outdated): {} major, {} minor, {} patch{}",
                report.total_lag().to_string().bold(),
                analyzed,
                outdated,
                breakdown.major.to_string().red(),
                breakdown.minor.to_string().yellow(),
                breakdown.patch.to_string().cyan(),
                skipped
            )
        } else {
            writeln!(
                writer,
                "Total lag {} across {} analyzed ({} outdated): {} major, {} minor, {} patch{}",
                report.total_lag(),
                analyzed,
                outdated,
                breakdown.major,
                breakdown.minor,
                breakdown.patch,
                skipped
            )
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &LagReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let quiet = self.verbosity == Verbosity::Quiet;

        if report.is_empty() {
            if !quiet {
                let package = report.package.as_deref().unwrap_or("package.json");
                writeln!(writer, "{} declares no {}", package, report.kind)?;
            }
            return Ok(());
        }

        if !quiet {
            self.write_header(report, writer)?;
        }
        if !report.results.is_empty() {
            self.write_table(report, writer)?;
        }
        if report.has_skipped() {
            self.write_skipped(report, writer)?;
        }
        if !quiet {
            self.write_summary(report, writer)?;
        }
        Ok(())
    }
}
