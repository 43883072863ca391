//! Lag results and the per-run report

use super::DependencyKind;
use crate::error::{RegistryError, ResolutionError};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newer releases split by the kind of version bump that introduced them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagBreakdown {
    pub major: usize,
    pub minor: usize,
    pub patch: usize,
}

impl LagBreakdown {
    pub fn total(&self) -> usize {
        self.major + self.minor + self.patch
    }
}

/// Technical lag of one dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagResult {
    /// Dependency name
    pub name: String,
    /// Constraint as declared in the manifest
    pub constraint: String,
    /// Highest published version the constraint resolves to
    pub resolved: String,
    /// Highest published version overall
    pub latest: String,
    /// Number of published versions strictly newer than `resolved`
    pub lag: usize,
    /// `lag` split into major/minor/patch bumps
    pub breakdown: LagBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_published_at: Option<DateTime<Utc>>,
}

impl LagResult {
    /// Returns true when the resolved version is the latest one
    pub fn is_current(&self) -> bool {
        self.lag == 0
    }
}

impl fmt::Display for LagResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} -> {} (latest {}, lag {})",
            self.name, self.constraint, self.resolved, self.latest, self.lag
        )
    }
}

/// Reason why a dependency is missing from the results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum SkipReason {
    /// Version list could not be fetched
    FetchFailed(String),
    /// Version list was fetched but could not be decoded
    InvalidResponse(String),
    /// Constraint could not be matched to a published version
    Unresolved(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
            SkipReason::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
            SkipReason::Unresolved(msg) => write!(f, "unresolved: {}", msg),
        }
    }
}

impl From<RegistryError> for SkipReason {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Fetch(e) => SkipReason::FetchFailed(e.to_string()),
            RegistryError::Parse(e) => SkipReason::InvalidResponse(e.to_string()),
        }
    }
}

impl From<ResolutionError> for SkipReason {
    fn from(err: ResolutionError) -> Self {
        SkipReason::Unresolved(err.to_string())
    }
}

/// A dependency that was skipped instead of aborting the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDependency {
    pub name: String,
    pub constraint: String,
    pub reason: SkipReason,
}

impl SkippedDependency {
    pub fn new(name: impl Into<String>, constraint: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.into(),
            reason,
        }
    }
}

/// Result of one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagReport {
    /// `name@version` of the analysed package, when the manifest carries one
    pub package: Option<String>,
    /// Analysed dependency group
    pub kind: DependencyKind,
    /// Results keyed by dependency name, in manifest declaration order
    pub results: IndexMap<String, LagResult>,
    /// Dependencies that could not be analysed
    pub skipped: Vec<SkippedDependency>,
}

impl LagReport {
    /// Create an empty report
    pub fn new(package: Option<String>, kind: DependencyKind) -> Self {
        Self {
            package,
            kind,
            results: IndexMap::new(),
            skipped: Vec::new(),
        }
    }

    /// Add a computed result
    pub fn add_result(&mut self, result: LagResult) {
        self.results.insert(result.name.clone(), result);
    }

    /// Add a skipped dependency
    pub fn add_skipped(&mut self, skipped: SkippedDependency) {
        self.skipped.push(skipped);
    }

    /// Returns true if at least one dependency was skipped
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Returns true if nothing was analysed or skipped
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.skipped.is_empty()
    }

    /// Sum of the lag of every analysed dependency
    pub fn total_lag(&self) -> usize {
        self.results.values().map(|r| r.lag).sum()
    }

    /// Number of analysed dependencies with a non-zero lag
    pub fn outdated_count(&self) -> usize {
        self.results.values().filter(|r| !r.is_current()).count()
    }
}
