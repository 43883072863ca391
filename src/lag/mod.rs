//! Technical lag calculation
//!
//! This module provides:
//! - The published version list of a package
//! - Constraint resolution against that list
//! - Lag counting with a major/minor/patch breakdown

mod resolver;
mod version_info;

pub use resolver::resolve;
pub use version_info::{PackageVersions, VersionInfo};

use crate::domain::{LagBreakdown, LagResult};
use crate::error::ResolutionError;
use crate::parser::parse_constraint;
use semver::Version;

/// Kind of version bump between two consecutive releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    /// Major component changed
    Major,
    /// Minor component changed
    Minor,
    /// Patch component changed
    Patch,
}

impl ReleaseType {
    /// Classify the bump from `older` to `newer`
    pub fn between(older: &Version, newer: &Version) -> Self {
        if newer.major != older.major {
            ReleaseType::Major
        } else if newer.minor != older.minor {
            ReleaseType::Minor
        } else {
            ReleaseType::Patch
        }
    }
}

fn same_core(a: &Version, b: &Version) -> bool {
    a.major == b.major && a.minor == b.minor && a.patch == b.patch
}

/// Count the releases after `index`, classifying each against its predecessor
///
/// Pre-releases share the `major.minor.patch` core of their release, so every
/// version of a core is classified against the last version of the core
/// before it: `1.9.0, 2.0.0-rc.1, 2.0.0` counts two major releases.
pub fn compute_lag(versions: &[VersionInfo], index: usize) -> LagBreakdown {
    let mut breakdown = LagBreakdown::default();
    let mut previous_core: Option<&Version> = None;
    for (i, pair) in versions.windows(2).enumerate() {
        let (older, newer) = (&pair[0].version, &pair[1].version);
        if !same_core(older, newer) {
            previous_core = Some(older);
        }
        if i < index {
            continue;
        }
        let base = previous_core.unwrap_or(older);
        match ReleaseType::between(base, newer) {
            ReleaseType::Major => breakdown.major += 1,
            ReleaseType::Minor => breakdown.minor += 1,
            ReleaseType::Patch => breakdown.patch += 1,
        }
    }
    breakdown
}

/// Resolve a declared constraint and measure how far behind latest it is
pub fn calculate(
    name: &str,
    declared: &str,
    versions: &PackageVersions,
) -> Result<LagResult, ResolutionError> {
    let constraint = parse_constraint(declared)?;
    let index = resolve(&constraint, versions)?;

    let latest = versions
        .latest()
        .ok_or_else(|| ResolutionError::NoVersions {
            package: versions.name.clone(),
        })?;
    let list = versions.versions();
    let resolved = &list[index];
    let breakdown = compute_lag(list, index);

    Ok(LagResult {
        name: name.to_string(),
        constraint: declared.to_string(),
        resolved: resolved.version.to_string(),
        latest: latest.version.to_string(),
        lag: breakdown.total(),
        breakdown,
        resolved_published_at: resolved.published_at,
        latest_published_at: latest.published_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn versions(published: &[&str]) -> PackageVersions {
        PackageVersions::new(
            "pkg",
            published
                .iter()
                .map(|s| VersionInfo::new(v(s), None))
                .collect(),
            HashMap::from([("latest".to_string(), "2.0.0".to_string())]),
        )
    }

    #[rstest]
    #[case("1.0.0", "1.0.1", ReleaseType::Patch)]
    #[case("1.0.0", "1.1.0", ReleaseType::Minor)]
    #[case("1.9.3", "2.0.0", ReleaseType::Major)]
    #[case("0.1.0", "0.2.0", ReleaseType::Minor)]
    #[case("1.9.0", "2.0.0-rc.1", ReleaseType::Major)]
    fn test_release_type_between(
        #[case] older: &str,
        #[case] newer: &str,
        #[case] expected: ReleaseType,
    ) {
        assert_eq!(ReleaseType::between(&v(older), &v(newer)), expected);
    }

    #[test]
    fn test_compute_lag_classifies_release_after_prerelease() {
        let list = versions(&["1.9.0", "2.0.0-rc.1", "2.0.0", "2.0.1"]);
        let breakdown = compute_lag(list.versions(), 0);
        assert_eq!(
            breakdown,
            LagBreakdown {
                major: 2,
                minor: 0,
                patch: 1
            }
        );
        assert_eq!(breakdown.total(), 3);
    }

    #[test]
    fn test_compute_lag_from_prerelease_of_first_core() {
        let list = versions(&["1.0.0-beta.1", "1.0.0", "1.1.0"]);
        let breakdown = compute_lag(list.versions(), 0);
        assert_eq!(breakdown.patch, 1);
        assert_eq!(breakdown.minor, 1);
        assert_eq!(breakdown.total(), 2);
    }

    #[test]
    fn test_compute_lag_breakdown() {
        let list = versions(&["1.0.0", "1.0.1", "1.1.0", "1.1.1", "2.0.0"]);
        let breakdown = compute_lag(list.versions(), 1);
        assert_eq!(
            breakdown,
            LagBreakdown {
                major: 1,
                minor: 1,
                patch: 1
            }
        );
        assert_eq!(breakdown.total(), 3);
    }

    #[test]
    fn test_compute_lag_at_latest_is_zero() {
        let list = versions(&["1.0.0", "2.0.0"]);
        assert_eq!(compute_lag(list.versions(), 1).total(), 0);
    }

    #[rstest]
    #[case("1.0.0", 4)]
    #[case("^1.0.0", 1)]
    #[case("~1.0.0", 3)]
    #[case("2.0.0", 0)]
    #[case("latest", 0)]
    fn test_lag_equals_versions_after_resolved(#[case] declared: &str, #[case] expected: usize) {
        let list = versions(&["1.0.0", "1.0.1", "1.1.0", "1.1.1", "2.0.0"]);
        let result = calculate("pkg", declared, &list).unwrap();

        let index = list.position(&v(&result.resolved)).unwrap();
        assert_eq!(result.lag, list.len() - 1 - index);
        assert_eq!(result.lag, expected);
        assert_eq!(result.breakdown.total(), result.lag);
        assert_eq!(result.latest, "2.0.0");
    }

    #[test]
    fn test_calculate_keeps_declared_constraint() {
        let list = versions(&["1.0.0", "1.0.1"]);
        let result = calculate("pkg", " ~1.0.0", &list).unwrap();
        assert_eq!(result.name, "pkg");
        assert_eq!(result.constraint, " ~1.0.0");
        assert_eq!(result.resolved, "1.0.1");
        assert!(result.is_current());
    }

    #[test]
    fn test_calculate_propagates_resolution_errors() {
        let list = versions(&["1.0.0"]);
        assert!(matches!(
            calculate("pkg", "1.0.5", &list),
            Err(ResolutionError::ExactNotPublished { .. })
        ));
        assert!(matches!(
            calculate("pkg", ">>", &list),
            Err(ResolutionError::InvalidConstraint { .. })
        ));
    }
}
