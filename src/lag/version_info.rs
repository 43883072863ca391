//! Published version list of a package
//!
//! Built from the registry packument: every version key that parses as
//! semver, sorted ascending, with its publish time when the registry has one.

use chrono::{DateTime, Utc};
use semver::Version;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A published version with its release date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: Version,
    /// When this version was published, if the registry reports it
    pub published_at: Option<DateTime<Utc>>,
}

impl VersionInfo {
    /// Create a new VersionInfo
    pub fn new(version: Version, published_at: Option<DateTime<Utc>>) -> Self {
        Self {
            version,
            published_at,
        }
    }
}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every published version of one package plus its dist-tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersions {
    pub name: String,
    versions: Vec<VersionInfo>,
    dist_tags: HashMap<String, String>,
}

impl PackageVersions {
    /// Build the list; versions are sorted ascending and duplicates dropped
    pub fn new(
        name: impl Into<String>,
        mut versions: Vec<VersionInfo>,
        dist_tags: HashMap<String, String>,
    ) -> Self {
        versions.sort();
        versions.dedup_by(|a, b| a.version == b.version);
        Self {
            name: name.into(),
            versions,
            dist_tags,
        }
    }

    /// Versions in ascending semver order
    pub fn versions(&self) -> &[VersionInfo] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Highest version under semver precedence, pre-releases included
    pub fn latest(&self) -> Option<&VersionInfo> {
        self.versions.last()
    }

    /// Index of the highest published version with the precedence of `version`
    ///
    /// Build metadata is ignored, so `1.2.3` finds a published `1.2.3+build.1`.
    pub fn position(&self, version: &Version) -> Option<usize> {
        let end = self
            .versions
            .partition_point(|info| info.version.cmp_precedence(version) != Ordering::Greater);
        let index = end.checked_sub(1)?;
        (self.versions[index].version.cmp_precedence(version) == Ordering::Equal).then_some(index)
    }

    /// Version string a dist-tag points to
    pub fn tagged(&self, tag: &str) -> Option<&str> {
        self.dist_tags.get(tag).map(String::as_str)
    }
}
