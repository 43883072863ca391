//! Constraint resolution against a published version list

use super::PackageVersions;
use crate::domain::VersionConstraint;
use crate::error::ResolutionError;
use semver::Version;
use tracing::debug;

/// Resolve `constraint` to the index of a published version
///
/// - `Exact`: the version itself, if published
/// - `Range`: the highest satisfying version
/// - `Tag`: the version the dist-tag points to
/// - `Unsupported`: always an error
pub fn resolve(
    constraint: &VersionConstraint,
    versions: &PackageVersions,
) -> Result<usize, ResolutionError> {
    let package = versions.name.clone();
    if versions.is_empty() {
        return Err(ResolutionError::NoVersions { package });
    }

    let index = match constraint {
        VersionConstraint::Exact(version) => {
            versions
                .position(version)
                .ok_or_else(|| ResolutionError::ExactNotPublished {
                    package,
                    version: version.to_string(),
                })?
        }
        VersionConstraint::Range(_) => versions
            .versions()
            .iter()
            .rposition(|info| constraint.satisfies(&info.version))
            .ok_or_else(|| ResolutionError::NoMatchingVersion {
                package,
                constraint: constraint.to_string(),
            })?,
        VersionConstraint::Tag(tag) => versions
            .tagged(tag)
            .and_then(|raw| Version::parse(raw).ok())
            .and_then(|version| versions.position(&version))
            .ok_or_else(|| ResolutionError::UnknownTag {
                package,
                tag: tag.clone(),
            })?,
        VersionConstraint::Unsupported(raw) => {
            return Err(ResolutionError::Unsupported {
                constraint: raw.clone(),
            })
        }
    };

    debug!(
        package = %versions.name,
        constraint = %constraint,
        resolved = %versions.versions()[index].version,
        "resolved constraint"
    );
    Ok(index)
}
