//! package.json manifest as served by the registry or a raw URL

use super::DependencyKind;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Dependency name to declared constraint, in declaration order
pub type DependencyGroup = IndexMap<String, String>;

/// The parts of a package.json that matter for lag analysis
///
/// Groups that are absent or `null` deserialize to `None` and read back as
/// empty through [`PackageManifest::group`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: Option<DependencyGroup>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: Option<DependencyGroup>,
    #[serde(default, rename = "peerDependencies")]
    pub peer_dependencies: Option<DependencyGroup>,
    #[serde(default, rename = "optionalDependencies")]
    pub optional_dependencies: Option<DependencyGroup>,
}

impl PackageManifest {
    /// Returns the dependency group for `kind`, or `None` when not declared
    pub fn group(&self, kind: DependencyKind) -> Option<&DependencyGroup> {
        match kind {
            DependencyKind::Dependencies => self.dependencies.as_ref(),
            DependencyKind::DevDependencies => self.dev_dependencies.as_ref(),
            DependencyKind::PeerDependencies => self.peer_dependencies.as_ref(),
            DependencyKind::OptionalDependencies => self.optional_dependencies.as_ref(),
        }
    }

    /// `name@version` when both are known
    pub fn label(&self) -> Option<String> {
        match (&self.name, &self.version) {
            (Some(name), Some(version)) => Some(format!("{}@{}", name, version)),
            (Some(name), None) => Some(name.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_manifest() {
        let json = r#"{
            "name": "grunt",
            "version": "1.0.0",
            "dependencies": {
                "coffee-script": "~1.10.0",
                "dateformat": "1.0.12",
                "eventemitter2": "^0.4.13"
            },
            "devDependencies": {
                "difflet": "~0.2.3"
            }
        }"#;
        let manifest: PackageManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("grunt"));
        assert_eq!(manifest.label().as_deref(), Some("grunt@1.0.0"));

        let deps = manifest.group(DependencyKind::Dependencies).unwrap();
        let names: Vec<&str> = deps.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["coffee-script", "dateformat", "eventemitter2"]);
        assert_eq!(deps["dateformat"], "1.0.12");

        let dev = manifest.group(DependencyKind::DevDependencies).unwrap();
        assert_eq!(dev.len(), 1);
    }

    #[test]
    fn test_missing_group_is_none() {
        let manifest: PackageManifest = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert!(manifest.group(DependencyKind::Dependencies).is_none());
        assert!(manifest.group(DependencyKind::PeerDependencies).is_none());
    }

    #[test]
    fn test_null_group_is_none() {
        let manifest: PackageManifest =
            serde_json::from_str(r#"{"name": "x", "devDependencies": null}"#).unwrap();
        assert!(manifest.group(DependencyKind::DevDependencies).is_none());
    }

    #[test]
    fn test_unrelated_fields_are_ignored() {
        let json = r#"{"name": "x", "scripts": {"test": "jest"}, "dist": {"shasum": "abc"}}"#;
        let manifest: PackageManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("x"));
    }

    #[test]
    fn test_non_string_constraint_is_rejected() {
        let json = r#"{"dependencies": {"lodash": 4}}"#;
        assert!(serde_json::from_str::<PackageManifest>(json).is_err());
    }

    #[test]
    fn test_label_without_name() {
        let manifest = PackageManifest::default();
        assert!(manifest.label().is_none());
    }
}
