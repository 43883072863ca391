//! Dependency group labels of a package.json

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dependency group of a package.json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    /// `dependencies`
    #[serde(rename = "dependencies")]
    Dependencies,
    /// `devDependencies`
    #[serde(rename = "devDependencies")]
    DevDependencies,
    /// `peerDependencies`
    #[serde(rename = "peerDependencies")]
    PeerDependencies,
    /// `optionalDependencies`
    #[serde(rename = "optionalDependencies")]
    OptionalDependencies,
}

impl DependencyKind {
    /// All recognized kinds
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::Dependencies,
        DependencyKind::DevDependencies,
        DependencyKind::PeerDependencies,
        DependencyKind::OptionalDependencies,
    ];

    /// The field name used in package.json
    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::Dependencies => "dependencies",
            DependencyKind::DevDependencies => "devDependencies",
            DependencyKind::PeerDependencies => "peerDependencies",
            DependencyKind::OptionalDependencies => "optionalDependencies",
        }
    }
}

impl FromStr for DependencyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == trimmed)
            .ok_or_else(|| ConfigError::UnknownKind {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
