//! npm Registry adapter
//!
//! Fetches version lists and manifests from an npm-compatible registry.
//! API endpoints:
//! - `{base}/{package}`: packument with `versions`, `time` and `dist-tags`
//! - `{base}/{package}/{version}`: the package.json of one release

use crate::config::AnalyzerConfig;
use crate::domain::PackageManifest;
use crate::error::{ConfigError, RegistryError};
use crate::lag::{PackageVersions, VersionInfo};
use crate::registry::{HttpClient, Registry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use semver::Version;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// npm package metadata response
#[derive(Debug, Deserialize)]
struct Packument {
    /// Published versions; the per-version manifests are not needed here
    #[serde(default)]
    versions: HashMap<String, IgnoredAny>,
    /// Publish times keyed by version, plus `created`/`modified`
    #[serde(default)]
    time: HashMap<String, serde_json::Value>,
    #[serde(default, rename = "dist-tags")]
    dist_tags: HashMap<String, String>,
}

/// npm Registry adapter
#[derive(Debug, Clone)]
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

impl NpmRegistry {
    /// Create a new npm adapter for `base_url`
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create an adapter with its own HTTP client
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            HttpClient::from_config(config)?,
            config.registry_url.as_str(),
        ))
    }

    /// Encode package name for URL (`@scope/name` -> `@scope%2Fname`)
    fn encode_package_name(package: &str) -> String {
        if package.starts_with('@') {
            package.replace('/', "%2F")
        } else {
            package.to_string()
        }
    }

    /// Build the packument URL for a package
    fn packument_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, Self::encode_package_name(package))
    }

    /// Build the manifest URL for one release of a package
    fn manifest_url(&self, package: &str, version: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            Self::encode_package_name(package),
            version
        )
    }
}

fn into_versions(package: &str, packument: Packument) -> PackageVersions {
    let Packument {
        versions,
        time,
        dist_tags,
    } = packument;

    let infos = versions
        .into_keys()
        .filter_map(|key| match Version::parse(&key) {
            Ok(version) => {
                let published_at = time
                    .get(&key)
                    .and_then(|t| t.as_str())
                    .and_then(|t| t.parse::<DateTime<Utc>>().ok());
                Some(VersionInfo::new(version, published_at))
            }
            Err(e) => {
                debug!(package, version = %key, error = %e, "dropping non-semver version");
                None
            }
        })
        .collect();

    PackageVersions::new(package, infos, dist_tags)
}

#[async_trait]
impl Registry for NpmRegistry {
    async fn fetch_versions(&self, package: &str) -> Result<PackageVersions, RegistryError> {
        let url = self.packument_url(package);
        let packument: Packument = self.client.get_json(&url).await?;
        let versions = into_versions(package, packument);
        debug!(package, count = versions.len(), "fetched version list");
        Ok(versions)
    }

    async fn fetch_manifest(
        &self,
        package: &str,
        version: &str,
    ) -> Result<PackageManifest, RegistryError> {
        let url = self.manifest_url(package, version);
        self.client.get_json(&url).await
    }

    async fn fetch_manifest_url(&self, url: &str) -> Result<PackageManifest, RegistryError> {
        self.client.get_json(url).await
    }
}
