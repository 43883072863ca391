//! Registry access for package manifests and version lists
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm Registry adapter

mod client;
mod npm;

pub use client::HttpClient;
pub use npm::NpmRegistry;

use crate::domain::PackageManifest;
use crate::error::RegistryError;
use crate::lag::PackageVersions;
use async_trait::async_trait;

/// Source of manifests and version lists
#[async_trait]
pub trait Registry: Send + Sync {
    /// Fetch every published version of a package
    async fn fetch_versions(&self, package: &str) -> Result<PackageVersions, RegistryError>;

    /// Fetch the package.json of one published release
    async fn fetch_manifest(
        &self,
        package: &str,
        version: &str,
    ) -> Result<PackageManifest, RegistryError>;

    /// Fetch a package.json from an arbitrary URL
    async fn fetch_manifest_url(&self, url: &str) -> Result<PackageManifest, RegistryError>;
}
