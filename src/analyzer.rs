//! Lag analyzer coordinating one analysis run
//!
//! This module provides:
//! - Validation of the analysis target (package + version, or manifest URL)
//! - Workflow coordination: manifest → dependency group → version lists → lag
//! - Per-dependency skip-and-continue on fetch, parse and resolution failures

use crate::config::AnalyzerConfig;
use crate::domain::{
    DependencyKind, LagReport, LagResult, PackageManifest, SkipReason, SkippedDependency,
    VersionConstraint,
};
use crate::error::{ConfigError, LagError, ResolutionError};
use crate::lag;
use crate::parser::parse_constraint;
use crate::progress::Progress;
use crate::registry::{NpmRegistry, Registry};
use std::fmt;
use tracing::{debug, info, warn};

/// Where the analysed manifest comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisTarget {
    /// A published package; `version` may be exact, a range or a dist-tag
    Package { name: String, version: String },
    /// A package.json served at an http(s) URL
    ManifestUrl(String),
}

impl fmt::Display for AnalysisTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisTarget::Package { name, version } => write!(f, "{}@{}", name, version),
            AnalysisTarget::ManifestUrl(url) => write!(f, "{}", url),
        }
    }
}

/// A validated analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub target: AnalysisTarget,
    pub kind: DependencyKind,
}

impl AnalysisRequest {
    /// Validate raw arguments
    ///
    /// Exactly one of (`package` + `version`) or `manifest_url` must be given,
    /// together with a recognised `kind`.
    pub fn new(
        package: Option<&str>,
        version: Option<&str>,
        manifest_url: Option<&str>,
        kind: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let kind = kind
            .ok_or_else(|| ConfigError::missing("a dependency kind is required"))?
            .parse::<DependencyKind>()?;

        match (package, version, manifest_url) {
            (Some(_), _, Some(_)) | (_, Some(_), Some(_)) => Err(ConfigError::conflicting(
                "use either <package, version> or <manifest url>, not both",
            )),
            (Some(name), Some(version), None) => Self::for_package(name, version, kind),
            (None, None, Some(url)) => Self::for_manifest_url(url, kind),
            (Some(_), None, None) => {
                Err(ConfigError::missing("a version is required with a package"))
            }
            (None, Some(_), None) => {
                Err(ConfigError::missing("a package is required with a version"))
            }
            (None, None, None) => Err(ConfigError::missing(
                "either <package, version> or <manifest url> is required",
            )),
        }
    }

    /// Request for a published package
    pub fn for_package(
        name: &str,
        version: &str,
        kind: DependencyKind,
    ) -> Result<Self, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyPackageName);
        }
        let version = version.trim();
        if version.is_empty() {
            return Err(ConfigError::missing("version cannot be empty"));
        }

        Ok(Self {
            target: AnalysisTarget::Package {
                name: name.to_string(),
                version: version.to_string(),
            },
            kind,
        })
    }

    /// Request for a package.json served at `url`
    pub fn for_manifest_url(url: &str, kind: DependencyKind) -> Result<Self, ConfigError> {
        let url = url.trim();
        let parsed =
            reqwest::Url::parse(url).map_err(|e| ConfigError::invalid_url(url, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::invalid_url(
                url,
                "only http and https URLs are supported",
            ));
        }

        Ok(Self {
            target: AnalysisTarget::ManifestUrl(url.to_string()),
            kind,
        })
    }
}

/// Lag analyzer for one request
pub struct LagAnalyzer {
    request: AnalysisRequest,
    registry: Box<dyn Registry>,
    show_progress: bool,
}

impl LagAnalyzer {
    /// Create an analyzer backed by the npm registry described by `config`
    pub fn new(request: AnalysisRequest, config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        let registry = NpmRegistry::from_config(config)?;
        Ok(Self::with_registry(request, Box::new(registry)))
    }

    /// Create an analyzer with a custom registry
    pub fn with_registry(request: AnalysisRequest, registry: Box<dyn Registry>) -> Self {
        Self {
            request,
            registry,
            show_progress: false,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the analysis
    ///
    /// Manifest failures abort the run. Failures for a single dependency are
    /// logged and recorded in [`LagReport::skipped`].
    pub async fn analyze(&self) -> Result<LagReport, LagError> {
        let mut progress = Progress::new(self.show_progress);
        let kind = self.request.kind;

        progress.fetching_manifest(&self.request.target.to_string());
        let manifest = self.fetch_manifest().await;
        progress.finish_and_clear();
        let manifest = manifest?;

        let package = manifest
            .label()
            .or_else(|| match &self.request.target {
                AnalysisTarget::Package { name, .. } => Some(name.clone()),
                AnalysisTarget::ManifestUrl(_) => None,
            });
        let mut report = LagReport::new(package, kind);

        let Some(group) = manifest.group(kind) else {
            info!(kind = %kind, "manifest declares no {}", kind);
            return Ok(report);
        };

        progress.start_dependencies(group.len());
        for (name, declared) in group {
            progress.dependency(name);

            match self.analyze_dependency(name, declared).await {
                Ok(result) => report.add_result(result),
                Err(reason) => {
                    progress.skip(|| {
                        warn!(dependency = %name, constraint = %declared, "skipping: {}", reason)
                    });
                    report.add_skipped(SkippedDependency::new(name, declared, reason));
                }
            }

            progress.advance();
        }
        progress.finish_and_clear();

        Ok(report)
    }

    async fn fetch_manifest(&self) -> Result<PackageManifest, LagError> {
        match &self.request.target {
            AnalysisTarget::ManifestUrl(url) => {
                debug!(url = %url, "fetching manifest by URL");
                Ok(self.registry.fetch_manifest_url(url).await?)
            }
            AnalysisTarget::Package { name, version } => {
                let version = match parse_constraint(version)? {
                    VersionConstraint::Exact(exact) => exact.to_string(),
                    VersionConstraint::Unsupported(raw) => {
                        return Err(ResolutionError::Unsupported { constraint: raw }.into())
                    }
                    constraint => {
                        let versions = self.registry.fetch_versions(name).await?;
                        let index = lag::resolve(&constraint, &versions)?;
                        versions.versions()[index].version.to_string()
                    }
                };
                debug!(package = %name, version = %version, "fetching manifest");
                Ok(self.registry.fetch_manifest(name, &version).await?)
            }
        }
    }

    /// Lag of one declared dependency, or the reason it is skipped
    async fn analyze_dependency(
        &self,
        name: &str,
        declared: &str,
    ) -> Result<LagResult, SkipReason> {
        // Non-registry specifiers never reach the network
        if let VersionConstraint::Unsupported(raw) = parse_constraint(declared)? {
            return Err(ResolutionError::Unsupported { constraint: raw }.into());
        }

        let versions = self.registry.fetch_versions(name).await?;
        let result = lag::calculate(name, declared, &versions)?;
        debug!(dependency = %name, resolved = %result.resolved, lag = result.lag, "computed lag");
        Ok(result)
    }
}
