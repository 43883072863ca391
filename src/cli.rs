//! CLI argument parsing module for techlag

use crate::analyzer::AnalysisRequest;
use crate::config::{
    AnalyzerConfig, DEFAULT_MAX_RETRIES, DEFAULT_REGISTRY_URL, DEFAULT_USER_AGENT,
};
use crate::error::ConfigError;
use crate::logging;
use crate::output::{OutputConfig, OutputFormat};
use clap::Parser;
use std::time::Duration;

/// Technical lag calculator for npm package dependencies
#[derive(Parser, Debug, Clone)]
#[command(
    name = "techlag",
    about = "Technical lag calculator for npm package dependencies",
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Package name on the registry (use with --version)
    #[arg(short, long)]
    pub package: Option<String>,

    /// Package version, range or dist-tag (use with --package)
    #[arg(short = 'v', long)]
    pub version: Option<String>,

    /// URL of a package.json to analyse instead of a published package
    #[arg(short = 'j', long = "json", value_name = "URL")]
    pub manifest_url: Option<String>,

    /// Dependency kind: dependencies, devDependencies, peerDependencies, optionalDependencies
    #[arg(short, long, visible_alias = "dependencies-kind")]
    pub kind: Option<String>,

    // Network options
    /// npm registry base URL
    #[arg(long, env = "TECHLAG_REGISTRY", default_value = DEFAULT_REGISTRY_URL)]
    pub registry: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Retries for transport errors and rate limiting
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// User-Agent header sent to the registry
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    // Output options
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose output (debug logs, publish dates)
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - errors only, no progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print version
    #[arg(short = 'V', long)]
    pub print_version: bool,
}

impl CliArgs {
    /// Validate the target arguments into an analysis request
    pub fn request(&self) -> Result<AnalysisRequest, ConfigError> {
        AnalysisRequest::new(
            self.package.as_deref(),
            self.version.as_deref(),
            self.manifest_url.as_deref(),
            self.kind.as_deref(),
        )
    }

    /// Build the network configuration
    pub fn analyzer_config(&self) -> Result<AnalyzerConfig, ConfigError> {
        let registry = self.registry.trim();
        let parsed = reqwest::Url::parse(registry)
            .map_err(|e| ConfigError::invalid_url(registry, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::invalid_url(
                registry,
                "only http and https registries are supported",
            ));
        }

        Ok(AnalyzerConfig::default()
            .with_registry_url(registry)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_max_retries(self.retries)
            .with_user_agent(self.user_agent.as_str()))
    }

    /// Build the output configuration
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::from_cli(self.format, self.verbose, self.quiet, self.no_color)
    }

    /// Fallback log level when `RUST_LOG` is not set
    pub fn log_level(&self) -> &'static str {
        logging::level_for(self.verbose, self.quiet)
    }

    /// Progress bars only accompany text output
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }
}
