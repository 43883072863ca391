//! techlag - technical lag calculator library
//!
//! Measures how far the declared dependency constraints of an npm package
//! trail behind the latest published releases:
//! - Fetch a package.json from the registry or an arbitrary URL
//! - Resolve each declared constraint against the published version list
//! - Count the releases published after the resolved version

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod lag;
pub mod logging;
pub mod output;
pub mod parser;
pub mod progress;
pub mod registry;

pub use analyzer::{AnalysisRequest, AnalysisTarget, LagAnalyzer};
pub use config::AnalyzerConfig;
pub use domain::{DependencyKind, LagReport, LagResult};
pub use error::LagError;
