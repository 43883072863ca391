//! Core domain models for techlag
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency group labels of a package.json
//! - The package.json manifest itself
//! - Parsed version constraints
//! - Lag results and the per-run report

mod constraint;
mod dependency_kind;
mod lag_result;
mod manifest;

pub use constraint::{Comparator, ComparatorSet, Op, VersionConstraint};
pub use dependency_kind::DependencyKind;
pub use lag_result::{LagBreakdown, LagReport, LagResult, SkipReason, SkippedDependency};
pub use manifest::{DependencyGroup, PackageManifest};
