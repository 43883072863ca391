//! npm constraint parser
//!
//! Handles constraint formats:
//! - Exact: `1.2.3`, `=1.2.3`, `v1.2.3`
//! - Caret: `^1.2.3`, `^0.2`, `^1.x`
//! - Tilde: `~1.2.3`, `~>1.2`, `~1`
//! - Comparison: `>=1.2.3`, `>1.2`, `<=1`, `<1.2.3`
//! - Wildcard: `*`, `x`, `1.x`, `1.2.*`, `1`, `1.2`, empty string
//! - Range: `>=1.0.0 <2.0.0`, `1.0.0 - 2.0.0`, `^1.0.0 || ^2.0.0`
//! - Dist-tags: `latest`, `next`, `beta`
//! - Non-registry specifiers: `git+ssh://...`, `file:../x`, `npm:alias@1`, `user/repo`

use crate::domain::{Comparator, ComparatorSet, Op, VersionConstraint};
use crate::error::ResolutionError;
use regex::Regex;
use semver::{Prerelease, Version};
use std::sync::LazyLock;

/// npm constraint parser
pub struct NodeConstraintParser;

static EXACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^=?\s*v?(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)$").unwrap()
});
static PRIMITIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(<=|>=|<|>|=|~>|~|\^)?v?(\d+|[xX*])(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?$",
    )
    .unwrap()
});
static HYPHEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\S+)\s+-\s+(\S+)$").unwrap());
static OP_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<=|>=|<|>|=|~>|~|\^)\s+").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*$").unwrap());

const UNSUPPORTED_PREFIXES: &[&str] = &[
    "git+", "git:", "github:", "gitlab:", "bitbucket:", "gist:", "http:", "https:", "file:",
    "link:", "npm:", "workspace:", "portal:", "patch:",
];

/// A version with `x`/`*`/missing components left open
#[derive(Debug, Clone, PartialEq, Eq)]
struct PartialVersion {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl PartialVersion {
    fn parse_component(s: Option<&str>) -> Result<Option<u64>, ()> {
        match s {
            None => Ok(None),
            Some(c) if c == "x" || c == "X" || c == "*" => Ok(None),
            // Numeric identifiers never carry leading zeros
            Some(c) if c.len() > 1 && c.starts_with('0') => Err(()),
            Some(c) => c.parse::<u64>().map(Some).map_err(|_| ()),
        }
    }

    fn from_parts(
        major: Option<&str>,
        minor: Option<&str>,
        patch: Option<&str>,
        pre: Option<&str>,
    ) -> Option<Self> {
        let major = Self::parse_component(major).ok()?;
        // Once a component is open, everything after it is open too
        let minor = major.and(Self::parse_component(minor).ok()?);
        let patch = minor.and(Self::parse_component(patch).ok()?);
        let pre = match (patch, pre) {
            (Some(_), Some(p)) => Prerelease::new(p).ok()?,
            _ => Prerelease::EMPTY,
        };
        Some(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    /// Parse a bare version (no operator), used by hyphen ranges
    fn parse(s: &str) -> Option<Self> {
        let caps = PRIMITIVE_RE.captures(s)?;
        if caps.get(1).is_some() {
            return None;
        }
        Self::from_parts(
            caps.get(2).map(|m| m.as_str()),
            caps.get(3).map(|m| m.as_str()),
            caps.get(4).map(|m| m.as_str()),
            caps.get(5).map(|m| m.as_str()),
        )
    }

    /// Lowest version the partial covers
    fn floor(&self) -> Version {
        let mut v = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        v.pre = self.pre.clone();
        v
    }
}

fn never() -> ComparatorSet {
    vec![Comparator::new(Op::Lt, Version::new(0, 0, 0))]
}

fn bump_major(major: u64) -> Version {
    Version::new(major.saturating_add(1), 0, 0)
}

fn bump_minor(major: u64, minor: u64) -> Version {
    Version::new(major, minor.saturating_add(1), 0)
}

fn x_range(p: &PartialVersion) -> ComparatorSet {
    match (p.major, p.minor, p.patch) {
        (None, _, _) => vec![],
        (Some(major), None, _) => vec![
            Comparator::new(Op::Gte, p.floor()),
            Comparator::new(Op::Lt, bump_major(major)),
        ],
        (Some(major), Some(minor), None) => vec![
            Comparator::new(Op::Gte, p.floor()),
            Comparator::new(Op::Lt, bump_minor(major, minor)),
        ],
        (Some(_), Some(_), Some(_)) => vec![Comparator::new(Op::Eq, p.floor())],
    }
}

fn tilde(p: &PartialVersion) -> ComparatorSet {
    match (p.major, p.minor) {
        (None, _) => vec![],
        (Some(major), None) => vec![
            Comparator::new(Op::Gte, p.floor()),
            Comparator::new(Op::Lt, bump_major(major)),
        ],
        (Some(major), Some(minor)) => vec![
            Comparator::new(Op::Gte, p.floor()),
            Comparator::new(Op::Lt, bump_minor(major, minor)),
        ],
    }
}

fn caret(p: &PartialVersion) -> ComparatorSet {
    let upper = match (p.major, p.minor, p.patch) {
        (None, _, _) => return vec![],
        (Some(major), None, _) => bump_major(major),
        (Some(0), Some(minor), None) => bump_minor(0, minor),
        (Some(major), Some(_), None) => bump_major(major),
        (Some(0), Some(0), Some(patch)) => Version::new(0, 0, patch.saturating_add(1)),
        (Some(0), Some(minor), Some(_)) => bump_minor(0, minor),
        (Some(major), Some(_), Some(_)) => bump_major(major),
    };
    vec![
        Comparator::new(Op::Gte, p.floor()),
        Comparator::new(Op::Lt, upper),
    ]
}

fn comparison(op: Op, p: &PartialVersion) -> ComparatorSet {
    let Some(major) = p.major else {
        return match op {
            Op::Gt | Op::Lt => never(),
            _ => vec![],
        };
    };
    match (op, p.minor, p.patch) {
        (Op::Gt, None, _) => vec![Comparator::new(Op::Gte, bump_major(major))],
        (Op::Gt, Some(minor), None) => vec![Comparator::new(Op::Gte, bump_minor(major, minor))],
        (Op::Lte, None, _) => vec![Comparator::new(Op::Lt, bump_major(major))],
        (Op::Lte, Some(minor), None) => vec![Comparator::new(Op::Lt, bump_minor(major, minor))],
        (op, _, _) => vec![Comparator::new(op, p.floor())],
    }
}

fn hyphen(from: &PartialVersion, to: &PartialVersion) -> ComparatorSet {
    let mut set = Vec::new();
    if from.major.is_some() {
        set.push(Comparator::new(Op::Gte, from.floor()));
    }
    match (to.major, to.minor, to.patch) {
        (None, _, _) => {}
        (Some(major), None, _) => set.push(Comparator::new(Op::Lt, bump_major(major))),
        (Some(major), Some(minor), None) => {
            set.push(Comparator::new(Op::Lt, bump_minor(major, minor)))
        }
        (Some(_), Some(_), Some(_)) => set.push(Comparator::new(Op::Lte, to.floor())),
    }
    set
}

/// Desugar one whitespace-free token such as `^1.2.3` or `<=2`
fn parse_primitive(token: &str) -> Option<ComparatorSet> {
    let caps = PRIMITIVE_RE.captures(token)?;
    let partial = PartialVersion::from_parts(
        caps.get(2).map(|m| m.as_str()),
        caps.get(3).map(|m| m.as_str()),
        caps.get(4).map(|m| m.as_str()),
        caps.get(5).map(|m| m.as_str()),
    )?;

    let set = match caps.get(1).map(|m| m.as_str()) {
        None | Some("=") => x_range(&partial),
        Some("~") | Some("~>") => tilde(&partial),
        Some("^") => caret(&partial),
        Some(">") => comparison(Op::Gt, &partial),
        Some(">=") => comparison(Op::Gte, &partial),
        Some("<") => comparison(Op::Lt, &partial),
        Some("<=") => comparison(Op::Lte, &partial),
        Some(_) => return None,
    };
    Some(set)
}

fn parse_comparator_set(part: &str) -> Option<ComparatorSet> {
    let part = part.trim();
    if part.is_empty() {
        return Some(vec![]);
    }

    if let Some(caps) = HYPHEN_RE.captures(part) {
        let from = PartialVersion::parse(caps.get(1)?.as_str())?;
        let to = PartialVersion::parse(caps.get(2)?.as_str())?;
        return Some(hyphen(&from, &to));
    }

    let normalized = OP_SPACE_RE.replace_all(part, "$1");
    let mut set = Vec::new();
    for token in normalized.split_whitespace() {
        set.extend(parse_primitive(token)?);
    }
    Some(set)
}

fn parse_range(spec: &str) -> Option<Vec<ComparatorSet>> {
    spec.split("||").map(parse_comparator_set).collect()
}

fn is_unsupported(spec: &str) -> bool {
    UNSUPPORTED_PREFIXES.iter().any(|p| spec.starts_with(p))
        || spec.contains("://")
        || spec.contains('/')
}

impl NodeConstraintParser {
    /// Parse a declared constraint string
    pub fn parse(&self, raw: &str) -> Result<VersionConstraint, ResolutionError> {
        let trimmed = raw.trim();

        if is_unsupported(trimmed) {
            return Ok(VersionConstraint::Unsupported(trimmed.to_string()));
        }

        if let Some(caps) = EXACT_RE.captures(trimmed) {
            if let Ok(version) = Version::parse(&caps[1]) {
                return Ok(VersionConstraint::Exact(version));
            }
        }

        if let Some(sets) = parse_range(trimmed) {
            return Ok(VersionConstraint::Range(sets));
        }

        if TAG_RE.is_match(trimmed) {
            return Ok(VersionConstraint::Tag(trimmed.to_string()));
        }

        Err(ResolutionError::invalid(
            raw,
            "not a semver range, dist-tag or supported specifier",
        ))
    }
}

/// Parse a declared constraint string with the npm grammar
pub fn parse_constraint(raw: &str) -> Result<VersionConstraint, ResolutionError> {
    NodeConstraintParser.parse(raw)
}
