//! Declared version constraints
//!
//! A constraint string from package.json is parsed once into one of:
//! - `Exact`: `1.2.3`, `=1.2.3`, `v1.2.3`
//! - `Range`: `^1.2.3`, `~1.2.3`, `>=1.0.0 <2.0.0`, `1.x`, `*`, `1.0.0 - 2.0.0`, `a || b`
//! - `Tag`: a dist-tag such as `latest` or `next`
//! - `Unsupported`: git, file, url and alias specifiers that never hit the registry

use semver::Version;
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a single comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Op {
    fn symbol(&self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
        }
    }
}

/// `<op><version>` after desugaring caret, tilde, x-ranges and hyphens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    pub op: Op,
    pub version: Version,
}

impl Comparator {
    pub fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Whether `version` passes this comparator, ignoring pre-release gating
    ///
    /// Build metadata takes no part in the comparison.
    pub fn matches(&self, version: &Version) -> bool {
        let ord = version.cmp_precedence(&self.version);
        match self.op {
            Op::Eq => ord == Ordering::Equal,
            Op::Gt => ord == Ordering::Greater,
            Op::Gte => ord != Ordering::Less,
            Op::Lt => ord == Ordering::Less,
            Op::Lte => ord != Ordering::Greater,
        }
    }

    fn same_release(&self, version: &Version) -> bool {
        self.version.major == version.major
            && self.version.minor == version.minor
            && self.version.patch == version.patch
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.version)
    }
}

/// All comparators must hold; an empty set matches any release
pub type ComparatorSet = Vec<Comparator>;

/// A parsed package.json constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// A single pinned version
    Exact(Version),
    /// A disjunction of comparator sets
    Range(Vec<ComparatorSet>),
    /// A dist-tag name
    Tag(String),
    /// A specifier that is not resolved through the registry
    Unsupported(String),
}

impl VersionConstraint {
    /// Whether a published version satisfies this constraint
    ///
    /// Tags and unsupported specifiers never match by themselves; they need the
    /// registry's dist-tags (see `lag::resolve`).
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            VersionConstraint::Exact(v) => v.cmp_precedence(version) == Ordering::Equal,
            VersionConstraint::Range(sets) => sets.iter().any(|set| set_satisfies(set, version)),
            VersionConstraint::Tag(_) | VersionConstraint::Unsupported(_) => false,
        }
    }
}

/// npm semantics: a pre-release only satisfies a set that names a pre-release
/// on the same `major.minor.patch`.
fn set_satisfies(set: &[Comparator], version: &Version) -> bool {
    if !set.iter().all(|c| c.matches(version)) {
        return false;
    }
    if version.pre.is_empty() {
        return true;
    }
    set.iter()
        .any(|c| !c.version.pre.is_empty() && c.same_release(version))
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Exact(v) => write!(f, "{}", v),
            VersionConstraint::Range(sets) => {
                let rendered: Vec<String> = sets
                    .iter()
                    .map(|set| {
                        if set.is_empty() {
                            "*".to_string()
                        } else {
                            set.iter()
                                .map(ToString::to_string)
                                .collect::<Vec<_>>()
                                .join(" ")
                        }
                    })
                    .collect();
                write!(f, "{}", rendered.join(" || "))
            }
            VersionConstraint::Tag(tag) => write!(f, "{}", tag),
            VersionConstraint::Unsupported(raw) => write!(f, "{}", raw),
        }
    }
}
