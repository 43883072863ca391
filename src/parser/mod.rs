//! Constraint parsing for package.json dependency declarations
//!
//! Only the npm grammar is supported; see [`node`] for the accepted forms.

mod node;

pub use node::{parse_constraint, NodeConstraintParser};
