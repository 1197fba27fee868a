//! Helpers shared by the catalog and order crates.
//!
//! The only resident today is the filter engine primitives: both the part
//! catalog and the order store answer multi-field queries with the same
//! "AND across fields, OR within a field" rule, and both build on the
//! functions in [`filter`].

pub mod filter;

pub use filter::{
    candidates, eq_fold, matches_exact, matches_tags, matches_text, select, FieldFilter,
};
