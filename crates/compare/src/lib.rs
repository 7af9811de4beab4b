//! Deep comparison for attest
//!
//! This crate turns "are these two values the same" into a structured
//! answer:
//! - ReflectionComparator: deep comparison through an ordered chain of
//!   element comparators, with entity-pair caching for cycles and shared
//!   subtrees
//! - Modes: global relaxations (ignore defaults, lenient dates, lenient
//!   order)
//! - Difference: tree of what differed, navigable and renderable
//! - assert_reflect_equals / assert_lenient_equals: Result-based assertion
//!   entry points
//! - Table / Schema: expected-versus-actual dataset comparison with
//!   best-match row reporting
//!
//! Equality here is deliberately not `PartialEq`: `1` can match `1.0`,
//! `[1, 2]` can match `[2, 1]` under lenient order, and a default-valued
//! expected field can match anything under ignore defaults.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assert;
mod comparator;
pub mod compare;
pub mod difference;
pub mod modes;
pub mod report;
pub mod table;

// Re-export commonly used types
pub use assert::{assert_equals, assert_lenient_equals, assert_reflect_equals};
pub use compare::ReflectionComparator;
pub use difference::{CompositeDifference, DiffKey, DiffValue, Difference, ValueDifference};
pub use modes::{Mode, Modes};
pub use report::DifferenceReport;
pub use table::{
    assert_schema_contents, assert_table_contents, Column, ColumnDifference, Row, RowDifference,
    Schema, SchemaDifference, Table, TableDifference,
};
