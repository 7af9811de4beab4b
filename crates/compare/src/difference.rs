//! Difference trees
//!
//! A comparison that finds differences produces a tree mirroring the shape
//! of the compared values:
//! - a leaf ([`ValueDifference`]) holds the two differing sides
//! - a composite ([`CompositeDifference`]) holds the compared values plus
//!   child differences keyed by field name, list index, or map key
//!
//! "Equal" is the absence of a tree, not an empty tree: a composite with no
//! children never escapes this module ([`CompositeDifference::into_option`]
//! collapses it to `None`).
//!
//! Either side of a leaf can be [`DiffValue::Missing`], meaning no value
//! exists at that position at all: a list element past the shorter length,
//! a map key present on one side, or an entity field the other side lacks.
//! Missing is distinct from null, which is a value like any other.

use attest_core::Value;
use smallvec::SmallVec;

/// Key of a child difference within a composite difference.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffKey {
    /// Entity field name.
    Field(String),
    /// List index. For multiset comparison, the index on the side where the
    /// element exists.
    Index(usize),
    /// Map key.
    Key(Value),
}

impl From<&str> for DiffKey {
    fn from(name: &str) -> Self {
        DiffKey::Field(name.to_string())
    }
}

impl From<String> for DiffKey {
    fn from(name: String) -> Self {
        DiffKey::Field(name)
    }
}

impl From<usize> for DiffKey {
    fn from(index: usize) -> Self {
        DiffKey::Index(index)
    }
}

impl From<Value> for DiffKey {
    fn from(key: Value) -> Self {
        DiffKey::Key(key)
    }
}

/// One side of a leaf difference.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffValue {
    /// No value exists at this position.
    Missing,
    /// The value at this position.
    Value(Value),
}

impl DiffValue {
    /// The value, unless this side is missing.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            DiffValue::Missing => None,
            DiffValue::Value(v) => Some(v),
        }
    }

    /// True if no value exists at this position.
    pub fn is_missing(&self) -> bool {
        matches!(self, DiffValue::Missing)
    }
}

impl From<Value> for DiffValue {
    fn from(value: Value) -> Self {
        DiffValue::Value(value)
    }
}

impl std::fmt::Display for DiffValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffValue::Missing => f.write_str("<missing>"),
            DiffValue::Value(v) => write!(f, "{}", v),
        }
    }
}

/// A leaf difference: two values (or a value and a missing position) that
/// differ outright.
#[derive(Debug, Clone)]
pub struct ValueDifference {
    /// Expected side.
    pub left: DiffValue,
    /// Actual side.
    pub right: DiffValue,
}

/// A composite difference: a structured pair whose children differ.
#[derive(Debug, Clone)]
pub struct CompositeDifference {
    /// Expected side of the compared pair.
    pub left: Value,
    /// Actual side of the compared pair.
    pub right: Value,
    children: Vec<(DiffKey, Difference)>,
}

impl CompositeDifference {
    /// Start an empty composite for the given pair.
    pub fn new(left: Value, right: Value) -> Self {
        CompositeDifference {
            left,
            right,
            children: Vec::new(),
        }
    }

    /// Record a child difference under the given key.
    pub fn add(&mut self, key: impl Into<DiffKey>, difference: Difference) {
        self.children.push((key.into(), difference));
    }

    /// True if no child differences were recorded.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child differences in the order they were recorded.
    pub fn children(&self) -> &[(DiffKey, Difference)] {
        &self.children
    }

    /// Collapse to the comparison verdict: `None` when no children were
    /// recorded, so an empty composite can never be mistaken for a
    /// difference.
    pub fn into_option(self) -> Option<Difference> {
        if self.children.is_empty() {
            None
        } else {
            Some(Difference::Composite(self))
        }
    }
}

/// A node in a difference tree.
#[derive(Debug, Clone)]
pub enum Difference {
    /// Two values differ outright.
    Value(ValueDifference),
    /// A structured pair with differing children.
    Composite(CompositeDifference),
}

impl Difference {
    /// Leaf difference between two present values.
    pub fn value(left: impl Into<DiffValue>, right: impl Into<DiffValue>) -> Difference {
        Difference::Value(ValueDifference {
            left: left.into(),
            right: right.into(),
        })
    }

    /// Leaf for a position that only the expected side has.
    pub fn missing_right(left: Value) -> Difference {
        Difference::value(left, DiffValue::Missing)
    }

    /// Leaf for a position that only the actual side has.
    pub fn missing_left(right: Value) -> Difference {
        Difference::value(DiffValue::Missing, right)
    }

    /// Navigate to the child difference under the given key.
    ///
    /// Returns the first child with that key; leaves have no children.
    pub fn inner(&self, key: impl Into<DiffKey>) -> Option<&Difference> {
        let key = key.into();
        match self {
            Difference::Value(_) => None,
            Difference::Composite(composite) => composite
                .children
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, d)| d),
        }
    }

    /// The leaf at this node, if it is one.
    pub fn as_leaf(&self) -> Option<&ValueDifference> {
        match self {
            Difference::Value(leaf) => Some(leaf),
            Difference::Composite(_) => None,
        }
    }

    /// All leaves with their paths from this node, depth first in recorded
    /// order.
    pub fn leaves(&self) -> Vec<(Vec<DiffKey>, &ValueDifference)> {
        let mut out = Vec::new();
        let mut path: SmallVec<[DiffKey; 8]> = SmallVec::new();
        self.collect_leaves(&mut path, &mut out);
        out
    }

    fn collect_leaves<'a>(
        &'a self,
        path: &mut SmallVec<[DiffKey; 8]>,
        out: &mut Vec<(Vec<DiffKey>, &'a ValueDifference)>,
    ) {
        match self {
            Difference::Value(leaf) => out.push((path.to_vec(), leaf)),
            Difference::Composite(composite) => {
                for (key, child) in &composite.children {
                    path.push(key.clone());
                    child.collect_leaves(path, out);
                    path.pop();
                }
            }
        }
    }

    /// Number of leaves in this tree. At least 1 for any tree that escaped
    /// [`CompositeDifference::into_option`].
    pub fn leaf_count(&self) -> usize {
        match self {
            Difference::Value(_) => 1,
            Difference::Composite(composite) => composite
                .children
                .iter()
                .map(|(_, child)| child.leaf_count())
                .sum(),
        }
    }
}
