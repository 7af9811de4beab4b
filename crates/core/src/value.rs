//! Value model for attest
//!
//! This module defines:
//! - `Value`: dynamic value enum for arguments, fields, and dataset columns
//! - `ValueKind`: the type tag for a `Value`
//! - `Entity` / `EntityRef`: shared, mutable object-graph nodes
//!
//! ## Value model
//!
//! The enum has exactly 10 variants:
//! - Null, Bool, Int, Float, String, Bytes, Time, List, Map, Entity
//!
//! ### Equality rules
//!
//! Native equality (`PartialEq`) is deliberately shallow-minded; the lenient
//! reflection comparator exists precisely because native equality is not
//! good enough for test data:
//! - Different kinds are NEVER natively equal: `Int(1) != Float(1.0)`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - `Map` equality is order-insensitive over its entries
//! - `Entity` equality is reference identity (`EntityRef::ptr_eq`), the same
//!   contract an object without an equality override would have
//!
//! ## Entity graphs
//!
//! `EntityRef` wraps `Rc<RefCell<Entity>>`: entities are shared, mutable
//! nodes, so aliasing and cycles are expressible and reference identity is
//! observable (`ptr_id`). `Value::clone()` is shallow for entities (the node
//! is shared); [`Value::deep_clone`] produces a structurally independent
//! copy of the whole graph, preserving aliasing and cycles through a pointer
//! map. Matchers rely on deep clones so that later in-place mutation of a
//! test-owned value cannot corrupt a stored expectation.
//!
//! Entities are single-threaded by design (`Rc`, not `Arc`); a fresh context
//! per test is the supported pattern.

use chrono::{DateTime, Utc};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

/// Type tag for a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The null value
    Null,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// UTF-8 string
    String,
    /// Raw bytes
    Bytes,
    /// Point in time
    Time,
    /// Ordered list of values
    List,
    /// Key/value entries (keys are values themselves)
    Map,
    /// Object-graph node
    Entity,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Null => "Null",
            ValueKind::Bool => "Bool",
            ValueKind::Int => "Int",
            ValueKind::Float => "Float",
            ValueKind::String => "String",
            ValueKind::Bytes => "Bytes",
            ValueKind::Time => "Time",
            ValueKind::List => "List",
            ValueKind::Map => "Map",
            ValueKind::Entity => "Entity",
        };
        f.write_str(name)
    }
}

/// Dynamic value for arguments, entity fields, and dataset columns.
///
/// A `Value` used as a column or argument carries its identity (column or
/// argument name) externally; the value itself is anonymous. Values are
/// immutable once constructed: mutation happens only through [`EntityRef`]
/// handles the test owns.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Point in time (UTC)
    Time(DateTime<Utc>),
    /// Ordered list of values
    List(Vec<Value>),
    /// Key/value entries in insertion order; keys are values themselves
    Map(Vec<(Value, Value)>),
    /// Shared object-graph node
    Entity(EntityRef),
}

// Custom PartialEq: IEEE-754 floats, order-insensitive maps, identity for
// entities. Different kinds are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.iter().any(|(bk, bv)| bk == k && bv == v))
            }
            (Value::Entity(a), Value::Entity(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    /// Get the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Time(_) => "Time",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Entity(_) => "Entity",
        }
    }

    /// Get the type tag.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Time(_) => ValueKind::Time,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Entity(_) => ValueKind::Entity,
        }
    }

    /// Check if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is an entity value.
    pub fn is_entity(&self) -> bool {
        matches!(self, Value::Entity(_))
    }

    /// True for the "zero/empty/null" value of each kind: `Null`, `false`,
    /// `0`, `0.0`, the empty string, empty bytes, the empty list, and the
    /// empty map. Time and entity values are never defaults.
    ///
    /// The ignore-defaults comparator mode treats a default on the left
    /// (expected) side as "don't care".
    pub fn is_default(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::String(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::List(l) => l.is_empty(),
            Value::Map(m) => m.is_empty(),
            Value::Time(_) | Value::Entity(_) => false,
        }
    }

    /// Get as bool if this is a Bool value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string slice if this is a String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as byte slice if this is a Bytes value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get as timestamp if this is a Time value.
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Get as value slice if this is a List value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Get the entries if this is a Map value.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get the entity handle if this is an Entity value.
    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Value::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Produce a structurally independent copy of this value.
    ///
    /// Entity nodes are copied node by node through a pointer map, so
    /// aliasing (two fields referencing the same node) and cycles survive
    /// the copy, but no node is shared with the original: mutating the
    /// original graph afterwards never changes the clone.
    pub fn deep_clone(&self) -> Value {
        let mut copies: HashMap<usize, EntityRef> = HashMap::new();
        self.deep_clone_with(&mut copies)
    }

    fn deep_clone_with(&self, copies: &mut HashMap<usize, EntityRef>) -> Value {
        match self {
            Value::Null
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::String(_)
            | Value::Bytes(_)
            | Value::Time(_) => self.clone(),
            Value::List(items) => {
                Value::List(items.iter().map(|v| v.deep_clone_with(copies)).collect())
            }
            Value::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.deep_clone_with(copies), v.deep_clone_with(copies)))
                    .collect(),
            ),
            Value::Entity(entity) => {
                let id = entity.ptr_id();
                if let Some(copy) = copies.get(&id) {
                    return Value::Entity(copy.clone());
                }
                // Register the shell before copying fields so cycles resolve
                // to the copy instead of recursing forever.
                let shell = EntityRef::new(Entity::new(entity.borrow().type_name().to_string()));
                copies.insert(id, shell.clone());
                let source = entity.borrow();
                for (name, value) in source.fields() {
                    let copied = value.deep_clone_with(copies);
                    shell.borrow_mut().insert_field(name.clone(), copied);
                }
                Value::Entity(shell)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<EntityRef> for Value {
    fn from(e: EntityRef) -> Self {
        Value::Entity(e)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// An object-graph node: a type name plus named fields in declaration order.
///
/// The type name is diagnostic metadata for reports; structural comparison
/// never dispatches on it. Field flattening (own plus inherited fields,
/// minus transient state) is the host's job; an `Entity` holds the already
/// flattened field list.
#[derive(Debug, Clone)]
pub struct Entity {
    type_name: String,
    fields: Vec<(String, Value)>,
}

impl Entity {
    /// Create an entity with no fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Entity {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field addition; replaces an existing field of the same
    /// name.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_field(name.into(), value.into());
        self
    }

    /// Finish building: wrap into a shared node and return it as a value.
    pub fn build(self) -> Value {
        Value::Entity(self.build_ref())
    }

    /// Finish building: wrap into a shared node.
    pub fn build_ref(self) -> EntityRef {
        EntityRef::new(self)
    }

    /// The entity's type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Iterate fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter().map(|(n, v)| (n, v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the entity has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// True if a field with this name exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Insert or replace a field.
    pub fn insert_field(&mut self, name: String, value: Value) {
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }
}

/// Shared handle to an [`Entity`] node.
///
/// Cloning the handle shares the node; two clones observe each other's
/// mutations and compare natively equal. Reference identity is exposed via
/// [`EntityRef::ptr_id`] and drives the comparator's cycle cache and the
/// `same` argument matcher.
#[derive(Debug, Clone)]
pub struct EntityRef(Rc<RefCell<Entity>>);

impl EntityRef {
    /// Wrap an entity into a shared node.
    pub fn new(entity: Entity) -> Self {
        EntityRef(Rc::new(RefCell::new(entity)))
    }

    /// Stable identity of the node for the lifetime of the graph.
    pub fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// True if both handles point at the same node.
    pub fn ptr_eq(&self, other: &EntityRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Immutably borrow the node.
    ///
    /// # Panics
    ///
    /// Panics if the node is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Entity> {
        self.0.borrow()
    }

    /// Mutably borrow the node.
    ///
    /// # Panics
    ///
    /// Panics if the node is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Entity> {
        self.0.borrow_mut()
    }

    /// Set a field on the node. The usual way to build aliased or cyclic
    /// graphs:
    ///
    /// ```
    /// use attest_core::{Entity, Value};
    ///
    /// let node = Entity::new("Node").build_ref();
    /// node.set_field("next", Value::Entity(node.clone()));
    /// ```
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.borrow_mut().insert_field(name.into(), value.into());
    }

    /// Clone out a field value by name.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn person(name: &str, age: i64) -> Value {
        Entity::new("Person")
            .field("name", name)
            .field("age", age)
            .build()
    }

    // ==== Kind and type name ====

    #[test]
    fn kind_matches_type_name() {
        let values = vec![
            Value::Null,
            Value::from(true),
            Value::from(1),
            Value::from(1.5),
            Value::from("x"),
            Value::Bytes(vec![1]),
            Value::Time(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            Value::List(vec![]),
            Value::Map(vec![]),
            person("a", 1),
        ];
        for v in values {
            assert_eq!(v.kind().to_string(), v.type_name());
        }
    }

    // ==== Native equality ====

    #[test]
    fn cross_kind_values_are_never_equal() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::from("1"), Value::Int(1));
        assert_ne!(Value::Bytes(b"hi".to_vec()), Value::from("hi"));
        assert_ne!(Value::Null, Value::Int(0));
    }

    #[test]
    fn float_equality_is_ieee_754() {
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
    }

    #[test]
    fn map_equality_ignores_entry_order() {
        let a = Value::Map(vec![
            (Value::from("x"), Value::Int(1)),
            (Value::from("y"), Value::Int(2)),
        ]);
        let b = Value::Map(vec![
            (Value::from("y"), Value::Int(2)),
            (Value::from("x"), Value::Int(1)),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn list_equality_is_ordered() {
        let a = Value::List(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::List(vec![Value::Int(2), Value::Int(1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn entity_equality_is_reference_identity() {
        let a = person("jim", 30);
        let b = person("jim", 30);
        // Structurally identical but distinct nodes
        assert_ne!(a, b);
        let shared = a.clone();
        assert_eq!(a, shared);
    }

    // ==== Defaults ====

    #[test]
    fn default_values_per_kind() {
        assert!(Value::Null.is_default());
        assert!(Value::Bool(false).is_default());
        assert!(Value::Int(0).is_default());
        assert!(Value::Float(0.0).is_default());
        assert!(Value::from("").is_default());
        assert!(Value::Bytes(vec![]).is_default());
        assert!(Value::List(vec![]).is_default());
        assert!(Value::Map(vec![]).is_default());

        assert!(!Value::Bool(true).is_default());
        assert!(!Value::Int(1).is_default());
        assert!(!Value::from("x").is_default());
        let t = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert!(!Value::Time(t).is_default());
        assert!(!person("", 0).is_default());
    }

    // ==== Entity building and mutation ====

    #[test]
    fn entity_builder_and_field_lookup() {
        let p = person("jim", 30);
        let entity = p.as_entity().unwrap();
        assert_eq!(entity.borrow().type_name(), "Person");
        assert_eq!(entity.field("name"), Some(Value::from("jim")));
        assert_eq!(entity.field("age"), Some(Value::Int(30)));
        assert_eq!(entity.field("missing"), None);
    }

    #[test]
    fn field_builder_replaces_duplicates() {
        let e = Entity::new("T").field("a", 1).field("a", 2).build_ref();
        assert_eq!(e.field("a"), Some(Value::Int(2)));
        assert_eq!(e.borrow().len(), 1);
    }

    #[test]
    fn set_field_is_visible_through_shared_handles() {
        let a = Entity::new("T").field("n", 1).build_ref();
        let b = a.clone();
        b.set_field("n", 2);
        assert_eq!(a.field("n"), Some(Value::Int(2)));
        assert!(a.ptr_eq(&b));
    }

    // ==== Deep clone ====

    #[test]
    fn deep_clone_is_independent_of_the_original() {
        let original = Entity::new("Person").field("name", "jim").build_ref();
        let cloned = Value::Entity(original.clone()).deep_clone();

        original.set_field("name", "changed");

        let cloned_entity = cloned.as_entity().unwrap();
        assert_eq!(cloned_entity.field("name"), Some(Value::from("jim")));
        assert!(!cloned_entity.ptr_eq(&original));
    }

    #[test]
    fn deep_clone_preserves_aliasing() {
        let shared = Entity::new("Address").field("city", "berlin").build_ref();
        let holder = Entity::new("Pair")
            .field("first", shared.clone())
            .field("second", shared)
            .build();

        let cloned = holder.deep_clone();
        let entity = cloned.as_entity().unwrap().borrow();
        let first = entity.get("first").unwrap().as_entity().unwrap();
        let second = entity.get("second").unwrap().as_entity().unwrap();
        assert!(first.ptr_eq(second));
    }

    #[test]
    fn deep_clone_preserves_cycles() {
        let node = Entity::new("Node").field("label", "a").build_ref();
        node.set_field("next", Value::Entity(node.clone()));

        let cloned = Value::Entity(node.clone()).deep_clone();
        let cloned_node = cloned.as_entity().unwrap();
        let next = cloned_node.field("next").unwrap();
        let next_entity = next.as_entity().unwrap();

        assert!(next_entity.ptr_eq(cloned_node));
        assert!(!cloned_node.ptr_eq(&node));
    }

    #[test]
    fn deep_clone_copies_entities_inside_collections() {
        let inner = Entity::new("Item").field("id", 1).build_ref();
        let list = Value::List(vec![Value::Entity(inner.clone())]);

        let cloned = list.deep_clone();
        inner.set_field("id", 2);

        let items = cloned.as_list().unwrap();
        let cloned_inner = items[0].as_entity().unwrap();
        assert_eq!(cloned_inner.field("id"), Some(Value::Int(1)));
    }

    // ==== Conversions ====

    #[test]
    fn from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(7), Value::Int(7));
        assert_eq!(Value::from(7i64), Value::Int(7));
        assert_eq!(Value::from(2.5), Value::Float(2.5));
        assert_eq!(Value::from("hi"), Value::String("hi".to_string()));
        assert_eq!(
            Value::from(b"hi".as_slice()),
            Value::Bytes(b"hi".to_vec())
        );
    }

    #[test]
    fn from_json_value() {
        let json = serde_json::json!({
            "name": "jim",
            "age": 30,
            "scores": [1.5, 2],
            "active": true,
            "note": null
        });
        let value = Value::from(json);
        let entries = value.as_map().unwrap();
        assert_eq!(entries.len(), 5);

        let get = |key: &str| {
            entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("name"), Value::from("jim"));
        assert_eq!(get("age"), Value::Int(30));
        assert_eq!(
            get("scores"),
            Value::List(vec![Value::Float(1.5), Value::Int(2)])
        );
        assert_eq!(get("active"), Value::Bool(true));
        assert_eq!(get("note"), Value::Null);
    }

    // ==== Properties ====

    mod properties {
        use super::*;
        use proptest::prelude::*;

        // Entity-free, NaN-free values: native equality is total on these.
        fn arb_plain_value() -> impl Strategy<Value = Value> {
            let scalar = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(Value::Int),
                (-1.0e12f64..1.0e12f64).prop_map(Value::Float),
                "[a-z]{0,8}".prop_map(Value::from),
                proptest::collection::vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
            ];
            scalar.prop_recursive(3, 32, 4, |inner| {
                prop_oneof![
                    proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                    proptest::collection::vec(("[a-z]{1,4}", inner), 0..4).prop_map(|entries| {
                        Value::Map(
                            entries
                                .into_iter()
                                .map(|(k, v)| (Value::from(k), v))
                                .collect(),
                        )
                    }),
                ]
            })
        }

        proptest! {
            #[test]
            fn deep_clone_preserves_native_equality(value in arb_plain_value()) {
                prop_assert_eq!(&value, &value.deep_clone());
            }

            #[test]
            fn deep_clone_preserves_kind_and_default(value in arb_plain_value()) {
                let clone = value.deep_clone();
                prop_assert_eq!(value.kind(), clone.kind());
                prop_assert_eq!(value.is_default(), clone.is_default());
            }
        }
    }
}
