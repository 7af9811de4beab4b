//! Difference reports
//!
//! Turns a difference tree into the text block an assertion failure
//! carries: both compared values in full, then one line per leaf with the
//! path from the root and the two sides. Values render through
//! [`ValueFormatter`], so reports stay bounded even for large or cyclic
//! data.
//!
//! Path syntax: field steps join with `.`, list positions render as
//! `[index]`, map keys as `[key]` with the key in value syntax (string
//! keys keep their quotes, so `[0]` is a position and `["0"]` a key).

use attest_core::{Config, Value, ValueFormatter};

use crate::difference::{DiffKey, DiffValue, Difference};

/// Renders difference trees for assertion messages.
#[derive(Debug, Clone)]
pub struct DifferenceReport {
    formatter: ValueFormatter,
}

impl Default for DifferenceReport {
    fn default() -> Self {
        Self::new()
    }
}

impl DifferenceReport {
    /// Report with rendering caps from the ambient config.
    pub fn new() -> Self {
        DifferenceReport {
            formatter: ValueFormatter::from_config(&Config::global().report),
        }
    }

    /// Report with explicit rendering caps.
    pub fn with_formatter(formatter: ValueFormatter) -> Self {
        DifferenceReport { formatter }
    }

    /// Render the compared pair and every leaf difference.
    pub fn render(&self, left: &Value, right: &Value, difference: &Difference) -> String {
        let mut out = String::new();
        out.push_str("Expected: ");
        out.push_str(&self.formatter.format(left));
        out.push_str("\n  Actual: ");
        out.push_str(&self.formatter.format(right));
        out.push_str("\n\nFound following differences:\n");
        for (path, leaf) in difference.leaves() {
            out.push_str(&render_path(&path));
            out.push_str(": ");
            out.push_str(&self.render_side(&leaf.left));
            out.push_str(" <-> ");
            out.push_str(&self.render_side(&leaf.right));
            out.push('\n');
        }
        out
    }

    fn render_side(&self, side: &DiffValue) -> String {
        match side.as_value() {
            Some(value) => self.formatter.format(value),
            None => "<missing>".to_string(),
        }
    }
}

/// Render a leaf path. The empty path (a top-level leaf) renders as
/// `value`.
pub(crate) fn render_path(path: &[DiffKey]) -> String {
    if path.is_empty() {
        return "value".to_string();
    }
    let mut out = String::new();
    for key in path {
        match key {
            DiffKey::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            DiffKey::Index(i) => out.push_str(&format!("[{}]", i)),
            DiffKey::Key(k) => out.push_str(&format!("[{}]", k)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::ReflectionComparator;
    use attest_core::Entity;

    fn report() -> DifferenceReport {
        DifferenceReport::with_formatter(ValueFormatter::default())
    }

    fn full_difference(left: &Value, right: &Value) -> Difference {
        ReflectionComparator::strict()
            .get_difference(left, right, false)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn renders_both_values_and_each_leaf() {
        let left = Entity::new("Person").field("name", "jim").build();
        let right = Entity::new("Person").field("name", "ben").build();
        let difference = full_difference(&left, &right);

        let rendered = report().render(&left, &right, &difference);
        assert_eq!(
            rendered,
            "Expected: Person{name: \"jim\"}\n  \
             Actual: Person{name: \"ben\"}\n\n\
             Found following differences:\n\
             name: \"jim\" <-> \"ben\"\n"
        );
    }

    #[test]
    fn nested_paths_join_fields_and_indexes() {
        let left = Entity::new("Order")
            .field("lines", Value::List(vec![Value::Int(1), Value::Int(2)]))
            .build();
        let right = Entity::new("Order")
            .field("lines", Value::List(vec![Value::Int(1), Value::Int(9)]))
            .build();
        let difference = full_difference(&left, &right);

        let rendered = report().render(&left, &right, &difference);
        assert!(rendered.contains("lines[1]: 2 <-> 9"));
    }

    #[test]
    fn missing_positions_render_the_marker() {
        let left = Value::List(vec![Value::Int(1), Value::Int(2)]);
        let right = Value::List(vec![Value::Int(1)]);
        let difference = full_difference(&left, &right);

        let rendered = report().render(&left, &right, &difference);
        assert!(rendered.contains("[1]: 2 <-> <missing>"));
    }

    #[test]
    fn top_level_leaves_use_a_plain_label() {
        let left = Value::Int(1);
        let right = Value::from("1");
        let difference = full_difference(&left, &right);

        let rendered = report().render(&left, &right, &difference);
        assert!(rendered.contains("value: 1 <-> \"1\""));
    }

    #[test]
    fn map_keys_are_distinguishable_from_indexes() {
        assert_eq!(render_path(&[DiffKey::Index(0)]), "[0]");
        assert_eq!(
            render_path(&[DiffKey::Key(Value::from("0"))]),
            "[\"0\"]"
        );
        assert_eq!(
            render_path(&[
                DiffKey::Field("a".to_string()),
                DiffKey::Index(2),
                DiffKey::Field("b".to_string())
            ]),
            "a[2].b"
        );
    }
}
