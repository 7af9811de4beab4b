//! Report rendering for values
//!
//! Assertion reports embed values in human-readable form. Test data is
//! frequently large or cyclic, so rendering is capped:
//! - composite values nest at most `max_depth` levels, deeper content
//!   renders as `...`
//! - lists, maps, and byte strings show at most `max_elements` elements
//!   before truncating with `...`
//! - revisiting an entity already being rendered prints a cycle marker
//!   instead of recursing
//!
//! `Display` for [`Value`] uses the default caps; reports that honor
//! `attest.toml` build a [`ValueFormatter`] from the loaded config.

use crate::config::ReportConfig;
use crate::value::Value;
use chrono::SecondsFormat;

/// Default nesting cap.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Default element cap for lists, maps, and byte strings.
pub const DEFAULT_MAX_ELEMENTS: usize = 15;

/// Renders values for assertion reports with depth and element caps.
#[derive(Debug, Clone)]
pub struct ValueFormatter {
    max_depth: usize,
    max_elements: usize,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        ValueFormatter {
            max_depth: DEFAULT_MAX_DEPTH,
            max_elements: DEFAULT_MAX_ELEMENTS,
        }
    }
}

impl ValueFormatter {
    /// Create a formatter with explicit caps.
    pub fn new(max_depth: usize, max_elements: usize) -> Self {
        ValueFormatter {
            max_depth,
            max_elements,
        }
    }

    /// Build a formatter from the report section of the loaded config.
    pub fn from_config(config: &ReportConfig) -> Self {
        ValueFormatter {
            max_depth: config.max_depth,
            max_elements: config.max_elements,
        }
    }

    /// Render a value to its report form.
    pub fn format(&self, value: &Value) -> String {
        let mut out = String::new();
        let mut visiting = Vec::new();
        self.write(value, 0, &mut visiting, &mut out);
        out
    }

    fn write(&self, value: &Value, depth: usize, visiting: &mut Vec<usize>, out: &mut String) {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(f) => out.push_str(&format!("{f:?}")),
            Value::String(s) => out.push_str(&format!("{s:?}")),
            Value::Time(t) => out.push_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Bytes(bytes) => {
                out.push_str("0x");
                for byte in bytes.iter().take(self.max_elements) {
                    out.push_str(&format!("{byte:02x}"));
                }
                if bytes.len() > self.max_elements {
                    out.push_str("...");
                }
            }
            Value::List(items) => {
                if depth >= self.max_depth {
                    out.push_str("...");
                    return;
                }
                out.push('[');
                for (i, item) in items.iter().take(self.max_elements).enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write(item, depth + 1, visiting, out);
                }
                if items.len() > self.max_elements {
                    out.push_str(", ...");
                }
                out.push(']');
            }
            Value::Map(entries) => {
                if depth >= self.max_depth {
                    out.push_str("...");
                    return;
                }
                out.push('{');
                for (i, (k, v)) in entries.iter().take(self.max_elements).enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write(k, depth + 1, visiting, out);
                    out.push_str(": ");
                    self.write(v, depth + 1, visiting, out);
                }
                if entries.len() > self.max_elements {
                    out.push_str(", ...");
                }
                out.push('}');
            }
            Value::Entity(entity) => {
                let id = entity.ptr_id();
                if visiting.contains(&id) {
                    out.push_str("<cycle: ");
                    out.push_str(entity.borrow().type_name());
                    out.push('>');
                    return;
                }
                let node = entity.borrow();
                out.push_str(node.type_name());
                if depth >= self.max_depth {
                    out.push_str("{...}");
                    return;
                }
                visiting.push(id);
                out.push('{');
                for (i, (name, field)) in node.fields().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    self.write(field, depth + 1, visiting, out);
                }
                out.push('}');
                visiting.pop();
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&ValueFormatter::default().format(self))
    }
}
