//! Map comparison
//!
//! Maps compare by key, never by entry order. Keys match with native value
//! equality; the values under matching keys recurse through the chain.
//! Keys present on one side only report as missing on the other side.
//!
//! With ignore-defaults active, an expected entry holding a default value
//! is "don't care" even when the actual map lacks its key, and actual-only
//! keys are not reported at all: the expected map is the contract, extra
//! actual entries are tolerated.

use attest_core::{AttestResult, Value};

use crate::compare::ReflectionComparator;
use crate::difference::{CompositeDifference, Difference};

use super::ElementComparator;

pub(crate) struct MapComparator;

fn lookup<'a>(entries: &'a [(Value, Value)], key: &Value) -> Option<&'a Value> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

impl ElementComparator for MapComparator {
    fn can_compare(&self, left: &Value, right: &Value) -> bool {
        matches!((left, right), (Value::Map(_), Value::Map(_)))
    }

    fn compare(
        &self,
        left: &Value,
        right: &Value,
        only_first: bool,
        comparator: &ReflectionComparator,
    ) -> AttestResult<Option<Difference>> {
        match (left, right) {
            (Value::Map(left_entries), Value::Map(right_entries)) => {
                let ignore_defaults = comparator.modes().ignore_defaults;
                let mut composite = CompositeDifference::new(left.clone(), right.clone());
                for (key, left_value) in left_entries {
                    let child = match lookup(right_entries, key) {
                        Some(right_value) => {
                            comparator.get_difference(left_value, right_value, only_first)?
                        }
                        None if ignore_defaults && left_value.is_default() => None,
                        None => Some(Difference::missing_right(left_value.clone())),
                    };
                    if let Some(child) = child {
                        composite.add(key.clone(), child);
                        if only_first {
                            return Ok(composite.into_option());
                        }
                    }
                }
                if !ignore_defaults {
                    for (key, right_value) in right_entries {
                        if lookup(left_entries, key).is_none() {
                            composite.add(key.clone(), Difference::missing_left(right_value.clone()));
                            if only_first {
                                break;
                            }
                        }
                    }
                }
                Ok(composite.into_option())
            }
            _ => Ok(None),
        }
    }
}
