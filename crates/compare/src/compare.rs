//! Reflection comparator
//!
//! [`ReflectionComparator`] owns a comparator chain built for one mode set
//! and dispatches every pair of values, at every nesting level, through it.
//! The first chain element accepting a pair decides it; a pair no element
//! accepts is a configuration error, not a difference.
//!
//! ## Entity-pair caching
//!
//! Results for entity pairs are cached by node identity. The pair is
//! seeded as "no difference" BEFORE its fields are compared, so re-reaching
//! the same pair during the descent (a cycle in both graphs) terminates and
//! lets the verdict come from the rest of the structure. The cache also
//! means a subtree pair shared many times is compared once.
//!
//! Truncated comparisons (`only_first`) and full comparisons keep separate
//! caches: a truncated tree must never be served where a complete one was
//! asked for.
//!
//! A comparator is meant to live for one comparison run. Results are cached
//! by node identity, so mutating an entity between two runs of the same
//! comparator would serve stale verdicts.

use std::cell::RefCell;

use attest_core::{AttestError, AttestResult, Value};
use rustc_hash::FxHashMap;

use crate::comparator::{build_chain, ElementComparator};
use crate::difference::Difference;
use crate::modes::Modes;

type PairKey = (usize, usize);
type PairCache = RefCell<FxHashMap<PairKey, Option<Difference>>>;

/// Deep comparator for a fixed mode set.
pub struct ReflectionComparator {
    modes: Modes,
    chain: Vec<Box<dyn ElementComparator>>,
    first_cache: PairCache,
    all_cache: PairCache,
}

impl ReflectionComparator {
    /// Build a comparator for the given mode set.
    pub fn new(modes: Modes) -> Self {
        ReflectionComparator {
            modes,
            chain: build_chain(modes),
            first_cache: RefCell::new(FxHashMap::default()),
            all_cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Comparator with no relaxations.
    pub fn strict() -> Self {
        Self::new(Modes::strict())
    }

    /// Comparator with ignore-defaults and lenient-order active.
    pub fn lenient() -> Self {
        Self::new(Modes::lenient())
    }

    /// The mode set this comparator was built for.
    pub fn modes(&self) -> Modes {
        self.modes
    }

    /// Compare two values. `None` means equal under the active modes. With
    /// `only_first`, the returned tree is truncated to the first difference
    /// found.
    ///
    /// # Errors
    ///
    /// Returns [`AttestError::UnsupportedComparison`] if no chain element
    /// accepts a pair encountered during the descent.
    pub fn get_difference(
        &self,
        left: &Value,
        right: &Value,
        only_first: bool,
    ) -> AttestResult<Option<Difference>> {
        let pair = match (left, right) {
            (Value::Entity(l), Value::Entity(r)) => Some((l.ptr_id(), r.ptr_id())),
            _ => None,
        };
        if let Some(key) = pair {
            let cache = self.cache(only_first);
            if let Some(cached) = cache.borrow().get(&key) {
                return Ok(cached.clone());
            }
            // Seed the pair as equal before descending; re-reaching it
            // inside the descent is a cycle and terminates here.
            cache.borrow_mut().insert(key, None);
        }
        let result = self.dispatch(left, right, only_first);
        if let Some(key) = pair {
            match &result {
                Ok(difference) => {
                    self.cache(only_first)
                        .borrow_mut()
                        .insert(key, difference.clone());
                }
                Err(_) => {
                    self.cache(only_first).borrow_mut().remove(&key);
                }
            }
        }
        result
    }

    /// True if the two values are equal under the active modes.
    pub fn is_equal(&self, left: &Value, right: &Value) -> AttestResult<bool> {
        Ok(self.get_difference(left, right, true)?.is_none())
    }

    fn cache(&self, only_first: bool) -> &PairCache {
        if only_first {
            &self.first_cache
        } else {
            &self.all_cache
        }
    }

    fn dispatch(
        &self,
        left: &Value,
        right: &Value,
        only_first: bool,
    ) -> AttestResult<Option<Difference>> {
        for element in &self.chain {
            if element.can_compare(left, right) {
                return element.compare(left, right, only_first, self);
            }
        }
        Err(AttestError::UnsupportedComparison {
            left: left.type_name().to_string(),
            right: right.type_name().to_string(),
        })
    }
}
