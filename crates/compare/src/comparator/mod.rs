//! Comparator chain
//!
//! Deep comparison is decomposed into an ordered chain of element
//! comparators. Each element answers two questions:
//! - does it accept a given pair of values ([`ElementComparator::can_compare`])
//! - what is the difference between them ([`ElementComparator::compare`])
//!
//! Dispatch walks the chain front to back and the FIRST accepting element
//! decides the pair; later elements never see it. Chain order is therefore
//! part of the semantics, not an implementation detail. The chain for a
//! mode set is, in order:
//!
//! 1. lenient dates (only with the lenient-dates mode)
//! 2. ignore defaults (only with the ignore-defaults mode)
//! 3. mixed-kind numbers (always)
//! 4. simple cases: nulls, scalars, mixed kinds, identical entities (always)
//! 5. collections, ordered or multiset depending on the lenient-order mode
//! 6. maps (always)
//! 7. entities, field by field (always)
//!
//! The relaxation elements sit in front so an active mode can claim a pair
//! before the strict structural elements reach it. Structural elements
//! recurse through the owning [`ReflectionComparator`] rather than calling
//! each other, so caching and cycle handling apply at every level.

mod collection;
mod dates;
mod defaults;
mod entity;
mod map;
mod numbers;
mod simple;

use attest_core::{AttestResult, Value};

use crate::compare::ReflectionComparator;
use crate::difference::Difference;
use crate::modes::Modes;

use collection::{LenientOrderComparator, OrderedCollectionComparator};
use dates::LenientDatesComparator;
use defaults::IgnoreDefaultsComparator;
use entity::EntityComparator;
use map::MapComparator;
use numbers::MixedNumberComparator;
use simple::SimpleCasesComparator;

/// One element of the comparator chain.
pub(crate) trait ElementComparator {
    /// True if this element decides the given pair.
    fn can_compare(&self, left: &Value, right: &Value) -> bool;

    /// Compare an accepted pair. `None` means equal. Nested values are
    /// compared through `comparator`, never by calling elements directly.
    /// With `only_first`, composite elements stop after their first child
    /// difference.
    fn compare(
        &self,
        left: &Value,
        right: &Value,
        only_first: bool,
        comparator: &ReflectionComparator,
    ) -> AttestResult<Option<Difference>>;
}

/// Build the comparator chain for a mode set.
pub(crate) fn build_chain(modes: Modes) -> Vec<Box<dyn ElementComparator>> {
    let mut chain: Vec<Box<dyn ElementComparator>> = Vec::new();
    if modes.lenient_dates {
        chain.push(Box::new(LenientDatesComparator));
    }
    if modes.ignore_defaults {
        chain.push(Box::new(IgnoreDefaultsComparator));
    }
    chain.push(Box::new(MixedNumberComparator));
    chain.push(Box::new(SimpleCasesComparator));
    if modes.lenient_order {
        chain.push(Box::new(LenientOrderComparator));
    } else {
        chain.push(Box::new(OrderedCollectionComparator));
    }
    chain.push(Box::new(MapComparator));
    chain.push(Box::new(EntityComparator));
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_chain_has_five_elements() {
        assert_eq!(build_chain(Modes::strict()).len(), 5);
    }

    #[test]
    fn every_mode_adds_or_swaps_an_element() {
        assert_eq!(build_chain(Modes::lenient()).len(), 6);
        let all = Modes {
            ignore_defaults: true,
            lenient_dates: true,
            lenient_order: true,
        };
        assert_eq!(build_chain(all).len(), 7);
    }
}
