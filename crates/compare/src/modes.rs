//! Comparison modes
//!
//! Modes relax parts of the strict deep comparison. Each mode is global to
//! a comparison run; there is no per-field opt-in:
//! - `IgnoreDefaults`: default-valued expected values match anything
//! - `LenientDates`: time values only need to agree on being set or unset
//! - `LenientOrder`: ordered collections compare as multisets
//!
//! The mode set decides which elements sit in the comparator chain, so two
//! runs with different modes can disagree on the same pair of values.

use attest_core::CompareConfig;

/// A single relaxation of strict comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Default-valued expected values ("zero/empty/null") match anything.
    IgnoreDefaults,
    /// Time values only need to agree on being set or unset.
    LenientDates,
    /// Ordered collections compare as multisets.
    LenientOrder,
}

/// The set of modes active for a comparison run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modes {
    /// [`Mode::IgnoreDefaults`] is active.
    pub ignore_defaults: bool,
    /// [`Mode::LenientDates`] is active.
    pub lenient_dates: bool,
    /// [`Mode::LenientOrder`] is active.
    pub lenient_order: bool,
}

impl Modes {
    /// No relaxations: strict deep comparison.
    pub fn strict() -> Self {
        Modes::default()
    }

    /// The lenient assertion pairing: ignore defaults plus lenient order.
    pub fn lenient() -> Self {
        Modes {
            ignore_defaults: true,
            lenient_dates: false,
            lenient_order: true,
        }
    }

    /// Build a mode set from a list of modes.
    pub fn of(modes: &[Mode]) -> Self {
        modes
            .iter()
            .fold(Modes::default(), |set, &mode| set.with(mode))
    }

    /// Return a copy with the given mode switched on.
    pub fn with(mut self, mode: Mode) -> Self {
        match mode {
            Mode::IgnoreDefaults => self.ignore_defaults = true,
            Mode::LenientDates => self.lenient_dates = true,
            Mode::LenientOrder => self.lenient_order = true,
        }
        self
    }

    /// True if the given mode is active.
    pub fn has(&self, mode: Mode) -> bool {
        match mode {
            Mode::IgnoreDefaults => self.ignore_defaults,
            Mode::LenientDates => self.lenient_dates,
            Mode::LenientOrder => self.lenient_order,
        }
    }

    /// Mode set from the `[compare]` section of the loaded config.
    pub fn from_config(config: &CompareConfig) -> Self {
        Modes {
            ignore_defaults: config.ignore_defaults,
            lenient_dates: config.lenient_dates,
            lenient_order: config.lenient_order,
        }
    }
}
