//! Core types for attest
//!
//! This crate defines the foundational types used by the comparison and
//! mock layers:
//! - Value: dynamic value enum for arguments, fields, and dataset columns
//! - Entity / EntityRef: shared object-graph nodes with reference identity
//! - ValueKind: type tag discriminating value variants
//! - ValueFormatter: capped, cycle-safe report rendering
//! - Config: library configuration via `attest.toml`
//! - AttestError / AttestResult: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod fmt;
pub mod value;

// Re-export commonly used types
pub use config::{CompareConfig, Config, MockConfig, ReportConfig, CONFIG_FILE_NAME};
pub use error::{AttestError, AttestResult};
pub use fmt::ValueFormatter;
pub use value::{Entity, EntityRef, Value, ValueKind};
