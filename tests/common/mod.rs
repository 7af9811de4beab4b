//! Shared test utilities for the integration test suites.
//!
//! Import via `mod common;` from any test file.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Once;

pub use attest::{
    assert_equals, assert_lenient_equals, assert_reflect_equals, Entity, EntityRef, Mode, Modes,
    Value,
};

static INIT_TRACING: Once = Once::new();

/// Installs a test-friendly tracing subscriber once per binary.
/// `RUST_LOG=attest=debug` shows comparison and mock internals.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A flat person entity.
pub fn person(name: &str, age: i64) -> Value {
    Entity::new("Person")
        .field("name", name)
        .field("age", age)
        .build()
}

/// A person entity holding a list of role strings.
pub fn person_with_roles(name: &str, roles: &[&str]) -> Value {
    Entity::new("Person")
        .field("name", name)
        .field(
            "roles",
            Value::List(roles.iter().map(|r| Value::from(*r)).collect()),
        )
        .build()
}

/// Two mutually-referencing person entities; returns the first.
pub fn partners(first: &str, second: &str) -> EntityRef {
    let a = Entity::new("Person").field("name", first).build_ref();
    let b = Entity::new("Person").field("name", second).build_ref();
    a.set_field("partner", Value::Entity(b.clone()));
    b.set_field("partner", Value::Entity(a.clone()));
    a
}
