//! Reflection comparison, end to end through the facade.
//!
//! Covers the assertion entry points, mode combinations, cyclic
//! object graphs, and the rendered difference reports.

mod common;

use attest::{
    assert_equals, assert_lenient_equals, assert_reflect_equals, Entity, Mode, Modes,
    ReflectionComparator, Value,
};
use chrono::{TimeZone, Utc};
use common::{init_tracing, partners, person, person_with_roles};

// ============================================================================
// Assertion entry points
// ============================================================================

#[test]
fn equal_graphs_pass_strict_assertion() {
    init_tracing();
    assert_equals(&person("jim", 32), &person("jim", 32)).unwrap();
}

#[test]
fn differences_are_reported_with_their_path() {
    init_tracing();
    let error = assert_equals(&person("jim", 32), &person("ben", 33)).unwrap_err();
    let message = error.to_string();

    assert!(message.starts_with("Assertion failed."));
    assert!(message.contains("Found following differences:"));
    assert!(message.contains("name: \"jim\" <-> \"ben\""));
    assert!(message.contains("age: 32 <-> 33"));
}

#[test]
fn nested_paths_use_dotted_fields_and_indexes() {
    let expected = Entity::new("Team")
        .field("members", Value::List(vec![person("jim", 32)]))
        .build();
    let actual = Entity::new("Team")
        .field("members", Value::List(vec![person("jim", 30)]))
        .build();

    let message = assert_equals(&expected, &actual).unwrap_err().to_string();
    assert!(message.contains("members[0].age: 32 <-> 30"));
}

// ============================================================================
// Modes
// ============================================================================

#[test]
fn lenient_order_ignores_list_order() {
    let expected = person_with_roles("jim", &["admin", "user"]);
    let actual = person_with_roles("jim", &["user", "admin"]);

    assert_equals(&expected, &actual).unwrap_err();
    assert_reflect_equals(&expected, &actual, Modes::of(&[Mode::LenientOrder])).unwrap();
}

#[test]
fn ignore_defaults_treats_expected_defaults_as_wildcards() {
    let template = person("jim", 0);
    let actual = person("jim", 45);

    assert_reflect_equals(&template, &actual, Modes::of(&[Mode::IgnoreDefaults])).unwrap();
    // The relaxation only reads the expected side.
    assert_reflect_equals(&actual, &template, Modes::of(&[Mode::IgnoreDefaults])).unwrap_err();
}

#[test]
fn lenient_assertion_combines_order_and_defaults() {
    let template = Entity::new("Person")
        .field("name", "jim")
        .field("age", 0)
        .field("roles", Value::List(vec![]))
        .build();
    let actual = Entity::new("Person")
        .field("name", "jim")
        .field("age", 45)
        .field(
            "roles",
            Value::List(vec![Value::from("admin"), Value::from("user")]),
        )
        .build();

    assert_lenient_equals(&template, &actual).unwrap();
}

#[test]
fn lenient_dates_only_check_presence() {
    let expected = Entity::new("Audit")
        .field("at", Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
        .build();
    let actual = Entity::new("Audit")
        .field("at", Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap())
        .build();

    assert_reflect_equals(&expected, &actual, Modes::strict()).unwrap_err();
    assert_reflect_equals(&expected, &actual, Modes::of(&[Mode::LenientDates])).unwrap();

    // A set expected time against an unset actual still fails.
    let unset = Entity::new("Audit").field("at", Value::Null).build();
    assert_reflect_equals(&expected, &unset, Modes::of(&[Mode::LenientDates])).unwrap_err();
}

#[test]
fn integers_match_floats_of_the_same_magnitude() {
    assert_equals(&Value::from(5), &Value::from(5.0)).unwrap();
    assert_equals(&Value::from(5), &Value::from(5.5)).unwrap_err();
}

// ============================================================================
// Cyclic graphs
// ============================================================================

#[test]
fn cyclic_graphs_compare_against_their_clone() {
    let jim = partners("jim", "anna");
    let clone = Value::Entity(jim.clone()).deep_clone();

    assert_equals(&Value::Entity(jim), &clone).unwrap();
}

#[test]
fn difference_inside_a_cycle_is_still_found() {
    let expected = partners("jim", "anna");
    let actual = partners("jim", "ann");

    let message = assert_equals(&Value::Entity(expected), &Value::Entity(actual))
        .unwrap_err()
        .to_string();
    assert!(message.contains("partner.name: \"anna\" <-> \"ann\""));
}

#[test]
fn comparator_reuse_over_shared_subtrees() {
    let comparator = ReflectionComparator::strict();
    let shared = person("jim", 32);
    let left = Value::List(vec![shared.clone(), shared.clone()]);
    let right = Value::List(vec![shared.clone(), shared]);

    assert!(comparator.is_equal(&left, &right).unwrap());
}
