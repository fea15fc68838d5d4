//! Integration tests for the policy lifecycle state machine.
//!
//! Covers default read-through, explicit sets, and the warn-once behavior of
//! each of the four diagnostic situations, including which flags an explicit
//! set re-arms.

use buildpol::{MemorySink, PolicyEngine, PolicyError, PolicyRegistration, PolicyValue};

fn engine_with_sink() -> (PolicyEngine, MemorySink) {
    let sink = MemorySink::new();
    let engine = PolicyEngine::with_sink(Box::new(sink.clone()));
    (engine, sink)
}

fn register(
    engine: &mut PolicyEngine,
    name: &str,
    warning: Option<&str>,
    deprecated: Option<&str>,
    removed: Option<&str>,
) {
    let registration = PolicyRegistration::from_parts(
        name,
        "behavioral switch used by lifecycle tests",
        "OLD",
        "1.0",
        warning,
        deprecated,
        removed,
    )
    .expect("build registration");
    engine.register(registration).expect("register");
}

#[test]
fn unset_policies_read_their_default() {
    let (mut engine, sink) = engine_with_sink();
    register(&mut engine, "P0001", None, None, None);
    assert_eq!(engine.get("P0001").expect("get"), PolicyValue::Old);
    assert!(engine.fields("P0001").expect("fields").is_default);
    assert!(sink.messages().is_empty(), "current+no-warning is silent");
}

#[test]
fn set_then_get_round_trips_and_clears_is_default() {
    let (mut engine, _sink) = engine_with_sink();
    register(&mut engine, "P0001", None, None, None);
    engine.set("P0001", PolicyValue::New).expect("set");
    assert_eq!(engine.get("P0001").expect("get"), PolicyValue::New);
    let fields = engine.fields("P0001").expect("fields");
    assert!(!fields.is_default);
    assert_eq!(fields.current_value, PolicyValue::New);
}

#[test]
fn fields_after_register_report_default_as_current() {
    let (mut engine, _sink) = engine_with_sink();
    register(&mut engine, "P0001", None, None, None);
    engine.get("P0001").expect("get");
    let fields = engine.fields("P0001").expect("fields");
    assert!(fields.is_default);
    assert_eq!(fields.current_value, fields.default);
}

#[test]
fn set_from_str_rejects_values_outside_new_and_old() {
    let (mut engine, _sink) = engine_with_sink();
    register(&mut engine, "P0001", None, None, None);
    let err = engine
        .set_from_str("P0001", "MAYBE")
        .expect_err("invalid value");
    assert!(matches!(
        err,
        PolicyError::InvalidValue { name, value } if name == "P0001" && value == "MAYBE"
    ));
    // Lowercase spellings are not accepted either.
    assert!(matches!(
        engine.set_from_str("P0001", "new"),
        Err(PolicyError::InvalidValue { .. })
    ));
    // A rejected set leaves the policy untouched.
    assert!(engine.fields("P0001").expect("fields").is_default);

    engine.set_from_str("P0001", "NEW").expect("set");
    assert_eq!(engine.get("P0001").expect("get"), PolicyValue::New);
}

#[test]
fn get_and_set_reject_unknown_names() {
    let (mut engine, _sink) = engine_with_sink();
    assert!(matches!(
        engine.get("missing"),
        Err(PolicyError::NotRegistered(name)) if name == "missing"
    ));
    assert!(matches!(
        engine.set("missing", PolicyValue::New),
        Err(PolicyError::NotRegistered(name)) if name == "missing"
    ));
    assert!(matches!(
        engine.info("missing"),
        Err(PolicyError::NotRegistered(_))
    ));
    assert!(matches!(
        engine.fields("missing"),
        Err(PolicyError::NotRegistered(_))
    ));
}

#[test]
fn current_warning_fires_once_until_set_rearms_it() {
    let (mut engine, sink) = engine_with_sink();
    register(&mut engine, "P0001", Some("behavior changed in 1.0"), None, None);

    engine.get("P0001").expect("get");
    engine.get("P0001").expect("get");
    let first = sink.drain();
    assert_eq!(first.len(), 1, "second read must not repeat the warning");
    assert!(first[0].contains("behavior changed in 1.0"));
    assert!(first[0].contains("Set policy 'P0001'"));

    // Explicit set re-arms the flag, but a set policy is silent anyway.
    engine.set("P0001", PolicyValue::New).expect("set");
    engine.get("P0001").expect("get");
    assert!(sink.messages().is_empty());
}

#[test]
fn deprecated_unset_and_set_are_distinct_scenarios() {
    let (mut engine, sink) = engine_with_sink();
    register(&mut engine, "P0002", None, Some("2.0"), None);

    engine.get("P0002").expect("get");
    engine.get("P0002").expect("get");
    let unset_notices = sink.drain();
    assert_eq!(unset_notices.len(), 1);
    assert!(unset_notices[0].contains("deprecated since version 2.0"));
    assert!(unset_notices[0].contains("Set it to NEW or OLD"));

    engine.set("P0002", PolicyValue::Old).expect("set");
    engine.get("P0002").expect("get");
    engine.get("P0002").expect("get");
    let set_notices = sink.drain();
    assert_eq!(set_notices.len(), 1);
    assert!(set_notices[0].contains("deprecated since version 2.0"));
    assert!(
        !set_notices[0].contains("Set it to NEW or OLD"),
        "set-policy notice is the short form"
    );
}

#[test]
fn set_rearms_deprecated_notices() {
    let (mut engine, sink) = engine_with_sink();
    register(&mut engine, "P0002", None, Some("2.0"), None);

    engine.set("P0002", PolicyValue::New).expect("set");
    engine.get("P0002").expect("get");
    assert_eq!(sink.drain().len(), 1);

    // A fresh set re-arms the deprecated-set scenario.
    engine.set("P0002", PolicyValue::Old).expect("set");
    engine.get("P0002").expect("get");
    assert_eq!(sink.drain().len(), 1);
}

#[test]
fn removed_notice_fires_once_and_set_never_rearms_it() {
    let (mut engine, sink) = engine_with_sink();
    register(&mut engine, "P0003", None, Some("2.0"), Some("3.0"));

    engine.get("P0003").expect("get");
    engine.get("P0003").expect("get");
    let notices = sink.drain();
    assert_eq!(notices.len(), 1);
    assert!(
        notices[0].contains("removed in version 3.0"),
        "removed takes precedence over deprecated"
    );

    engine.set("P0003", PolicyValue::Old).expect("set");
    engine.get("P0003").expect("get");
    assert!(
        sink.messages().is_empty(),
        "removal notices are permanent for the process run"
    );
}

#[test]
fn removed_notice_fires_even_when_explicitly_set() {
    let (mut engine, sink) = engine_with_sink();
    register(&mut engine, "P0003", None, None, Some("3.0"));
    engine.set("P0003", PolicyValue::New).expect("set");
    engine.get("P0003").expect("get");
    let notices = sink.messages();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("removed in version 3.0"));
}

#[test]
fn diagnostics_never_change_the_returned_value() {
    let (mut engine, _sink) = engine_with_sink();
    register(&mut engine, "P0003", None, None, Some("3.0"));
    assert_eq!(engine.get("P0003").expect("get"), PolicyValue::Old);
    engine.set("P0003", PolicyValue::New).expect("set");
    assert_eq!(engine.get("P0003").expect("get"), PolicyValue::New);
}

#[test]
fn warn_once_state_is_tracked_per_policy() {
    let (mut engine, sink) = engine_with_sink();
    register(&mut engine, "P0004", Some("first warning"), None, None);
    register(&mut engine, "P0005", Some("second warning"), None, None);

    engine.get("P0004").expect("get");
    engine.get("P0005").expect("get");
    engine.get("P0004").expect("get");
    engine.get("P0005").expect("get");
    let notices = sink.messages();
    assert_eq!(notices.len(), 2);
    assert!(notices[0].contains("first warning"));
    assert!(notices[1].contains("second warning"));
}

#[test]
fn info_lists_all_fields_and_value_origin() {
    let (mut engine, _sink) = engine_with_sink();
    register(&mut engine, "P0006", Some("legacy layout"), Some("2.4"), None);
    let unset = engine.info("P0006").expect("info");
    assert!(unset.contains("policy: P0006"));
    assert!(unset.contains("default: OLD"));
    assert!(unset.contains("introduced: 1.0"));
    assert!(unset.contains("warning: legacy layout"));
    assert!(unset.contains("deprecated: 2.4"));
    assert!(!unset.contains("removed:"));
    assert!(unset.contains("current: OLD (default)"));

    engine.set("P0006", PolicyValue::New).expect("set");
    let set = engine.info("P0006").expect("info");
    assert!(set.contains("current: NEW (explicit)"));
}
