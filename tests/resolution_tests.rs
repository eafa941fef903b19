// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for key extraction and recursive value resolution.

mod common;

use common::{init_tracing, InlineContext, NoTasks, StubTask};
use keytree::prelude::*;
use std::collections::BTreeMap;

#[test]
fn plain_key_extraction() {
    let key: ConfigKey<String> = ConfigKey::new("app.name");
    let mut table = ValueTable::new();
    table.insert(&key, RawValue::plain("frontend"));

    let value = key.extract_value(&table, &NoTasks).unwrap();
    assert_eq!(value, "frontend");
}

#[test]
fn missing_plain_key_fails_even_with_default() {
    let key: ConfigKey<i64> = ConfigKey::new("server.port").with_default(8080);
    let table = ValueTable::new();

    // Plain extraction never substitutes the default.
    let err = key.extract_value(&table, &NoTasks).unwrap_err();
    assert!(matches!(err, ConfigError::ValueNotFound { .. }));
}

#[test]
fn default_substitution_is_an_explicit_caller_policy() {
    let key: ConfigKey<i64> = ConfigKey::new("server.port").with_default(8080);
    let table = ValueTable::new();

    let value = key.extract_value_or_default(&table, &NoTasks).unwrap();
    assert_eq!(value, 8080);

    let bare: ConfigKey<i64> = ConfigKey::new("server.port");
    assert!(bare.extract_value_or_default(&table, &NoTasks).is_err());
}

#[test]
fn present_value_wins_over_default() {
    let key: ConfigKey<i64> = ConfigKey::new("server.port").with_default(8080);
    let mut table = ValueTable::new();
    table.insert(&key, RawValue::plain(9090));

    assert_eq!(key.extract_value_or_default(&table, &NoTasks).unwrap(), 9090);
}

#[test]
fn map_key_reassembles_its_sub_entries() {
    init_tracing();
    let tags: MapConfigKey<String> = MapConfigKey::new("tags");
    let mut table = ValueTable::new();
    table.insert(&tags.sub_key("env"), RawValue::plain("prod"));
    table.insert(&tags.sub_key("owner"), RawValue::plain("ops"));
    // Unrelated key spelled like a sub-key, but not minted by `tags`.
    let unrelated: ConfigKey<String> = ConfigKey::new("tags.other");
    table.insert(&unrelated, RawValue::plain("ignored"));

    let value = tags.extract_value(&table, &NoTasks).unwrap();

    let mut expected = BTreeMap::new();
    expected.insert("env".to_string(), "prod".to_string());
    expected.insert("owner".to_string(), "ops".to_string());
    assert_eq!(value, expected);
}

#[test]
fn map_key_excludes_sub_keys_of_a_different_parent() {
    let tags: MapConfigKey<String> = MapConfigKey::new("tags");
    let shadow: MapConfigKey<String> = MapConfigKey::new("tags").with_description("shadow");
    let mut table = ValueTable::new();
    table.insert(&tags.sub_key("env"), RawValue::plain("prod"));
    table.insert(&shadow.sub_key("env"), RawValue::plain("shadowed"));

    let value = tags.extract_value(&table, &NoTasks).unwrap();
    assert_eq!(value.len(), 1);
    assert_eq!(value.get("env").map(String::as_str), Some("prod"));
}

#[test]
fn map_key_with_no_entries_is_empty_not_missing() {
    let tags: MapConfigKey<String> = MapConfigKey::new("tags");
    let table = ValueTable::new();
    assert!(tags.extract_value(&table, &NoTasks).unwrap().is_empty());
}

#[test]
fn list_key_reassembles_in_table_order() {
    let nodes: ListConfigKey<String> = ListConfigKey::new("cluster.nodes");
    let mut table = ValueTable::new();
    for name in ["c", "a", "b"] {
        table.insert(&nodes.sub_key(), RawValue::plain(name));
    }

    // The table iterates in insertion order, so the list comes back in
    // insertion order. The key itself promises no semantic order.
    let value = nodes.extract_value(&table, &NoTasks).unwrap();
    assert_eq!(value, vec!["c", "a", "b"]);
}

#[test]
fn sub_key_extracts_like_a_plain_key() {
    let tags: MapConfigKey<i64> = MapConfigKey::new("limits");
    let max = tags.sub_key("max");
    let mut table = ValueTable::new();
    table.insert(&max, RawValue::plain(100));

    assert_eq!(max.extract_value(&table, &NoTasks).unwrap(), 100);
}

#[test]
fn pending_entries_are_resolved_through_the_context() {
    let tags: MapConfigKey<String> = MapConfigKey::new("tags");
    let task = StubTask::new("lookup-env");
    let ctx = InlineContext::new().with_result("lookup-env", RawValue::plain("prod"));

    let mut table = ValueTable::new();
    table.insert(&tags.sub_key("env"), RawValue::task(task));
    table.insert(&tags.sub_key("owner"), RawValue::plain("ops"));

    let value = tags.extract_value(&table, &ctx).unwrap();
    assert_eq!(value.get("env").map(String::as_str), Some("prod"));
    assert_eq!(value.get("owner").map(String::as_str), Some("ops"));
    assert_eq!(ctx.submit_count("lookup-env"), 1);
}

#[test]
fn nested_pending_results_fully_unwrap_and_submit_once() {
    // A task produces a map that itself contains a second task; the second
    // task is referenced twice but submitted once.
    let key: ConfigKey<BTreeMap<String, i64>> = ConfigKey::new("quota");
    let outer = StubTask::new("outer");
    let inner = StubTask::new("inner");

    let mut produced = BTreeMap::new();
    produced.insert("a".to_string(), RawValue::task(inner.clone()));
    produced.insert("b".to_string(), RawValue::task(inner));

    let ctx = InlineContext::new()
        .with_result("outer", RawValue::Map(produced))
        .with_result("inner", RawValue::plain(9));

    let mut table = ValueTable::new();
    table.insert(&key, RawValue::task(outer));

    let value = key.extract_value(&table, &ctx).unwrap();
    assert_eq!(value.get("a"), Some(&9));
    assert_eq!(value.get("b"), Some(&9));
    assert_eq!(ctx.submit_count("outer"), 1);
    assert_eq!(ctx.submit_count("inner"), 1);
}

#[test]
fn deferred_entries_resolve_synchronously() {
    let key: ConfigKey<i64> = ConfigKey::new("computed");
    let mut table = ValueTable::new();
    table.insert(&key, RawValue::deferred(|| RawValue::plain(41 + 1)));

    assert_eq!(key.extract_value(&table, &NoTasks).unwrap(), 42);
}

#[test]
fn task_failure_surfaces_through_extraction() {
    let key: ConfigKey<i64> = ConfigKey::new("doomed");
    let task = StubTask::new("doomed-task");
    let ctx = InlineContext::new().with_failure("doomed-task", "provisioning quota exhausted");

    let mut table = ValueTable::new();
    table.insert(&key, RawValue::task(task));

    let err = key.extract_value(&table, &ctx).unwrap_err();
    match err {
        ConfigError::TaskFailed { name, message } => {
            assert_eq!(name, "doomed-task");
            assert_eq!(message, "provisioning quota exhausted");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn self_referential_deferred_value_hits_the_depth_ceiling() {
    fn endless() -> RawValue {
        RawValue::deferred(endless)
    }
    let key: ConfigKey<i64> = ConfigKey::new("cyclic");
    let mut table = ValueTable::new();
    table.insert(&key, endless());

    let err = key.extract_value(&table, &NoTasks).unwrap_err();
    assert!(matches!(err, ConfigError::ResolutionDepthExceeded { .. }));
}

#[test]
fn extraction_does_not_mutate_the_table() {
    let tags: MapConfigKey<String> = MapConfigKey::new("tags");
    let mut table = ValueTable::new();
    table.insert(&tags.sub_key("env"), RawValue::plain("prod"));

    tags.extract_value(&table, &NoTasks).unwrap();
    tags.extract_value(&table, &NoTasks).unwrap();
    assert_eq!(table.len(), 1);
}

#[test]
fn type_mismatch_is_reported_with_the_key_name() {
    let key: ConfigKey<i64> = ConfigKey::new("server.port");
    let mut table = ValueTable::new();
    table.insert(&key, RawValue::plain("eighty"));

    match key.extract_value(&table, &NoTasks).unwrap_err() {
        ConfigError::TypeMismatch { key, expected, .. } => {
            assert_eq!(key, "server.port");
            assert_eq!(expected, "int");
        }
        other => panic!("unexpected error: {other}"),
    }
}
