//! Tests for reducer resolution and invocation.

use std::sync::Arc;

use serde_json::json;

use crate::command::Operation;
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::output::Output;
use crate::reducer::{CommandPatch, ReducerRegistry, ReducerResult};
use crate::runner::Runner;
use crate::store::MemoryStore;

use super::support::{command, seed_orders};

#[test]
fn db_wildcard_wins_over_col_wildcard() {
    let mut registry = ReducerRegistry::new();
    registry.register("shop:*", |_cmd, _col| {
        ReducerResult::reject(json!("from shop:*"))
    });
    registry.register("*:orders", |_cmd, _col| {
        ReducerResult::reject(json!("from *:orders"))
    });

    let store = Arc::new(MemoryStore::new());
    let runner = Runner::new(store, Arc::new(PipelineConfig::new()))
        .with_reducers(Arc::new(registry));

    let mut cmd = command("orders", "find", vec![]);
    cmd.db = Some("shop".to_string());
    let err = runner.run(vec![cmd]).unwrap_err();

    match err {
        Error::Reducer { detail } => assert_eq!(detail, json!("from shop:*")),
        other => panic!("expected Reducer error, got {other:?}"),
    }
}

#[test]
fn col_wildcard_wins_over_exact() {
    let mut registry = ReducerRegistry::new();
    registry.register("*:orders", |_cmd, _col| {
        ReducerResult::reject(json!("wildcard"))
    });
    registry.register("test:orders", |_cmd, _col| {
        ReducerResult::reject(json!("exact"))
    });

    let store = Arc::new(MemoryStore::new());
    let runner = Runner::new(store, Arc::new(PipelineConfig::new()))
        .with_reducers(Arc::new(registry));

    let err = runner.run(vec![command("orders", "find", vec![])]).unwrap_err();
    match err {
        Error::Reducer { detail } => assert_eq!(detail, json!("wildcard")),
        other => panic!("expected Reducer error, got {other:?}"),
    }
}

#[test]
fn unmatched_target_runs_without_hooks() {
    let mut registry = ReducerRegistry::new();
    registry.register("shop:*", |_cmd, _col| ReducerResult::reject(json!("no")));

    let store = Arc::new(MemoryStore::new());
    let runner = Runner::new(store, Arc::new(PipelineConfig::new()))
        .with_reducers(Arc::new(registry));

    runner
        .run(vec![command("inventory", "find", vec![])])
        .unwrap();
}

#[test]
fn error_result_stops_the_batch() {
    let mut registry = ReducerRegistry::new();
    registry.register("*:orders", |_cmd, _col| {
        ReducerResult::reject(json!({"code": "blocked"}))
    });

    let store = Arc::new(MemoryStore::new());
    seed_orders(&store);
    let runner = Runner::new(store.clone(), Arc::new(PipelineConfig::new()))
        .with_reducers(Arc::new(registry));

    let err = runner
        .run(vec![
            command("orders", "deleteOne", vec![json!({"item": "mug"})]),
            command("orders", "find", vec![]),
        ])
        .unwrap_err();

    assert!(matches!(err, Error::Reducer { .. }));
    // the rejected mutation never reached the store
    assert_eq!(store.documents("test", "orders").len(), 2);
}

#[test]
fn reducer_error_body_is_flagged() {
    let err = Error::Reducer {
        detail: json!("nope"),
    };
    assert_eq!(err.to_body(), json!({"error": "nope", "isReducer": true}));
}

#[test]
fn rewrite_patch_replaces_named_fields_only() {
    let mut registry = ReducerRegistry::new();
    registry.register("*:orders", |_cmd, _col| {
        ReducerResult::rewrite(CommandPatch {
            col: Some("archive".to_string()),
            args: Some(vec![json!({"item": "mug"})]),
            ..Default::default()
        })
    });

    let store = Arc::new(MemoryStore::new());
    store.seed("test", "archive", vec![json!({"item": "mug", "state": "old"})]);
    let runner = Runner::new(store, Arc::new(PipelineConfig::new()))
        .with_reducers(Arc::new(registry));

    // method was not patched, so findOne still runs, now against archive
    let outcome = runner
        .run(vec![command("orders", "findOne", vec![json!({"item": "pen"})])])
        .unwrap();

    match outcome {
        Output::Document(doc) => assert_eq!(doc["state"], json!("old")),
        other => panic!("expected a document, got {other:?}"),
    }
}

#[test]
fn patched_method_drives_dispatch_and_locker() {
    let mut registry = ReducerRegistry::new();
    registry.register("*:orders", |_cmd, _col| {
        ReducerResult::rewrite(CommandPatch {
            method: Some(Operation::Find),
            args: Some(vec![]),
            ..Default::default()
        })
    });

    let store = Arc::new(MemoryStore::new());
    seed_orders(&store);
    // a locker that would reject the original update
    let config = PipelineConfig::new().locker("orders", crate::config::LockerRule::new().path("never"));
    let runner = Runner::new(store, Arc::new(config)).with_reducers(Arc::new(registry));

    // the patch downgrades the update to a find, so the locker is skipped
    let outcome = runner
        .run(vec![command(
            "orders",
            "updateOne",
            vec![json!({}), json!({"$set": {"x": 1}})],
        )])
        .unwrap();
    assert!(matches!(outcome, Output::List(items) if items.len() == 2));
}

#[test]
fn hook_sees_transformed_args_and_can_query() {
    let mut registry = ReducerRegistry::new();
    registry.register("*:orders", |cmd, col| {
        // transforms ran before the hook
        assert_eq!(cmd.args[0]["_id"], json!({"$oid": "507f1f77bcf86cd799439011"}));
        // the handle reaches the bound collection
        let found = col.execute(Operation::FindOne, &cmd.args).unwrap();
        assert_eq!(found["item"], json!("mug"));
        ReducerResult::pass()
    });

    let store = Arc::new(MemoryStore::new());
    seed_orders(&store);
    let runner = Runner::new(store, Arc::new(PipelineConfig::new()))
        .with_reducers(Arc::new(registry));

    let mut cmd = command(
        "orders",
        "findOne",
        vec![json!({"_id": "507f1f77bcf86cd799439011"})],
    );
    cmd.args_object_id = Some(json!(["0._id"]));
    runner.run(vec![cmd]).unwrap();
}
