// tests/pipeline_repository_tests.rs
mod common;

use common::*;
use rorqual::{
  Entity, NonExistingReason, Pipeline, PipelineModel, Repository, RorqualError, SubscriberDescriptor,
};
use serde_json::json;
use std::fs;
use std::sync::Arc;

#[test]
fn test_round_trip_preserves_every_field() {
  setup_tracing();
  let fx = Fixture::new();
  let task_a = fx.add_task("A");
  let task_b = fx.add_task("B");
  let on_change = fx.subscribers.register("pipelines.hooks", "on_change", |_p| Ok(()));

  let pipeline = Pipeline::with_id(
    "p1",
    "ingest",
    properties(&[("owner", json!("ops")), ("retries", json!(3))]),
    vec![task_a, task_b],
  )
  .with_parent_id(Some("SCENARIO_1".to_string()))
  .with_subscribers(vec![on_change]);

  let model = fx.repository.to_model(&pipeline);
  let rebuilt = fx.repository.from_model(model).expect("rebuild pipeline");

  assert_eq!(rebuilt, pipeline);
  assert_eq!(rebuilt.parent_id(), Some("SCENARIO_1"));
  assert_eq!(rebuilt.config_id(), "ingest");
  assert_eq!(rebuilt.properties()["retries"], json!(3));
  assert_eq!(
    rebuilt.subscriber_descriptors().cloned().collect::<Vec<_>>(),
    vec![SubscriberDescriptor::new("pipelines.hooks", "on_change")]
  );
}

#[test]
fn test_to_model_projects_tasks_to_ids_in_order() {
  setup_tracing();
  let fx = Fixture::new();
  let task_a = fx.add_task("A");
  let task_b = fx.add_task("B");
  let pipeline = pipeline_with_tasks("p1", vec![task_a.clone(), task_b.clone()]);

  let model = fx.repository.to_model(&pipeline);
  assert_eq!(model.id, "p1");
  assert_eq!(model.tasks, Some(vec!["A".to_string(), "B".to_string()]));
  assert_eq!(model.parent_id, None);
  assert_eq!(model.subscribers, Some(vec![]));

  let rebuilt = fx.repository.from_model(model).unwrap();
  assert_eq!(rebuilt.tasks().len(), 2);
  assert!(Arc::ptr_eq(&rebuilt.tasks()[0], &task_a));
  assert!(Arc::ptr_eq(&rebuilt.tasks()[1], &task_b));
}

#[test]
fn test_task_order_and_duplicates_are_preserved() {
  setup_tracing();
  let fx = Fixture::new();
  fx.add_task("A");
  fx.add_task("B");
  fx.add_task("C");

  let model = PipelineModel {
    id: "p_dup".to_string(),
    parent_id: None,
    config_id: Some("cfg".to_string()),
    properties: Some(Default::default()),
    tasks: Some(vec!["C".into(), "A".into(), "C".into(), "B".into()]),
    subscribers: Some(vec![]),
  };

  let rebuilt = fx.repository.from_model(model).unwrap();
  assert_eq!(rebuilt.task_ids().collect::<Vec<_>>(), vec!["C", "A", "C", "B"]);
}

#[test]
fn test_pipeline_without_tasks_is_valid() {
  setup_tracing();
  let fx = Fixture::new();
  let pipeline = pipeline_with_tasks("empty", vec![]);

  fx.repository.save(&pipeline).unwrap();
  let loaded = fx.repository.load("empty").unwrap();
  assert!(loaded.tasks().is_empty());
  assert_eq!(loaded, pipeline);
}

#[test]
fn test_dangling_task_reference_fails_with_missing_task() {
  setup_tracing();
  let fx = Fixture::new();
  fx.add_task("A");
  fx.add_task("C");

  let model = PipelineModel {
    id: "p_dangling".to_string(),
    parent_id: None,
    config_id: Some("cfg".to_string()),
    properties: Some(Default::default()),
    tasks: Some(vec!["A".into(), "B".into(), "C".into()]),
    subscribers: Some(vec![]),
  };

  match fx.repository.from_model(model) {
    Err(RorqualError::MissingTask { task_id }) => assert_eq!(task_id, "B"),
    other => panic!("Expected MissingTask(B), got {:?}", other),
  }
}

#[test]
fn test_missing_task_is_not_remapped_even_when_other_fields_are_missing() {
  setup_tracing();
  let fx = Fixture::new();

  let model = PipelineModel {
    id: "p_both".to_string(),
    parent_id: None,
    config_id: None,
    properties: None,
    tasks: Some(vec!["GONE".into()]),
    subscribers: None,
  };

  match fx.repository.from_model(model) {
    Err(RorqualError::MissingTask { task_id }) => assert_eq!(task_id, "GONE"),
    other => panic!("Expected MissingTask(GONE), got {:?}", other),
  }
}

#[test]
fn test_record_without_tasks_is_reported_as_non_existing_pipeline() {
  setup_tracing();
  let fx = Fixture::new();

  let model = PipelineModel {
    id: "p_corrupt".to_string(),
    parent_id: None,
    config_id: Some("cfg".to_string()),
    properties: Some(Default::default()),
    tasks: None,
    subscribers: Some(vec![]),
  };

  let err = fx.repository.from_model(model).unwrap_err();
  assert_eq!(err.to_string(), "Pipeline: p_corrupt does not exist.");
  match err {
    RorqualError::NonExistingPipeline { pipeline_id, reason } => {
      assert_eq!(pipeline_id, "p_corrupt");
      assert_eq!(reason, NonExistingReason::MissingField("tasks"));
    }
    other => panic!("Expected NonExistingPipeline, got {:?}", other),
  }
}

#[test]
fn test_legacy_record_on_disk_missing_config_id_is_remapped() {
  setup_tracing();
  let fx = Fixture::new();
  fx.add_task("A");

  let dir = fx.repository.directory();
  fs::create_dir_all(&dir).unwrap();
  fs::write(
    dir.join("p_legacy.json"),
    r#"{ "id": "p_legacy", "properties": {}, "tasks": ["A"], "subscribers": [] }"#,
  )
  .unwrap();

  match fx.repository.load("p_legacy") {
    Err(RorqualError::NonExistingPipeline { pipeline_id, reason }) => {
      assert_eq!(pipeline_id, "p_legacy");
      assert_eq!(reason, NonExistingReason::MissingField("config_id"));
    }
    other => panic!("Expected NonExistingPipeline, got {:?}", other),
  }
}

#[test]
fn test_unknown_subscriber_is_propagated_not_remapped() {
  setup_tracing();
  let fx = Fixture::new();

  let model = PipelineModel {
    id: "p_sub".to_string(),
    parent_id: None,
    config_id: Some("cfg".to_string()),
    properties: Some(Default::default()),
    tasks: Some(vec![]),
    subscribers: Some(vec![SubscriberDescriptor::new("old.module", "removed_fn")]),
  };

  match fx.repository.from_model(model) {
    Err(RorqualError::UnknownSubscriber { module, name }) => {
      assert_eq!(module, "old.module");
      assert_eq!(name, "removed_fn");
    }
    other => panic!("Expected UnknownSubscriber, got {:?}", other),
  }
}

#[test]
fn test_save_then_load_through_storage() {
  setup_tracing();
  let fx = Fixture::new();
  let task_a = fx.add_task("A");
  let task_b = fx.add_task("B");
  let pipeline = Pipeline::new("nightly", properties(&[("mode", json!("full"))]), vec![task_a, task_b]);
  assert!(pipeline.id().starts_with("PIPELINE_nightly_"));

  fx.repository.save(&pipeline).unwrap();
  assert!(fx.repository.exists(pipeline.id()));

  let loaded = fx.repository.load(pipeline.id()).unwrap();
  assert_eq!(loaded, pipeline);
  assert_eq!(loaded.task_ids().collect::<Vec<_>>(), vec!["A", "B"]);
  assert!(!loaded.is_in_context());
}

#[test]
fn test_load_fails_once_task_is_removed_from_registry() {
  setup_tracing();
  let fx = Fixture::new();
  let task_a = fx.add_task("A");
  let task_b = fx.add_task("B");
  fx.repository.save(&pipeline_with_tasks("p1", vec![task_a, task_b])).unwrap();

  fx.tasks.delete("B");

  match fx.repository.load("p1") {
    Err(RorqualError::MissingTask { task_id }) => assert_eq!(task_id, "B"),
    other => panic!("Expected MissingTask(B), got {:?}", other),
  }
}
