// rorqual/src/pipeline/repository.rs

//! `PipelineRepository`: converts pipelines to `PipelineModel` records and back.
//!
//! Loading resolves every stored task id against the task registry and every
//! subscriber descriptor against the subscriber registry. Two failures are kept
//! apart on purpose:
//!  - a task id the registry does not know is reported as `MissingTask`, as is;
//!  - a record missing one of its own required fields is reported as
//!    `NonExistingPipeline` for the record's id, with the missing field kept
//!    in the error's `reason`.

use crate::config::ConfigProvider;
use crate::core::entity::Entity;
use crate::error::{NonExistingReason, RorqualError, RorqualResult};
use crate::pipeline::definition::Pipeline;
use crate::pipeline::model::PipelineModel;
use crate::repository::Repository;
use crate::subscriber::SubscriberRegistry;
use crate::task::{Task, TaskId, TaskRegistry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Failure while rebuilding a pipeline, before it is mapped to a `RorqualError`.
enum ConversionError {
  MissingField(&'static str),
  Failed(RorqualError),
}

impl From<RorqualError> for ConversionError {
  fn from(err: RorqualError) -> Self {
    ConversionError::Failed(err)
  }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ConversionError> {
  value.ok_or(ConversionError::MissingField(field))
}

pub struct PipelineRepository {
  tasks: Arc<dyn TaskRegistry>,
  subscribers: Arc<SubscriberRegistry>,
  config: Arc<dyn ConfigProvider>,
}

impl PipelineRepository {
  pub fn new(
    tasks: Arc<dyn TaskRegistry>,
    subscribers: Arc<SubscriberRegistry>,
    config: Arc<dyn ConfigProvider>,
  ) -> Self {
    Self {
      tasks,
      subscribers,
      config,
    }
  }

  /// Resolves `task_ids` in order. The first unknown id aborts the whole resolution.
  fn to_tasks(&self, task_ids: &[TaskId]) -> RorqualResult<Vec<Arc<Task>>> {
    let mut tasks = Vec::with_capacity(task_ids.len());
    for task_id in task_ids {
      match self.tasks.get(task_id) {
        Some(task) => tasks.push(task),
        None => {
          event!(Level::ERROR, task_id = %task_id, "Referenced task does not exist.");
          return Err(RorqualError::MissingTask {
            task_id: task_id.clone(),
          });
        }
      }
    }
    Ok(tasks)
  }

  fn build(&self, model: PipelineModel) -> Result<Pipeline, ConversionError> {
    let task_ids = required(model.tasks, "tasks")?;
    let tasks = self.to_tasks(&task_ids)?;

    let config_id = required(model.config_id, "config_id")?;
    let properties = required(model.properties, "properties")?;
    let subscribers = required(model.subscribers, "subscribers")?
      .iter()
      .map(|descriptor| self.subscribers.resolve(descriptor))
      .collect::<RorqualResult<Vec<_>>>()?;

    Ok(
      Pipeline::with_id(model.id, config_id, properties, tasks)
        .with_parent_id(model.parent_id)
        .with_subscribers(subscribers),
    )
  }
}

impl Repository for PipelineRepository {
  type Model = PipelineModel;
  type Entity = Pipeline;

  const DIR_NAME: &'static str = "pipelines";

  fn to_model(&self, pipeline: &Pipeline) -> PipelineModel {
    PipelineModel {
      id: pipeline.id().to_string(),
      parent_id: pipeline.parent_id().map(str::to_string),
      config_id: Some(pipeline.config_id().to_string()),
      properties: Some(pipeline.properties().clone()),
      tasks: Some(pipeline.task_ids().map(str::to_string).collect()),
      subscribers: Some(pipeline.subscriber_descriptors().cloned().collect()),
    }
  }

  #[instrument(
    name = "PipelineRepository::from_model",
    skip_all,
    fields(pipeline_id = %model.id),
    err(Display)
  )]
  fn from_model(&self, model: PipelineModel) -> RorqualResult<Pipeline> {
    let pipeline_id = model.id.clone();
    match self.build(model) {
      Ok(pipeline) => Ok(pipeline),
      Err(ConversionError::Failed(err)) => Err(err),
      Err(ConversionError::MissingField(field)) => {
        event!(Level::WARN, field, "Pipeline record is missing a required field.");
        Err(RorqualError::NonExistingPipeline {
          pipeline_id,
          reason: NonExistingReason::MissingField(field),
        })
      }
    }
  }

  fn model_id(model: &PipelineModel) -> &str {
    &model.id
  }

  fn storage_folder(&self) -> PathBuf {
    self.config.storage_folder()
  }
}
