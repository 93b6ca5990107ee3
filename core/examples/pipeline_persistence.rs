// rorqual/examples/pipeline_persistence.rs

use rorqual::{
  Entity, EntityManager, EntityManagers, GlobalConfig, Pipeline, PipelineRepository, Repository, RepositoryManager,
  RorqualError, SharedConfig, SubscriberRegistry, Task, TaskManager,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Pipeline Persistence Example ---");

  // 1. Shared collaborators: tasks, subscriber callbacks and the storage root.
  let storage_root = std::env::temp_dir().join("rorqual_example");
  let config = SharedConfig::new(GlobalConfig::new(&storage_root));
  let tasks = Arc::new(TaskManager::new());
  let subscribers = Arc::new(SubscriberRegistry::new());

  let extract = Task::new("extract");
  let load = Task::new("load");
  let (extract_id, load_id) = (extract.id().to_string(), load.id().to_string());
  tasks.set(extract)?;
  tasks.set(load)?;

  let on_change = subscribers.register("example", "log_change", |p: &Pipeline| {
    info!(pipeline_id = p.id(), "Pipeline changed.");
    Ok(())
  });

  // 2. The repository and the manager that saves through it.
  let repository = Arc::new(PipelineRepository::new(
    tasks.clone(),
    subscribers.clone(),
    Arc::new(config.clone()),
  ));
  let managers = EntityManagers::new();
  managers.register_manager::<Pipeline, _>(Pipeline::MANAGER_NAME, Arc::new(RepositoryManager::new(repository.clone())));
  managers.register_manager::<Task, _>(Task::MANAGER_NAME, tasks.clone());

  // 3. Build a pipeline and edit it; the final state is saved once, on exit.
  let first_task = tasks.get(&extract_id).ok_or("extract task missing")?;
  let mut pipeline = Pipeline::new("etl", BTreeMap::new(), vec![first_task]).with_subscribers(vec![on_change]);
  pipeline.edit(&managers, |p| {
    let second_task = tasks.get(&load_id).ok_or_else(|| RorqualError::MissingTask {
      task_id: load_id.clone(),
    })?;
    p.add_task(second_task);
    p.set_property("schedule", "nightly");
    Ok::<_, RorqualError>(())
  })?;
  pipeline.notify_subscribers()?;

  // 4. Load it back.
  let loaded = repository.load(pipeline.id())?;
  info!(tasks = ?loaded.task_ids().collect::<Vec<_>>(), "Reloaded pipeline.");
  assert_eq!(loaded, pipeline);

  // 5. A dangling task reference is reported on load.
  tasks.delete(&load_id);
  match repository.load(pipeline.id()) {
    Err(RorqualError::MissingTask { task_id }) => info!(task_id = %task_id, "Load rejected as expected."),
    other => error!("Unexpected outcome: {:?}", other),
  }

  repository.delete(pipeline.id())?;
  Ok(())
}
