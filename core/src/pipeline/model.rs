// rorqual/src/pipeline/model.rs

use crate::pipeline::definition::PipelineId;
use crate::subscriber::SubscriberDescriptor;
use crate::task::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The stored form of a `Pipeline`.
///
/// Tasks are kept as ids and subscribers as descriptors. Only `id` is required
/// to decode; the other fields are always written but may be absent in
/// malformed or legacy records, which `PipelineRepository::from_model` reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineModel {
  pub id: PipelineId,
  pub parent_id: Option<String>,
  pub config_id: Option<String>,
  pub properties: Option<BTreeMap<String, Value>>,
  pub tasks: Option<Vec<TaskId>>,
  pub subscribers: Option<Vec<SubscriberDescriptor>>,
}
