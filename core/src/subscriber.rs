// rorqual/src/subscriber.rs

//! Named pipeline callbacks and the lookup table used to re-resolve them.
//!
//! A callback cannot be written to a record. Each one is registered under a
//! `{module, name}` descriptor; records store the descriptor and loading a
//! record looks the callback up again in a `SubscriberRegistry`.

use crate::error::{RorqualError, RorqualResult};
use crate::pipeline::definition::Pipeline;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};

/// Signature of a pipeline subscriber.
pub type SubscriberFn = Arc<dyn Fn(&Pipeline) -> anyhow::Result<()> + Send + Sync + 'static>;

/// Serializable address of a registered callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriberDescriptor {
  pub module: String,
  pub name: String,
}

impl SubscriberDescriptor {
  pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      module: module.into(),
      name: name.into(),
    }
  }
}

impl fmt::Display for SubscriberDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}::{}", self.module, self.name)
  }
}

/// A callback together with the descriptor it was registered under.
#[derive(Clone)]
pub struct Subscriber {
  descriptor: SubscriberDescriptor,
  callback: SubscriberFn,
}

impl Subscriber {
  pub fn descriptor(&self) -> &SubscriberDescriptor {
    &self.descriptor
  }

  pub(crate) fn call(&self, pipeline: &Pipeline) -> RorqualResult<()> {
    (self.callback)(pipeline).map_err(|source| RorqualError::SubscriberFailure {
      module: self.descriptor.module.clone(),
      name: self.descriptor.name.clone(),
      source,
    })
  }
}

// SubscriberFn doesn't implement Debug.
impl fmt::Debug for Subscriber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscriber")
      .field("descriptor", &self.descriptor)
      .finish_non_exhaustive()
  }
}

/// Lookup table of statically registered subscribers.
#[derive(Default)]
pub struct SubscriberRegistry {
  callbacks: RwLock<HashMap<SubscriberDescriptor, SubscriberFn>>,
}

impl SubscriberRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `callback` under `{module, name}` and returns a subscriber that
  /// can be attached to a pipeline. Re-registering a descriptor replaces its callback.
  pub fn register<F>(&self, module: impl Into<String>, name: impl Into<String>, callback: F) -> Subscriber
  where
    F: Fn(&Pipeline) -> anyhow::Result<()> + Send + Sync + 'static,
  {
    let descriptor = SubscriberDescriptor::new(module, name);
    let callback: SubscriberFn = Arc::new(callback);
    event!(Level::DEBUG, subscriber = %descriptor, "Registering subscriber.");
    self.callbacks.write().insert(descriptor.clone(), callback.clone());
    Subscriber { descriptor, callback }
  }

  pub fn resolve(&self, descriptor: &SubscriberDescriptor) -> RorqualResult<Subscriber> {
    let callback = self.callbacks.read().get(descriptor).cloned();
    match callback {
      Some(callback) => Ok(Subscriber {
        descriptor: descriptor.clone(),
        callback,
      }),
      None => {
        event!(Level::ERROR, subscriber = %descriptor, "Subscriber is not registered.");
        Err(RorqualError::UnknownSubscriber {
          module: descriptor.module.clone(),
          name: descriptor.name.clone(),
        })
      }
    }
  }

  pub fn contains(&self, descriptor: &SubscriberDescriptor) -> bool {
    self.callbacks.read().contains_key(descriptor)
  }

  pub fn len(&self) -> usize {
    self.callbacks.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.callbacks.read().is_empty()
  }
}
