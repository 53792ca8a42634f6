use std::sync::RwLock;

use indexmap::IndexMap;
use serde_json::Value;

/// View of the workflows published by the compute backend.
///
/// The connection to the backend keeps this state current; the collection
/// reads a full snapshot once at startup and single entries whenever the
/// backend announces a published workflow.
pub trait Backend: Send + Sync {
  /// All currently published workflows, id to raw graph.
  fn workflows(&self) -> IndexMap<String, Value>;

  /// The current graph of one published workflow.
  fn workflow(&self, id: &str) -> Option<Value>;
}

/// In-process backend state.
#[derive(Debug, Default)]
pub struct MemoryBackend {
  workflows: RwLock<IndexMap<String, Value>>,
}

impl MemoryBackend {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_workflows(workflows: IndexMap<String, Value>) -> Self {
    Self {
      workflows: RwLock::new(workflows),
    }
  }

  /// Store a published workflow, replacing any previous graph for `id`.
  pub fn publish(&self, id: impl Into<String>, graph: Value) {
    let mut workflows = self.workflows.write().unwrap_or_else(|e| e.into_inner());
    workflows.insert(id.into(), graph);
  }
}

impl Backend for MemoryBackend {
  fn workflows(&self) -> IndexMap<String, Value> {
    self
      .workflows
      .read()
      .unwrap_or_else(|e| e.into_inner())
      .clone()
  }

  fn workflow(&self, id: &str) -> Option<Value> {
    self
      .workflows
      .read()
      .unwrap_or_else(|e| e.into_inner())
      .get(id)
      .cloned()
  }
}
