use std::path::{Path, PathBuf};
use std::sync::Arc;

use fresco_workflow::{Origin, Workflow};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::error::CollectionError;
use crate::events::{CollectionEvent, Notifier};
use crate::fs::LocalWorkflows;
use crate::sorted::SortedView;

/// A local file that was skipped during the initial load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
  pub path: PathBuf,
  pub error: String,
}

/// Outcome of [`Collection::load_initial`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
  /// Ids newly registered, in collection order. Each id appears once.
  pub loaded: Vec<String>,
  pub skipped: Vec<SkippedFile>,
}

impl LoadReport {
  fn record(&mut self, event: CollectionEvent) {
    if let CollectionEvent::Inserted { id, .. } = event {
      self.loaded.push(id);
    }
  }
}

/// Insertion-ordered registry of custom workflows, unique by id.
///
/// Positions are stable: a workflow keeps the position it was appended at,
/// and later registrations of the same id only replace its graph.
#[derive(Default)]
pub struct Collection {
  workflows: Vec<Workflow>,
  notifiers: Vec<Arc<dyn Notifier<CollectionEvent>>>,
}

impl Collection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register an observer for insert and change events.
  pub fn subscribe(&mut self, notifier: Arc<dyn Notifier<CollectionEvent>>) {
    self.notifiers.push(notifier);
  }

  /// Populate from the local workflow directory, then from the backend snapshot.
  ///
  /// Files that cannot be read or parsed are skipped and reported; they never
  /// abort the load.
  pub async fn load_initial(&mut self, directory: &Path, backend: &dyn Backend) -> LoadReport {
    let mut report = LoadReport::default();
    let local = LocalWorkflows::new(directory);

    let files = match local.list().await {
      Ok(files) => files,
      Err(e) => {
        warn!(path = %directory.display(), error = %e, "failed to list workflow directory");
        report.skipped.push(SkippedFile {
          path: directory.to_path_buf(),
          error: e.to_string(),
        });
        Vec::new()
      }
    };

    for path in files {
      match local.load(&path).await {
        Ok(workflow) => report.record(self.upsert(workflow)),
        Err(e) => {
          warn!(path = %path.display(), error = %e, "skipping workflow file");
          report.skipped.push(SkippedFile {
            path,
            error: e.to_string(),
          });
        }
      }
    }

    for (id, graph) in backend.workflows() {
      report.record(self.upsert(Workflow::new(id, Origin::Remote, graph)));
    }

    info!(
      directory = %directory.display(),
      workflows = self.len(),
      skipped = report.skipped.len(),
      "loaded workflow collection"
    );
    report
  }

  /// Merge a workflow the backend announced as published.
  ///
  /// The graph is read from the backend's current state. Returns `None` if
  /// the backend no longer knows the id.
  pub fn ingest_remote(&mut self, id: &str, backend: &dyn Backend) -> Option<CollectionEvent> {
    match backend.workflow(id) {
      Some(graph) => Some(self.upsert(Workflow::new(id, Origin::Remote, graph))),
      None => {
        warn!(workflow_id = %id, "published workflow missing from backend");
        None
      }
    }
  }

  /// Insert a new workflow or replace the graph of an existing one.
  ///
  /// An existing entry keeps its origin and source path.
  pub fn upsert(&mut self, workflow: Workflow) -> CollectionEvent {
    let event = match self.position(&workflow.id) {
      Some(position) => {
        debug!(workflow_id = %workflow.id, position, "updating workflow graph");
        self.set_graph(position, workflow.graph);
        CollectionEvent::Changed {
          position,
          id: workflow.id,
        }
      }
      None => {
        let position = self.workflows.len();
        debug!(
          workflow_id = %workflow.id,
          origin = %workflow.origin,
          position,
          "adding workflow"
        );
        let id = workflow.id.clone();
        self.workflows.push(workflow);
        CollectionEvent::Inserted { position, id }
      }
    };
    self.emit(&event);
    event
  }

  fn set_graph(&mut self, position: usize, graph: Value) {
    self.workflows[position].graph = graph;
  }

  fn emit(&self, event: &CollectionEvent) {
    for notifier in &self.notifiers {
      notifier.notify(event.clone());
    }
  }

  pub fn position(&self, id: &str) -> Option<usize> {
    self.workflows.iter().position(|w| w.id == id)
  }

  pub fn find(&self, id: &str) -> Option<&Workflow> {
    self.workflows.iter().find(|w| w.id == id)
  }

  pub fn get(&self, id: &str) -> Result<&Workflow, CollectionError> {
    self
      .find(id)
      .ok_or_else(|| CollectionError::NotFound(id.to_string()))
  }

  pub fn by_position(&self, position: usize) -> Option<&Workflow> {
    self.workflows.get(position)
  }

  pub fn len(&self) -> usize {
    self.workflows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.workflows.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Workflow> {
    self.workflows.iter()
  }

  pub fn ids(&self) -> impl Iterator<Item = &str> {
    self.workflows.iter().map(|w| w.id.as_str())
  }

  /// Display ordering over the current contents.
  pub fn sorted(&self) -> SortedView<'_> {
    SortedView::new(self)
  }
}

impl std::fmt::Debug for Collection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Collection")
      .field("workflows", &self.workflows)
      .field("notifiers", &self.notifiers.len())
      .finish()
  }
}

impl<'a> IntoIterator for &'a Collection {
  type Item = &'a Workflow;
  type IntoIter = std::slice::Iter<'a, Workflow>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
