use std::collections::HashSet;
use std::sync::Arc;

use fresco_collection::{Collection, CollectionEvent, Notifier};
use fresco_workflow::{
  Graph, Origin, ParamDescriptor, ParamValue, Params, Workflow, coerce, extract,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::WorkspaceError;
use crate::events::WorkspaceEvent;
use crate::state::WorkspaceState;

/// The currently selected custom workflow and its parameter values.
///
/// The workspace does not own the collection. Every operation that depends on
/// it takes the collection as an argument, and the owner feeds collection
/// events back through [`Workspace::handle_event`].
#[derive(Default)]
pub struct Workspace {
  workflow_id: String,
  workflow: Option<Workflow>,
  graph: Option<Graph>,
  metadata: Vec<ParamDescriptor>,
  params: Params,
  notifiers: Vec<Arc<dyn Notifier<WorkspaceEvent>>>,
}

impl Workspace {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe(&mut self, notifier: Arc<dyn Notifier<WorkspaceEvent>>) {
    self.notifiers.push(notifier);
  }

  /// Select the first workflow of the collection if nothing is selected.
  pub fn select_default(&mut self, collection: &Collection) -> Result<(), WorkspaceError> {
    if !self.workflow_id.is_empty() {
      return Ok(());
    }
    match collection.by_position(0) {
      Some(first) => {
        let id = first.id.clone();
        debug!(workflow_id = %id, "selecting default workflow");
        self.select(collection, &id)
      }
      None => Ok(()),
    }
  }

  /// Change the selected workflow.
  ///
  /// The id does not need to be registered yet; the workspace stays without
  /// an active workflow until it appears.
  pub fn select(&mut self, collection: &Collection, id: &str) -> Result<(), WorkspaceError> {
    if self.workflow_id == id {
      return Ok(());
    }
    info!(workflow_id = %id, "selecting workflow");
    self.workflow_id = id.to_string();
    self.emit(WorkspaceEvent::WorkflowIdChanged(self.workflow_id.clone()));
    self.emit(WorkspaceEvent::Modified {
      field: "workflow_id",
    });
    self.resolve(collection)
  }

  /// Re-derive the active graph, schema and parameter values for the selected id.
  ///
  /// On a parse error the error is returned. A workflow that was already
  /// active keeps its previous graph and schema; a newly selected one leaves
  /// the workspace without an active workflow. Parameter values are kept.
  pub fn resolve(&mut self, collection: &Collection) -> Result<(), WorkspaceError> {
    let Some(workflow) = collection.find(&self.workflow_id) else {
      debug!(workflow_id = %self.workflow_id, "selected workflow not registered");
      self.clear_active();
      return Ok(());
    };

    let graph = match workflow.resolve() {
      Ok(graph) => graph,
      Err(source) => {
        error!(workflow_id = %workflow.id, error = %source, "failed to resolve workflow graph");
        let was_active = self
          .workflow
          .as_ref()
          .is_some_and(|active| active.id == self.workflow_id);
        if !was_active {
          self.clear_active();
        }
        return Err(WorkspaceError::Graph {
          id: workflow.id.clone(),
          source,
        });
      }
    };

    let metadata = extract(&graph);
    warn_duplicates(&workflow.id, &metadata);
    let params = coerce(&self.params, &metadata);
    debug!(
      workflow_id = %workflow.id,
      nodes = graph.len(),
      params = metadata.len(),
      "resolved workflow"
    );

    self.workflow = Some(workflow.clone());
    self.graph = Some(graph);
    self.metadata = metadata;
    self.emit(WorkspaceEvent::GraphChanged(self.workflow_id.clone()));
    self.replace_params(params);
    Ok(())
  }

  fn clear_active(&mut self) {
    self.workflow = None;
    self.graph = None;
    self.metadata.clear();
  }

  /// Register the workflow embedded in the open document and make it active.
  ///
  /// A workflow already registered under `id` is selected as it is.
  pub fn bind_document_graph(
    &mut self,
    collection: &mut Collection,
    id: &str,
    graph: Value,
  ) -> Result<(), WorkspaceError> {
    if collection.find(id).is_none() {
      let event = collection.upsert(Workflow::new(id, Origin::Document, graph));
      self.handle_event(collection, &event)?;
    }
    self.select(collection, id)
  }

  /// React to a change of the collection.
  pub fn handle_event(
    &mut self,
    collection: &Collection,
    event: &CollectionEvent,
  ) -> Result<(), WorkspaceError> {
    match event {
      CollectionEvent::Inserted { id, .. } if *id == self.workflow_id => self.resolve(collection),
      CollectionEvent::Inserted { .. } => self.select_default(collection),
      CollectionEvent::Changed { position, .. } => {
        let is_selected = collection
          .by_position(*position)
          .is_some_and(|w| w.id == self.workflow_id);
        if is_selected {
          self.resolve(collection)
        } else {
          Ok(())
        }
      }
    }
  }

  /// Store a value entered for a parameter of the active schema.
  pub fn set_param(
    &mut self,
    name: &str,
    value: Option<ParamValue>,
  ) -> Result<(), WorkspaceError> {
    if !self.metadata.iter().any(|p| p.name == name) {
      return Err(WorkspaceError::UnknownParam(name.to_string()));
    }
    let mut params = self.params.clone();
    params.insert(name.to_string(), value);
    self.replace_params(params);
    Ok(())
  }

  /// Capture the persisted state.
  pub fn state(&self) -> WorkspaceState {
    WorkspaceState {
      workflow_id: self.workflow_id.clone(),
      params: self.params.clone(),
    }
  }

  /// Restore persisted state and resolve it against the collection.
  ///
  /// A state without a workflow id keeps the current selection, or picks the
  /// default one, and coerces the restored values against it.
  pub fn restore(
    &mut self,
    collection: &Collection,
    state: WorkspaceState,
  ) -> Result<(), WorkspaceError> {
    self.params = state.params;
    if state.workflow_id.is_empty() && self.workflow_id.is_empty() {
      return self.select_default(collection);
    }
    if state.workflow_id.is_empty() || state.workflow_id == self.workflow_id {
      self.resolve(collection)
    } else {
      self.select(collection, &state.workflow_id)
    }
  }

  pub fn workflow_id(&self) -> &str {
    &self.workflow_id
  }

  pub fn workflow(&self) -> Option<&Workflow> {
    self.workflow.as_ref()
  }

  pub fn graph(&self) -> Option<&Graph> {
    self.graph.as_ref()
  }

  pub fn metadata(&self) -> &[ParamDescriptor] {
    &self.metadata
  }

  pub fn params(&self) -> &Params {
    &self.params
  }

  fn replace_params(&mut self, params: Params) {
    if params == self.params {
      return;
    }
    self.params = params;
    self.emit(WorkspaceEvent::ParamsChanged(self.params.clone()));
    self.emit(WorkspaceEvent::Modified { field: "params" });
  }

  pub(crate) fn emit(&self, event: WorkspaceEvent) {
    for notifier in &self.notifiers {
      notifier.notify(event.clone());
    }
  }
}

impl std::fmt::Debug for Workspace {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Workspace")
      .field("workflow_id", &self.workflow_id)
      .field("metadata", &self.metadata)
      .field("params", &self.params)
      .finish_non_exhaustive()
  }
}

fn warn_duplicates(workflow_id: &str, metadata: &[ParamDescriptor]) {
  let mut seen = HashSet::new();
  for param in metadata {
    if !seen.insert(param.name.as_str()) {
      warn!(
        workflow_id = %workflow_id,
        param = %param.name,
        "duplicate parameter name, the last declaration wins"
      );
    }
  }
}
