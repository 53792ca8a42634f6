//! Serial event loop around the collection and the workspace.
//!
//! Collaborators never touch the [`Collection`] or [`Workspace`] directly
//! once the session runs. Backend notifications, document bindings and UI
//! requests are sent as [`Command`]s through a [`SessionHandle`] and handled
//! one at a time, so the workspace's reaction to a collection change always
//! completes before the next command is read.

use std::sync::Arc;

use fresco_collection::{Backend, Collection, CollectionEvent, Notifier};
use fresco_workflow::{Origin, ParamDescriptor, ParamValue};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::WorkspaceError;
use crate::events::WorkspaceEvent;
use crate::state::WorkspaceState;
use crate::workspace::Workspace;

type Reply<T> = oneshot::Sender<Result<T, WorkspaceError>>;

/// Requests handled by the session loop.
#[derive(Debug)]
pub enum Command {
  /// The backend published (or republished) the workflow with this id.
  RemotePublished(String),
  Select {
    id: String,
    reply: Reply<()>,
  },
  BindDocument {
    id: String,
    graph: Value,
    reply: Reply<()>,
  },
  SetParam {
    name: String,
    value: Option<ParamValue>,
    reply: Reply<()>,
  },
  Snapshot {
    reply: oneshot::Sender<SessionSnapshot>,
  },
}

/// One row of the workflow list, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowSummary {
  pub id: String,
  pub name: String,
  pub origin: Origin,
}

/// Read-only copy of the session state for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
  pub workflows: Vec<WorkflowSummary>,
  pub state: WorkspaceState,
  pub metadata: Vec<ParamDescriptor>,
}

/// Owns the collection and workspace and processes commands in arrival order.
pub struct Session {
  sender: mpsc::Sender<Command>,
  receiver: mpsc::Receiver<Command>,
  collection: Collection,
  workspace: Workspace,
  backend: Arc<dyn Backend>,
}

impl Session {
  /// Create a session over a loaded collection.
  ///
  /// The first workflow of the collection is selected if there is one.
  pub fn new(collection: Collection, backend: Arc<dyn Backend>) -> Self {
    Self::with_buffer_size(collection, backend, 100)
  }

  pub fn with_buffer_size(
    collection: Collection,
    backend: Arc<dyn Backend>,
    buffer_size: usize,
  ) -> Self {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let mut session = Self {
      sender,
      receiver,
      collection,
      workspace: Workspace::new(),
      backend,
    };
    if let Err(e) = session.workspace.select_default(&session.collection) {
      session.report(&e);
    }
    session
  }

  /// Get a handle for sending commands.
  ///
  /// This can be given to the backend connection, the document and the UI.
  pub fn handle(&self) -> SessionHandle {
    SessionHandle {
      sender: self.sender.clone(),
    }
  }

  pub fn subscribe_collection(&mut self, notifier: Arc<dyn Notifier<CollectionEvent>>) {
    self.collection.subscribe(notifier);
  }

  pub fn subscribe_workspace(&mut self, notifier: Arc<dyn Notifier<WorkspaceEvent>>) {
    self.workspace.subscribe(notifier);
  }

  /// Restore persisted workspace state before the loop starts.
  pub fn restore(&mut self, state: WorkspaceState) -> Result<(), WorkspaceError> {
    self.workspace.restore(&self.collection, state)
  }

  pub fn collection(&self) -> &Collection {
    &self.collection
  }

  pub fn workspace(&self) -> &Workspace {
    &self.workspace
  }

  /// Run the command loop until the cancellation token is triggered.
  ///
  /// Returns the session so the caller can persist its final state.
  pub async fn start(mut self, cancel: CancellationToken) -> Self {
    info!(workflows = self.collection.len(), "starting workflow session");

    loop {
      tokio::select! {
          _ = cancel.cancelled() => {
              info!("workflow session cancelled");
              break;
          }
          command = self.receiver.recv() => {
              match command {
                  Some(command) => self.process(command),
                  None => break,
              }
          }
      }
    }

    self
  }

  /// Handle a single command to completion.
  pub fn process(&mut self, command: Command) {
    match command {
      Command::RemotePublished(id) => {
        debug!(workflow_id = %id, "remote workflow published");
        if let Some(event) = self.collection.ingest_remote(&id, self.backend.as_ref())
          && let Err(e) = self.workspace.handle_event(&self.collection, &event)
        {
          self.report(&e);
        }
      }
      Command::Select { id, reply } => {
        let result = self.workspace.select(&self.collection, &id);
        self.reply(reply, result);
      }
      Command::BindDocument { id, graph, reply } => {
        let result = self
          .workspace
          .bind_document_graph(&mut self.collection, &id, graph);
        self.reply(reply, result);
      }
      Command::SetParam { name, value, reply } => {
        let result = self.workspace.set_param(&name, value);
        let _ = reply.send(result);
      }
      Command::Snapshot { reply } => {
        let _ = reply.send(self.snapshot());
      }
    }
  }

  pub fn snapshot(&self) -> SessionSnapshot {
    let workflows = self
      .collection
      .sorted()
      .iter()
      .map(|w| WorkflowSummary {
        id: w.id.clone(),
        name: w.name().to_string(),
        origin: w.origin,
      })
      .collect();
    SessionSnapshot {
      workflows,
      state: self.workspace.state(),
      metadata: self.workspace.metadata().to_vec(),
    }
  }

  fn reply(&self, reply: Reply<()>, result: Result<(), WorkspaceError>) {
    if let Err(e) = &result {
      self.report(e);
    }
    // Requester may have stopped waiting
    let _ = reply.send(result);
  }

  /// Publish a resolution failure to workspace observers.
  fn report(&self, error: &WorkspaceError) {
    if let WorkspaceError::Graph { id, source } = error {
      error!(workflow_id = %id, error = %source, "workflow resolution failed");
      self.workspace.emit(WorkspaceEvent::ResolveFailed {
        id: id.clone(),
        error: source.to_string(),
      });
    }
  }
}

/// Cloneable sender side of a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
  sender: mpsc::Sender<Command>,
}

impl SessionHandle {
  /// Notify the session that the backend published a workflow.
  pub async fn publish_remote(&self, id: impl Into<String>) -> Result<(), WorkspaceError> {
    self.send(Command::RemotePublished(id.into())).await
  }

  pub async fn select(&self, id: impl Into<String>) -> Result<(), WorkspaceError> {
    let (reply, response) = oneshot::channel();
    self
      .send(Command::Select {
        id: id.into(),
        reply,
      })
      .await?;
    response.await.map_err(|_| WorkspaceError::SessionClosed)?
  }

  pub async fn bind_document_graph(
    &self,
    id: impl Into<String>,
    graph: Value,
  ) -> Result<(), WorkspaceError> {
    let (reply, response) = oneshot::channel();
    self
      .send(Command::BindDocument {
        id: id.into(),
        graph,
        reply,
      })
      .await?;
    response.await.map_err(|_| WorkspaceError::SessionClosed)?
  }

  pub async fn set_param(
    &self,
    name: impl Into<String>,
    value: Option<ParamValue>,
  ) -> Result<(), WorkspaceError> {
    let (reply, response) = oneshot::channel();
    self
      .send(Command::SetParam {
        name: name.into(),
        value,
        reply,
      })
      .await?;
    response.await.map_err(|_| WorkspaceError::SessionClosed)?
  }

  pub async fn snapshot(&self) -> Result<SessionSnapshot, WorkspaceError> {
    let (reply, response) = oneshot::channel();
    self.send(Command::Snapshot { reply }).await?;
    response.await.map_err(|_| WorkspaceError::SessionClosed)
  }

  async fn send(&self, command: Command) -> Result<(), WorkspaceError> {
    self
      .sender
      .send(command)
      .await
      .map_err(|_| WorkspaceError::SessionClosed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fresco_collection::MemoryBackend;
  use fresco_workflow::Workflow;
  use serde_json::json;

  fn session_with(ids: &[&str]) -> Session {
    let mut collection = Collection::new();
    for id in ids {
      collection.upsert(Workflow::new(*id, Origin::Remote, json!({})));
    }
    Session::new(collection, Arc::new(MemoryBackend::new()))
  }

  #[test]
  fn test_new_selects_first_workflow() {
    let session = session_with(&["b", "a"]);
    assert_eq!(session.workspace().workflow_id(), "b");
  }

  #[test]
  fn test_new_empty_collection() {
    let session = session_with(&[]);
    assert_eq!(session.workspace().workflow_id(), "");
  }

  #[test]
  fn test_snapshot_uses_display_order() {
    let mut session = session_with(&["zeta.json", "Alpha"]);
    let (reply, mut response) = oneshot::channel();
    session.process(Command::Snapshot { reply });

    let snapshot = response.try_recv().unwrap();
    let names: Vec<&str> = snapshot.workflows.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "zeta"]);
    assert_eq!(snapshot.state.workflow_id, "zeta.json");
  }

  #[tokio::test]
  async fn test_handle_fails_after_session_dropped() {
    let session = session_with(&["a"]);
    let handle = session.handle();
    drop(session);

    let err = handle.select("a").await.unwrap_err();
    assert!(matches!(err, WorkspaceError::SessionClosed));
  }
}
