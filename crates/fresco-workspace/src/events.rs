use fresco_workflow::Params;
use serde::Serialize;

/// Events emitted by the [`Workspace`](crate::Workspace).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WorkspaceEvent {
  /// A different workflow id was selected.
  WorkflowIdChanged(String),

  /// The active workflow's graph, and with it the parameter schema, was re-derived.
  GraphChanged(String),

  /// Parameter values changed, by coercion or by the user.
  ParamsChanged(Params),

  /// A persisted field changed; the host should save the workspace state.
  Modified { field: &'static str },

  /// The selected workflow's graph could not be resolved.
  ResolveFailed { id: String, error: String },
}
