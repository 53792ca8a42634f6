use fresco_workflow::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
  /// The graph of the selected workflow could not be parsed.
  #[error("workflow {id} has an invalid graph: {source}")]
  Graph {
    id: String,
    #[source]
    source: GraphError,
  },

  /// The parameter is not part of the active workflow's schema.
  #[error("unknown parameter: {0}")]
  UnknownParam(String),

  /// The session event loop is no longer running.
  #[error("workflow session closed")]
  SessionClosed,
}
