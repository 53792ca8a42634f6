use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
  #[error("invalid graph: {0}")]
  Parse(String),

  #[error("node {node_id}: {message}")]
  InvalidNode { node_id: String, message: String },
}

impl GraphError {
  pub(crate) fn node(node_id: &str, message: impl Into<String>) -> Self {
    Self::InvalidNode {
      node_id: node_id.to_string(),
      message: message.into(),
    }
  }
}
