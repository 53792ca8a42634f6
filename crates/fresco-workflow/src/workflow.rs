use std::path::PathBuf;

use fresco_graph::{Graph, GraphError};
use serde::{Deserialize, Serialize};

/// Where a workflow was registered from.
///
/// Variants are declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
  /// Embedded in the currently open document.
  Document,
  /// Published by the compute backend.
  Remote,
  /// A file in the local workflow directory.
  Local,
}

impl Origin {
  pub fn value(self) -> u8 {
    self as u8
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Origin::Document => "document",
      Origin::Remote => "remote",
      Origin::Local => "local",
    }
  }
}

impl std::fmt::Display for Origin {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A custom workflow registered with the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
  pub id: String,
  pub origin: Origin,
  /// Raw graph payload, parsed on demand by [`Workflow::resolve`].
  pub graph: serde_json::Value,
  /// Backing file, only set for [`Origin::Local`].
  #[serde(skip_serializing_if = "Option::is_none")]
  pub source_path: Option<PathBuf>,
}

impl Workflow {
  pub fn new(id: impl Into<String>, origin: Origin, graph: serde_json::Value) -> Self {
    Self {
      id: id.into(),
      origin,
      graph,
      source_path: None,
    }
  }

  pub fn local(id: impl Into<String>, graph: serde_json::Value, path: impl Into<PathBuf>) -> Self {
    Self {
      source_path: Some(path.into()),
      ..Self::new(id, Origin::Local, graph)
    }
  }

  /// Display name: the id without a trailing ".json".
  pub fn name(&self) -> &str {
    self.id.strip_suffix(".json").unwrap_or(&self.id)
  }

  /// Parse the raw graph payload.
  pub fn resolve(&self) -> Result<Graph, GraphError> {
    Graph::parse(&self.graph)
  }
}
