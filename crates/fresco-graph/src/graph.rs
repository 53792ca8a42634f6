use serde_json::Value;

use crate::error::GraphError;
use crate::input::InputValue;
use crate::node::Node;

/// Parsed node graph, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
  nodes: Vec<Node>,
}

impl Graph {
  pub fn new(nodes: Vec<Node>) -> Self {
    Self { nodes }
  }

  /// Parse a raw graph payload.
  pub fn parse(raw: &Value) -> Result<Self, GraphError> {
    let entries = raw.as_object().ok_or_else(|| {
      GraphError::Parse(format!("expected an object of nodes, got {}", kind(raw)))
    })?;

    let mut nodes = Vec::with_capacity(entries.len());
    for (id, body) in entries {
      nodes.push(parse_node(id, body)?);
    }
    Ok(Self { nodes })
  }

  pub fn node(&self, id: &str) -> Option<&Node> {
    self.nodes.iter().find(|n| n.id == id)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Node> {
    self.nodes.iter()
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}

impl<'a> IntoIterator for &'a Graph {
  type Item = &'a Node;
  type IntoIter = std::slice::Iter<'a, Node>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

fn parse_node(id: &str, body: &Value) -> Result<Node, GraphError> {
  let body = body
    .as_object()
    .ok_or_else(|| GraphError::node(id, format!("expected an object, got {}", kind(body))))?;

  let class_type = body
    .get("class_type")
    .and_then(Value::as_str)
    .ok_or_else(|| GraphError::node(id, "missing class_type"))?;

  let mut node = Node::new(id, class_type);
  match body.get("inputs") {
    None | Some(Value::Null) => {}
    Some(Value::Object(inputs)) => {
      for (key, value) in inputs {
        node.set_input(key.clone(), InputValue::from(value));
      }
    }
    Some(other) => {
      return Err(GraphError::node(
        id,
        format!("inputs must be an object, got {}", kind(other)),
      ));
    }
  }
  Ok(node)
}

fn kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
