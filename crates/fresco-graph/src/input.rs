//! Input values stored on graph nodes.
//!
//! The backend stores node inputs as plain JSON. Literal values become
//! typed variants; a two-element `[node_id, output_index]` array is a link
//! to another node's output. Anything else is kept as raw JSON.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
  Int(i64),
  Float(f64),
  Bool(bool),
  Str(String),
  /// Connection to output `output` of node `node`.
  Link { node: String, output: u32 },
  Json(Value),
}

impl InputValue {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      InputValue::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      InputValue::Int(i) => Some(*i),
      _ => None,
    }
  }

  pub fn is_link(&self) -> bool {
    matches!(self, InputValue::Link { .. })
  }

  pub fn to_json(&self) -> Value {
    match self {
      InputValue::Int(i) => Value::from(*i),
      InputValue::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
      InputValue::Bool(b) => Value::Bool(*b),
      InputValue::Str(s) => Value::String(s.clone()),
      InputValue::Link { node, output } => Value::Array(vec![
        Value::String(node.clone()),
        Value::from(*output),
      ]),
      InputValue::Json(v) => v.clone(),
    }
  }
}

impl From<&Value> for InputValue {
  fn from(value: &Value) -> Self {
    match value {
      Value::Bool(b) => InputValue::Bool(*b),
      Value::Number(n) => match n.as_i64() {
        Some(i) => InputValue::Int(i),
        None => InputValue::Float(n.as_f64().unwrap_or_default()),
      },
      Value::String(s) => InputValue::Str(s.clone()),
      Value::Array(items) => match items.as_slice() {
        [Value::String(node), Value::Number(output)] => {
          match output.as_u64().and_then(|o| u32::try_from(o).ok()) {
            Some(output) => InputValue::Link {
              node: node.clone(),
              output,
            },
            None => InputValue::Json(value.clone()),
          }
        }
        _ => InputValue::Json(value.clone()),
      },
      _ => InputValue::Json(value.clone()),
    }
  }
}

impl From<i64> for InputValue {
  fn from(value: i64) -> Self {
    InputValue::Int(value)
  }
}

impl From<i32> for InputValue {
  fn from(value: i32) -> Self {
    InputValue::Int(value.into())
  }
}

impl From<&str> for InputValue {
  fn from(value: &str) -> Self {
    InputValue::Str(value.to_string())
  }
}
