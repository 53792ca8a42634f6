use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of control a parameter is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
  ImageLayer,
  MaskLayer,
  NumberInt,
}

/// A user-entered parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
  Int(i64),
  /// Reference to a document layer.
  Layer(String),
}

impl ParamValue {
  /// Read a stored value. Anything other than an `i64` or a string has no
  /// parameter kind and reads as the absent value.
  pub fn from_json(value: &Value) -> Option<Self> {
    match value {
      Value::Number(n) => n.as_i64().map(ParamValue::Int),
      Value::String(s) => Some(ParamValue::Layer(s.clone())),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      ParamValue::Int(i) => Some(*i),
      ParamValue::Layer(_) => None,
    }
  }
}

/// Current parameter values keyed by parameter name, in schema order.
/// `None` is the absent value.
pub type Params = IndexMap<String, Option<ParamValue>>;

/// Schema entry for one parameter of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
  pub kind: ParamKind,
  pub name: String,
  pub default: Option<ParamValue>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max: Option<i64>,
}

impl ParamDescriptor {
  pub fn image_layer(name: impl Into<String>) -> Self {
    Self::layer(ParamKind::ImageLayer, name)
  }

  pub fn mask_layer(name: impl Into<String>) -> Self {
    Self::layer(ParamKind::MaskLayer, name)
  }

  pub fn number_int(name: impl Into<String>, default: i64, min: i64, max: i64) -> Self {
    Self {
      kind: ParamKind::NumberInt,
      name: name.into(),
      default: Some(ParamValue::Int(default)),
      min: Some(min),
      max: Some(max),
    }
  }

  fn layer(kind: ParamKind, name: impl Into<String>) -> Self {
    Self {
      kind,
      name: name.into(),
      default: None,
      min: None,
      max: None,
    }
  }
}
