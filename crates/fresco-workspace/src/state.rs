use fresco_workflow::{ParamValue, Params};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The persisted part of a workspace: selection and entered parameter values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceState {
  #[serde(default)]
  pub workflow_id: String,
  #[serde(default, deserialize_with = "lenient_params")]
  pub params: Params,
}

/// Values of a kind no parameter takes (floats, booleans, out of range
/// integers) load as absent instead of failing the whole state.
fn lenient_params<'de, D>(deserializer: D) -> Result<Params, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
  Ok(
    raw
      .into_iter()
      .map(|(name, value)| {
        let value = ParamValue::from_json(&value);
        (name, value)
      })
      .collect(),
  )
}

impl WorkspaceState {
  pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(content)
  }

  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}
