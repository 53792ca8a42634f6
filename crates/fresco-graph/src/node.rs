use crate::input::InputValue;

/// A single node of a parsed graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
  pub id: String,
  /// Node type tag as registered with the compute backend, e.g. "KSampler".
  pub class_type: String,
  inputs: Vec<(String, InputValue)>,
}

impl Node {
  pub fn new(id: impl Into<String>, class_type: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      class_type: class_type.into(),
      inputs: Vec::new(),
    }
  }

  pub fn with_input(mut self, key: impl Into<String>, value: impl Into<InputValue>) -> Self {
    self.set_input(key, value);
    self
  }

  pub fn set_input(&mut self, key: impl Into<String>, value: impl Into<InputValue>) {
    let key = key.into();
    let value = value.into();
    match self.inputs.iter_mut().find(|(k, _)| *k == key) {
      Some((_, existing)) => *existing = value,
      None => self.inputs.push((key, value)),
    }
  }

  /// Get the stored value for an input.
  pub fn input(&self, key: &str) -> Option<&InputValue> {
    self
      .inputs
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v)
  }

  /// Get the stored value for an input, or `default` if the node has none.
  pub fn input_or(&self, key: &str, default: impl Into<InputValue>) -> InputValue {
    self.input(key).cloned().unwrap_or_else(|| default.into())
  }

  /// String input, falling back to `default` when absent or not a string.
  pub fn input_str(&self, key: &str, default: &str) -> String {
    self
      .input(key)
      .and_then(InputValue::as_str)
      .unwrap_or(default)
      .to_string()
  }

  /// Integer input, falling back to `default` when absent or not an integer.
  pub fn input_int(&self, key: &str, default: i64) -> i64 {
    self
      .input(key)
      .and_then(InputValue::as_int)
      .unwrap_or(default)
  }

  pub fn inputs(&self) -> impl Iterator<Item = (&str, &InputValue)> {
    self.inputs.iter().map(|(k, v)| (k.as_str(), v))
  }
}
