use std::mem::discriminant;

use crate::params::{ParamDescriptor, ParamValue, Params};

/// Reconcile current values with a parameter schema.
///
/// The result holds exactly the schema's names. A stored value is kept if it
/// has the same kind as the descriptor's default, otherwise the default is
/// used. When two descriptors share a name the later one decides.
pub fn coerce(current: &Params, schema: &[ParamDescriptor]) -> Params {
  let mut result = Params::with_capacity(schema.len());
  for param in schema {
    let value = match current.get(&param.name) {
      Some(stored) if same_kind(stored.as_ref(), param.default.as_ref()) => stored.clone(),
      _ => param.default.clone(),
    };
    result.insert(param.name.clone(), value);
  }
  result
}

fn same_kind(a: Option<&ParamValue>, b: Option<&ParamValue>) -> bool {
  match (a, b) {
    (Some(a), Some(b)) => discriminant(a) == discriminant(b),
    (None, None) => true,
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn steps_schema() -> Vec<ParamDescriptor> {
    vec![ParamDescriptor::number_int("Steps", 20, 1, 100)]
  }

  fn params(entries: &[(&str, Option<ParamValue>)]) -> Params {
    entries
      .iter()
      .map(|(k, v)| (k.to_string(), v.clone()))
      .collect()
  }

  #[test]
  fn test_keeps_matching_and_drops_unknown() {
    let current = params(&[
      ("Steps", Some(ParamValue::Int(5))),
      ("Extra", Some(ParamValue::Layer("x".to_string()))),
    ]);
    let result = coerce(&current, &steps_schema());
    assert_eq!(result, params(&[("Steps", Some(ParamValue::Int(5)))]));
  }

  #[test]
  fn test_kind_mismatch_uses_default() {
    let current = params(&[("Steps", Some(ParamValue::Layer("five".to_string())))]);
    let result = coerce(&current, &steps_schema());
    assert_eq!(result, params(&[("Steps", Some(ParamValue::Int(20)))]));
  }

  #[test]
  fn test_missing_and_null_use_default() {
    assert_eq!(
      coerce(&Params::new(), &steps_schema()),
      params(&[("Steps", Some(ParamValue::Int(20)))])
    );
    assert_eq!(
      coerce(&params(&[("Steps", None)]), &steps_schema()),
      params(&[("Steps", Some(ParamValue::Int(20)))])
    );
  }

  #[test]
  fn test_layers_reset_to_absent() {
    let schema = vec![ParamDescriptor::image_layer("Image")];
    let current = params(&[("Image", Some(ParamValue::Layer("layer-1".to_string())))]);
    assert_eq!(coerce(&current, &schema), params(&[("Image", None)]));
  }

  #[test]
  fn test_out_of_range_values_are_kept() {
    let current = params(&[("Steps", Some(ParamValue::Int(1000)))]);
    let result = coerce(&current, &steps_schema());
    assert_eq!(result["Steps"], Some(ParamValue::Int(1000)));
  }

  #[test]
  fn test_duplicate_names_last_wins() {
    let schema = vec![
      ParamDescriptor::number_int("Seed", 1, 0, 10),
      ParamDescriptor::image_layer("Seed"),
    ];
    let current = params(&[("Seed", Some(ParamValue::Int(3)))]);
    assert_eq!(coerce(&current, &schema), params(&[("Seed", None)]));
  }

  #[test]
  fn test_output_follows_schema_order() {
    let schema = vec![
      ParamDescriptor::number_int("B", 0, 0, 1),
      ParamDescriptor::number_int("A", 0, 0, 1),
    ];
    let current = params(&[("A", Some(ParamValue::Int(1))), ("B", Some(ParamValue::Int(1)))]);
    let coerced = coerce(&current, &schema);
    let keys: Vec<&str> = coerced.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["B", "A"]);
  }
}
