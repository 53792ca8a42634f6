use std::cmp::Ordering;

use fresco_workflow::Workflow;

use crate::collection::Collection;

/// Display ordering over a [`Collection`].
///
/// Workflows are ordered by origin (document, remote, local), then by name
/// ignoring case. The view borrows the collection, so it always reflects the
/// contents it was created from; create a new one after the collection changes.
#[derive(Debug, Clone)]
pub struct SortedView<'a> {
  collection: &'a Collection,
  order: Vec<usize>,
}

impl<'a> SortedView<'a> {
  pub fn new(collection: &'a Collection) -> Self {
    let mut order: Vec<usize> = (0..collection.len()).collect();
    order.sort_by(|&l, &r| {
      let by_workflow = match (collection.by_position(l), collection.by_position(r)) {
        (Some(left), Some(right)) => compare(left, right),
        _ => Ordering::Equal,
      };
      by_workflow.then(l.cmp(&r))
    });
    Self { collection, order }
  }

  /// Collection position of the workflow shown at `index`.
  pub fn map_to_source(&self, index: usize) -> Option<usize> {
    self.order.get(index).copied()
  }

  /// Sorted index of the workflow at collection `position`.
  pub fn map_from_source(&self, position: usize) -> Option<usize> {
    self.order.iter().position(|&p| p == position)
  }

  pub fn get(&self, index: usize) -> Option<&'a Workflow> {
    self
      .map_to_source(index)
      .and_then(|p| self.collection.by_position(p))
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &'a Workflow> + '_ {
    self
      .order
      .iter()
      .filter_map(|&p| self.collection.by_position(p))
  }
}

/// Ordering used by [`SortedView`].
pub fn compare(left: &Workflow, right: &Workflow) -> Ordering {
  left
    .origin
    .value()
    .cmp(&right.origin.value())
    .then_with(|| {
      left
        .name()
        .to_lowercase()
        .cmp(&right.name().to_lowercase())
    })
    .then_with(|| left.name().cmp(right.name()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use fresco_workflow::Origin;
  use serde_json::json;

  fn collection(entries: &[(&str, Origin)]) -> Collection {
    let mut collection = Collection::new();
    for (id, origin) in entries {
      collection.upsert(Workflow::new(*id, *origin, json!({})));
    }
    collection
  }

  fn names(view: &SortedView<'_>) -> Vec<String> {
    view
      .iter()
      .map(|w| format!("{}:{}", w.origin, w.name()))
      .collect()
  }

  #[test]
  fn test_origin_then_name() {
    let collection = collection(&[
      ("b", Origin::Local),
      ("a", Origin::Remote),
      ("z", Origin::Document),
    ]);
    let view = collection.sorted();
    assert_eq!(names(&view), vec!["document:z", "remote:a", "local:b"]);
  }

  #[test]
  fn test_name_ignores_case_and_suffix() {
    let collection = collection(&[
      ("beta.json", Origin::Remote),
      ("Alpha", Origin::Remote),
      ("alpha2", Origin::Remote),
      ("Gamma", Origin::Remote),
    ]);
    let view = collection.sorted();
    assert_eq!(
      names(&view),
      vec!["remote:Alpha", "remote:alpha2", "remote:beta", "remote:Gamma"]
    );
  }

  #[test]
  fn test_position_mapping() {
    let collection = collection(&[
      ("local", Origin::Local),
      ("doc", Origin::Document),
      ("remote", Origin::Remote),
    ]);
    let view = collection.sorted();
    assert_eq!(view.len(), 3);
    assert_eq!(view.map_to_source(0), Some(1));
    assert_eq!(view.map_to_source(2), Some(0));
    assert_eq!(view.map_from_source(2), Some(1));
    assert_eq!(view.get(0).unwrap().id, "doc");
    assert_eq!(view.get(3), None);
  }

  #[test]
  fn test_view_does_not_reorder_collection() {
    let collection = collection(&[("b", Origin::Local), ("a", Origin::Local)]);
    let _view = collection.sorted();
    assert_eq!(collection.by_position(0).unwrap().id, "b");
  }
}
