//! Integration tests for the session loop driven through its handle.

use std::sync::Arc;

use fresco_collection::{ChannelNotifier, Collection, CollectionEvent, MemoryBackend};
use fresco_workflow::{
  IMAGE_LAYER_NODE, INT_PARAMETER_NODE, ParamDescriptor, ParamValue, Params,
};
use fresco_workspace::{Session, WorkspaceError, WorkspaceEvent, WorkspaceState};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

fn graph(steps_default: i64) -> Value {
  json!({
    "1": { "class_type": IMAGE_LAYER_NODE, "inputs": { "name": "Img" } },
    "2": { "class_type": INT_PARAMETER_NODE,
           "inputs": { "name": "Steps", "default": steps_default, "min": 1, "max": 100 } },
    "3": { "class_type": "KSampler", "inputs": { "steps": ["2", 0] } }
  })
}

fn start(session: Session) -> (CancellationToken, JoinHandle<Session>) {
  let cancel = CancellationToken::new();
  let handle = tokio::spawn(session.start(cancel.clone()));
  (cancel, handle)
}

#[tokio::test]
async fn test_first_published_workflow_is_selected() {
  let backend = Arc::new(MemoryBackend::new());
  let session = Session::new(Collection::new(), backend.clone());
  let handle = session.handle();
  let (cancel, task) = start(session);

  backend.publish("upscale", graph(20));
  handle.publish_remote("upscale").await.unwrap();

  let snapshot = handle.snapshot().await.unwrap();
  assert_eq!(snapshot.state.workflow_id, "upscale");
  assert_eq!(
    snapshot.metadata,
    vec![
      ParamDescriptor::image_layer("Img"),
      ParamDescriptor::number_int("Steps", 20, 1, 100),
    ]
  );

  cancel.cancel();
  let session = task.await.unwrap();
  assert_eq!(session.collection().len(), 1);
}

#[tokio::test]
async fn test_republished_graph_keeps_compatible_values() {
  let backend = Arc::new(MemoryBackend::new());
  backend.publish("upscale", graph(20));
  let mut collection = Collection::new();
  collection
    .load_initial(std::path::Path::new("/nonexistent/fresco"), backend.as_ref())
    .await;

  let session = Session::new(collection, backend.clone());
  let handle = session.handle();
  let (cancel, task) = start(session);

  handle
    .set_param("Steps", Some(ParamValue::Int(42)))
    .await
    .unwrap();

  backend.publish(
    "upscale",
    json!({ "9": { "class_type": INT_PARAMETER_NODE, "inputs": { "name": "Steps" } } }),
  );
  handle.publish_remote("upscale").await.unwrap();

  let snapshot = handle.snapshot().await.unwrap();
  let mut expected = Params::new();
  expected.insert("Steps".to_string(), Some(ParamValue::Int(42)));
  assert_eq!(snapshot.state.params, expected);

  cancel.cancel();
  task.await.unwrap();
}

#[tokio::test]
async fn test_document_graph_and_selection() {
  let backend = Arc::new(MemoryBackend::new());
  backend.publish("remote", graph(20));
  let mut collection = Collection::new();
  collection
    .load_initial(std::path::Path::new("/nonexistent/fresco"), backend.as_ref())
    .await;

  let (collection_events, mut collection_rx) = ChannelNotifier::<CollectionEvent>::channel();
  let mut session = Session::new(collection, backend);
  session.subscribe_collection(Arc::new(collection_events));
  let handle = session.handle();
  let (cancel, task) = start(session);

  handle.bind_document_graph("doc", graph(8)).await.unwrap();
  let snapshot = handle.snapshot().await.unwrap();
  assert_eq!(snapshot.state.workflow_id, "doc");
  assert_eq!(snapshot.workflows[0].id, "doc");
  assert_eq!(
    collection_rx.recv().await.unwrap(),
    CollectionEvent::Inserted {
      position: 1,
      id: "doc".to_string()
    }
  );

  handle.select("not-yet-published").await.unwrap();
  let snapshot = handle.snapshot().await.unwrap();
  assert_eq!(snapshot.state.workflow_id, "not-yet-published");
  assert!(snapshot.metadata.is_empty());

  let err = handle.set_param("Steps", Some(ParamValue::Int(1))).await;
  assert!(matches!(err, Err(WorkspaceError::UnknownParam(_))));

  cancel.cancel();
  let session = task.await.unwrap();
  assert!(session.workspace().workflow().is_none());
}

#[tokio::test]
async fn test_malformed_remote_graph_is_reported() {
  let backend = Arc::new(MemoryBackend::new());
  backend.publish("broken", graph(20));
  let mut collection = Collection::new();
  collection
    .load_initial(std::path::Path::new("/nonexistent/fresco"), backend.as_ref())
    .await;

  let (workspace_events, mut workspace_rx) = ChannelNotifier::<WorkspaceEvent>::channel();
  let mut session = Session::new(collection, backend.clone());
  session.subscribe_workspace(Arc::new(workspace_events));
  let handle = session.handle();
  let (cancel, task) = start(session);

  backend.publish("broken", json!("not a graph"));
  handle.publish_remote("broken").await.unwrap();
  // Snapshot round-trip guarantees the notification was processed.
  let snapshot = handle.snapshot().await.unwrap();
  assert_eq!(snapshot.metadata.len(), 2);

  let event = workspace_rx.recv().await.unwrap();
  assert!(matches!(event, WorkspaceEvent::ResolveFailed { ref id, .. } if id == "broken"));

  cancel.cancel();
  task.await.unwrap();
}

#[tokio::test]
async fn test_restore_and_capture_state() {
  let backend = Arc::new(MemoryBackend::new());
  backend.publish("a", graph(20));
  backend.publish("b", graph(20));
  let mut collection = Collection::new();
  collection
    .load_initial(std::path::Path::new("/nonexistent/fresco"), backend.as_ref())
    .await;

  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("workspace.json");
  std::fs::write(
    &path,
    r#"{ "workflow_id": "b", "params": { "Steps": 64, "Img": "layer-1", "Old": 3 } }"#,
  )
  .unwrap();
  let state = WorkspaceState::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();

  let mut session = Session::new(collection, backend);
  session.restore(state).unwrap();

  let saved = session.workspace().state();
  assert_eq!(saved.workflow_id, "b");
  let json: Value = serde_json::from_str(&saved.to_json().unwrap()).unwrap();
  assert_eq!(json["params"], json!({ "Img": null, "Steps": 64 }));
}

#[tokio::test]
async fn test_restore_without_id_coerces_against_default_selection() {
  let backend = Arc::new(MemoryBackend::new());
  backend.publish("a", graph(20));
  let mut collection = Collection::new();
  collection
    .load_initial(std::path::Path::new("/nonexistent/fresco"), backend.as_ref())
    .await;

  let mut session = Session::new(collection, backend);
  assert_eq!(session.workspace().workflow_id(), "a");

  let state = WorkspaceState::from_json(
    r#"{ "workflow_id": "", "params": { "Steps": "five", "Stale": 1, "Img": "layer-1" } }"#,
  )
  .unwrap();
  session.restore(state).unwrap();

  let mut expected = Params::new();
  expected.insert("Img".to_string(), None);
  expected.insert("Steps".to_string(), Some(ParamValue::Int(20)));
  assert_eq!(session.workspace().workflow_id(), "a");
  assert_eq!(session.workspace().params(), &expected);
}
