use std::path::{Path, PathBuf};

use fresco_workflow::Workflow;
use tokio::fs;

use crate::error::CollectionError;

/// Extension of workflow files in the local directory.
pub const WORKFLOW_EXTENSION: &str = "json";

/// Directory of locally saved workflows.
///
/// Each workflow is one file holding the raw graph as JSON:
/// ```text
/// {root}/
/// ├── inpaint.json      -> id "inpaint"
/// └── upscale-2x.json   -> id "upscale-2x"
/// ```
#[derive(Debug, Clone)]
pub struct LocalWorkflows {
  root: PathBuf,
}

impl LocalWorkflows {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Workflow id for a file path: the file stem, if the path is a workflow file.
  /// Example: "/data/workflows/inpaint.json" -> "inpaint"
  pub fn workflow_id(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(WORKFLOW_EXTENSION) {
      return None;
    }
    path
      .file_stem()
      .and_then(|s| s.to_str())
      .filter(|s| !s.is_empty())
      .map(str::to_string)
  }

  /// List workflow files, sorted by file name.
  ///
  /// A missing directory holds no workflows.
  pub async fn list(&self) -> Result<Vec<PathBuf>, CollectionError> {
    let mut files = Vec::new();
    if !self.root.exists() {
      return Ok(files);
    }

    let io_error = |source| CollectionError::Io {
      path: self.root.clone(),
      source,
    };
    let mut entries = fs::read_dir(&self.root).await.map_err(io_error)?;
    while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
      let path = entry.path();
      if path.is_file() && Self::workflow_id(&path).is_some() {
        files.push(path);
      }
    }

    files.sort();
    Ok(files)
  }

  /// Read one workflow file.
  pub async fn load(&self, path: &Path) -> Result<Workflow, CollectionError> {
    let id = Self::workflow_id(path)
      .ok_or_else(|| CollectionError::NotFound(path.display().to_string()))?;
    let content = fs::read_to_string(path)
      .await
      .map_err(|source| CollectionError::Io {
        path: path.to_path_buf(),
        source,
      })?;
    let graph = serde_json::from_str(&content).map_err(|source| CollectionError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    Ok(Workflow::local(id, graph, path))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fresco_workflow::Origin;

  #[test]
  fn test_workflow_id_from_stem() {
    let id = LocalWorkflows::workflow_id(Path::new("/data/workflows/inpaint.json"));
    assert_eq!(id, Some("inpaint".to_string()));
  }

  #[test]
  fn test_workflow_id_keeps_inner_dots() {
    let id = LocalWorkflows::workflow_id(Path::new("sdxl.upscale.json"));
    assert_eq!(id, Some("sdxl.upscale".to_string()));
  }

  #[test]
  fn test_workflow_id_other_extension() {
    assert_eq!(LocalWorkflows::workflow_id(Path::new("notes.txt")), None);
    assert_eq!(LocalWorkflows::workflow_id(Path::new("README")), None);
  }

  #[tokio::test]
  async fn test_list_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let local = LocalWorkflows::new(dir.path().join("missing"));
    assert!(local.list().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_list_and_load() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.json"), r#"{"1": {"class_type": "X"}}"#).unwrap();
    std::fs::write(dir.path().join("a.json"), "{}").unwrap();
    std::fs::write(dir.path().join("skip.txt"), "{}").unwrap();
    std::fs::create_dir(dir.path().join("dir.json")).unwrap();

    let local = LocalWorkflows::new(dir.path());
    let files = local.list().await.unwrap();
    let names: Vec<_> = files
      .iter()
      .map(|p| p.file_name().unwrap().to_str().unwrap())
      .collect();
    assert_eq!(names, vec!["a.json", "b.json"]);

    let wf = local.load(&files[1]).await.unwrap();
    assert_eq!(wf.id, "b");
    assert_eq!(wf.origin, Origin::Local);
    assert_eq!(wf.source_path.as_deref(), Some(files[1].as_path()));
  }

  #[tokio::test]
  async fn test_load_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = LocalWorkflows::new(dir.path()).load(&path).await.unwrap_err();
    assert!(matches!(err, CollectionError::Parse { .. }));
  }
}
