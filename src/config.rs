use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolved filesystem locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
  pub data_dir: PathBuf,
  pub workflow_dir: PathBuf,
  pub state_file: PathBuf,
}

impl Paths {
  /// Fill in defaults below `data_dir` for anything not given explicitly.
  pub fn resolve(
    data_dir: Option<PathBuf>,
    workflow_dir: Option<PathBuf>,
    state_file: Option<PathBuf>,
  ) -> Result<Self> {
    let data_dir = match data_dir {
      Some(dir) => dir,
      None => dirs::data_dir()
        .context("could not determine user data directory")?
        .join("fresco"),
    };
    Ok(Self::under(data_dir, workflow_dir, state_file))
  }

  fn under(
    data_dir: PathBuf,
    workflow_dir: Option<PathBuf>,
    state_file: Option<PathBuf>,
  ) -> Self {
    Self {
      workflow_dir: workflow_dir.unwrap_or_else(|| data_dir.join("workflows")),
      state_file: state_file.unwrap_or_else(|| data_dir.join("workspace.json")),
      data_dir,
    }
  }

  pub fn state_file(&self) -> &Path {
    &self.state_file
  }
}
