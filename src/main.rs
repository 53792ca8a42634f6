use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fresco_collection::{Collection, MemoryBackend};
use fresco_workflow::{ParamKind, ParamValue};
use fresco_workspace::{Session, SessionSnapshot, WorkspaceState};

mod config;

use config::Paths;

/// Fresco - custom workflow manager for generative image tools
#[derive(Parser)]
#[command(name = "fresco")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: platform data dir + /fresco)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Directory of local workflow files (default: <data-dir>/workflows)
  #[arg(long, global = true)]
  workflow_dir: Option<PathBuf>,

  /// JSON file with the workflows published by the compute backend (id -> graph)
  #[arg(long, global = true)]
  remote: Option<PathBuf>,

  /// Workspace state file (default: <data-dir>/workspace.json)
  #[arg(long, global = true)]
  state: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// List all workflows in display order
  List,

  /// Show and edit the parameters of a workflow
  Params {
    /// Workflow to select (default: the saved selection)
    id: Option<String>,

    /// Set a parameter value, e.g. --set Steps=30
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,
  },

  /// Print the nodes of a workflow's graph
  Show {
    /// Workflow id
    id: String,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let paths = Paths::resolve(cli.data_dir, cli.workflow_dir, cli.state)?;
  debug!(
    data_dir = %paths.data_dir.display(),
    workflow_dir = %paths.workflow_dir.display(),
    "resolved paths"
  );

  let rt = tokio::runtime::Runtime::new()?;
  match cli.command {
    Some(Commands::List) => rt.block_on(list(&paths, cli.remote.as_deref())),
    Some(Commands::Params { id, set }) => {
      rt.block_on(params(&paths, cli.remote.as_deref(), id, set))
    }
    Some(Commands::Show { id }) => rt.block_on(show(&paths, cli.remote.as_deref(), &id)),
    None => {
      println!("fresco - use --help to see available commands");
      Ok(())
    }
  }
}

async fn list(paths: &Paths, remote: Option<&Path>) -> Result<()> {
  let (collection, backend) = load_collection(paths, remote).await?;
  let mut session = Session::new(collection, backend);
  if let Some(state) = read_state(paths.state_file()).await? {
    // A saved selection that no longer resolves still marks the row.
    restore_state(&mut session, state, None)?;
  }

  let snapshot = session.snapshot();
  for workflow in &snapshot.workflows {
    let marker = if workflow.id == snapshot.state.workflow_id {
      "*"
    } else {
      " "
    };
    println!(
      "{marker} {:<8} {:<32} {}",
      workflow.origin, workflow.name, workflow.id
    );
  }
  Ok(())
}

async fn params(
  paths: &Paths,
  remote: Option<&Path>,
  id: Option<String>,
  assignments: Vec<String>,
) -> Result<()> {
  let (collection, backend) = load_collection(paths, remote).await?;
  let mut session = Session::new(collection, backend);
  if let Some(state) = read_state(paths.state_file()).await? {
    restore_state(&mut session, state, id.as_deref())?;
  }

  let handle = session.handle();
  let cancel = CancellationToken::new();
  let task = tokio::spawn(session.start(cancel.clone()));

  if let Some(id) = id {
    handle
      .select(id.as_str())
      .await
      .with_context(|| format!("failed to select workflow '{id}'"))?;
  }
  for assignment in &assignments {
    let (name, value) = parse_assignment(assignment)?;
    handle
      .set_param(name, value)
      .await
      .with_context(|| format!("failed to set '{assignment}'"))?;
  }
  let snapshot = handle.snapshot().await?;

  cancel.cancel();
  task.await.context("workflow session panicked")?;

  print_params(&snapshot);
  write_state(paths.state_file(), &snapshot.state).await
}

async fn show(paths: &Paths, remote: Option<&Path>, id: &str) -> Result<()> {
  let (collection, _) = load_collection(paths, remote).await?;
  let workflow = collection.get(id)?;
  let graph = workflow
    .resolve()
    .with_context(|| format!("failed to parse graph of workflow '{id}'"))?;

  println!("{} ({}, {} nodes)", workflow.name(), workflow.origin, graph.len());
  for node in &graph {
    println!("  [{}] {}", node.id, node.class_type);
    for (key, value) in node.inputs() {
      println!("      {key} = {}", value.to_json());
    }
  }
  Ok(())
}

async fn load_collection(
  paths: &Paths,
  remote: Option<&Path>,
) -> Result<(Collection, Arc<MemoryBackend>)> {
  let backend = match remote {
    Some(path) => {
      let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read remote workflows: {}", path.display()))?;
      let workflows: IndexMap<String, serde_json::Value> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse remote workflows: {}", path.display()))?;
      MemoryBackend::with_workflows(workflows)
    }
    None => MemoryBackend::new(),
  };
  let backend = Arc::new(backend);

  let mut collection = Collection::new();
  let report = collection
    .load_initial(&paths.workflow_dir, backend.as_ref())
    .await;
  for skipped in &report.skipped {
    eprintln!("skipped {}: {}", skipped.path.display(), skipped.error);
  }
  Ok((collection, backend))
}

/// Apply saved state to a fresh session.
///
/// An explicitly requested workflow replaces the saved selection, and failing
/// to resolve it is an error. A saved selection that fails only warns.
fn restore_state(
  session: &mut Session,
  mut state: WorkspaceState,
  selected: Option<&str>,
) -> Result<()> {
  match selected {
    Some(id) => {
      state.workflow_id = id.to_string();
      session
        .restore(state)
        .with_context(|| format!("failed to select workflow '{id}'"))
    }
    None => {
      if let Err(e) = session.restore(state) {
        eprintln!("warning: {e}");
      }
      Ok(())
    }
  }
}

async fn read_state(path: &Path) -> Result<Option<WorkspaceState>> {
  if !path.exists() {
    return Ok(None);
  }
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read state file: {}", path.display()))?;
  let state = WorkspaceState::from_json(&content)
    .with_context(|| format!("failed to parse state file: {}", path.display()))?;
  Ok(Some(state))
}

async fn write_state(path: &Path, state: &WorkspaceState) -> Result<()> {
  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  tokio::fs::write(path, state.to_json()?)
    .await
    .with_context(|| format!("failed to write state file: {}", path.display()))
}

/// Parse `NAME=VALUE`. Integers become numbers, `null` clears, anything else is a layer.
fn parse_assignment(assignment: &str) -> Result<(&str, Option<ParamValue>)> {
  let Some((name, value)) = assignment.split_once('=') else {
    bail!("expected NAME=VALUE, got '{assignment}'");
  };
  let value = match value.trim() {
    "null" => None,
    v => match v.parse::<i64>() {
      Ok(i) => Some(ParamValue::Int(i)),
      Err(_) => Some(ParamValue::Layer(v.to_string())),
    },
  };
  Ok((name.trim(), value))
}

fn print_params(snapshot: &SessionSnapshot) {
  if snapshot.state.workflow_id.is_empty() {
    println!("no workflow selected");
    return;
  }
  println!("workflow: {}", snapshot.state.workflow_id);
  if snapshot.metadata.is_empty() {
    println!("  (no parameters)");
  }
  for param in &snapshot.metadata {
    let value = match snapshot.state.params.get(&param.name).cloned().flatten() {
      Some(ParamValue::Int(i)) => i.to_string(),
      Some(ParamValue::Layer(layer)) => layer,
      None => "-".to_string(),
    };
    match param.kind {
      ParamKind::NumberInt => println!(
        "  {:<24} int    = {value}  [{}..{}]",
        param.name,
        param.min.unwrap_or_default(),
        param.max.unwrap_or_default()
      ),
      ParamKind::ImageLayer => println!("  {:<24} image  = {value}", param.name),
      ParamKind::MaskLayer => println!("  {:<24} mask   = {value}", param.name),
    }
  }
}
