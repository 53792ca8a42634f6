//! Fresco Workspace
//!
//! Tracks which custom workflow is active, the parameter schema derived from
//! its graph, and the values the user entered for those parameters.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────┐   ┌──────────────┐   ┌────────────┐
//! │ backend notifications │   │   document   │   │     UI     │
//! └───────────┬───────────┘   └──────┬───────┘   └─────┬──────┘
//!             └───────── SessionHandle (mpsc) ─────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Session                            │
//! │  - owns Collection and Workspace                            │
//! │  - handles one command at a time, in arrival order          │
//! │  - routes CollectionEvents to Workspace::handle_event       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut collection = Collection::new();
//! collection.load_initial(&workflow_dir, backend.as_ref()).await;
//!
//! let session = Session::new(collection, backend);
//! let handle = session.handle();
//!
//! let cancel = CancellationToken::new();
//! tokio::spawn(session.start(cancel.clone()));
//!
//! handle.select("inpaint").await?;
//! handle.set_param("Steps", Some(ParamValue::Int(30))).await?;
//! ```

mod error;
mod events;
mod session;
mod state;
mod workspace;

pub use error::WorkspaceError;
pub use events::WorkspaceEvent;
pub use session::{Command, Session, SessionHandle, SessionSnapshot, WorkflowSummary};
pub use state::WorkspaceState;
pub use workspace::Workspace;
