//! Fresco Collection
//!
//! The registry of every custom workflow the application knows about. Workflows
//! come from three places:
//! - local files, read once from the workflow directory at startup
//! - the compute backend, as a snapshot at startup and later as published
//!   workflow notifications
//! - the open document, registered by the workspace
//!
//! The [`Collection`] is unique by id and append-only. Every mutation emits a
//! [`CollectionEvent`] to registered [`Notifier`]s. [`SortedView`] provides the
//! display ordering without touching the collection itself.

mod backend;
mod collection;
mod error;
mod events;
mod fs;
mod sorted;

pub use backend::{Backend, MemoryBackend};
pub use collection::{Collection, LoadReport, SkippedFile};
pub use error::CollectionError;
pub use events::{ChannelNotifier, CollectionEvent, NoopNotifier, Notifier};
pub use fs::{LocalWorkflows, WORKFLOW_EXTENSION};
pub use sorted::{SortedView, compare};
