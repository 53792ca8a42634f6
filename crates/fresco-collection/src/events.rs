//! Collection events and notifiers.
//!
//! Every mutation of a [`Collection`](crate::Collection) produces exactly one
//! event. Observers (the active workspace, list views) register a
//! [`Notifier`] and react to the position carried by the event.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted when the collection changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionEvent {
  /// A workflow was appended at `position`.
  Inserted { position: usize, id: String },

  /// The graph of the workflow at `position` was replaced.
  Changed { position: usize, id: String },
}

impl CollectionEvent {
  pub fn position(&self) -> usize {
    match self {
      CollectionEvent::Inserted { position, .. } | CollectionEvent::Changed { position, .. } => {
        *position
      }
    }
  }

  pub fn id(&self) -> &str {
    match self {
      CollectionEvent::Inserted { id, .. } | CollectionEvent::Changed { id, .. } => id,
    }
  }
}

/// Trait for receiving events.
///
/// Implementations decide what to do with them (refresh a view, forward to
/// another task, log, ignore).
pub trait Notifier<E>: Send + Sync {
  fn notify(&self, event: E);
}

/// A notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl<E> Notifier<E> for NoopNotifier {
  fn notify(&self, _event: E) {}
}

/// A notifier that forwards events to an unbounded channel.
#[derive(Debug)]
pub struct ChannelNotifier<E> {
  sender: mpsc::UnboundedSender<E>,
}

impl<E> ChannelNotifier<E> {
  pub fn new(sender: mpsc::UnboundedSender<E>) -> Self {
    Self { sender }
  }

  /// Create a notifier together with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<E>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self { sender }, receiver)
  }
}

impl<E> Clone for ChannelNotifier<E> {
  fn clone(&self) -> Self {
    Self {
      sender: self.sender.clone(),
    }
  }
}

impl<E: Send> Notifier<E> for ChannelNotifier<E> {
  fn notify(&self, event: E) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
