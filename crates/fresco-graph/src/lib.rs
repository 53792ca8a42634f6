//! Fresco Graph
//!
//! This crate provides the parsed representation of a compute backend graph.
//! Raw graphs arrive as JSON documents in the backend's "API" shape:
//!
//! ```json
//! {
//!   "4": { "class_type": "ETN_IntParameter", "inputs": { "name": "Steps", "default": 20 } },
//!   "5": { "class_type": "KSampler", "inputs": { "steps": ["4", 0] } }
//! }
//! ```
//!
//! Parsing keeps the declaration order of the nodes, which is the order
//! consumers see when iterating a [`Graph`].

mod error;
mod graph;
mod input;
mod node;

pub use error::GraphError;
pub use graph::Graph;
pub use input::InputValue;
pub use node::Node;
