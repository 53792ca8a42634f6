//! Fresco Workflow
//!
//! A custom workflow is a named compute graph together with the place it
//! came from. This crate defines the workflow entity and the typed parameter
//! schema derived from its graph:
//!
//! - [`extract`] scans a parsed graph for parameter nodes and yields one
//!   [`ParamDescriptor`] per recognized node, in graph order.
//! - [`coerce`] reconciles previously entered values with a (possibly new)
//!   schema, keeping values whose kind still matches and resetting the rest.

mod coerce;
mod extract;
mod params;
mod workflow;

pub use coerce::coerce;
pub use extract::{IMAGE_LAYER_NODE, INT_PARAMETER_NODE, MASK_LAYER_NODE, extract};
pub use fresco_graph::{Graph, GraphError};
pub use params::{ParamDescriptor, ParamKind, ParamValue, Params};
pub use workflow::{Origin, Workflow};
