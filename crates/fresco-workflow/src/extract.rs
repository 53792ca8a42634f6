use fresco_graph::{Graph, Node};

use crate::params::ParamDescriptor;

pub const IMAGE_LAYER_NODE: &str = "ETN_KritaImageLayer";
pub const MASK_LAYER_NODE: &str = "ETN_KritaMaskLayer";
pub const INT_PARAMETER_NODE: &str = "ETN_IntParameter";

const INT_MIN: i64 = -(1 << 31);
const INT_MAX: i64 = 1 << 31;

/// Derive the parameter schema of a graph.
///
/// Yields one descriptor per parameter node, in the graph's node order.
/// Values declared by the graph are passed through as-is; no range or
/// uniqueness checks are made.
pub fn extract(graph: &Graph) -> Vec<ParamDescriptor> {
  graph.iter().filter_map(descriptor).collect()
}

fn descriptor(node: &Node) -> Option<ParamDescriptor> {
  match node.class_type.as_str() {
    IMAGE_LAYER_NODE => Some(ParamDescriptor::image_layer(
      node.input_str("name", "Image"),
    )),
    MASK_LAYER_NODE => Some(ParamDescriptor::mask_layer(node.input_str("name", "Mask"))),
    INT_PARAMETER_NODE => Some(ParamDescriptor::number_int(
      node.input_str("name", "Parameter"),
      node.input_int("default", 0),
      node.input_int("min", INT_MIN),
      node.input_int("max", INT_MAX),
    )),
    _ => None,
  }
}
