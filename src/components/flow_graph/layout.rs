//! Adapter between graph snapshots and the layered layout engine.

use crate::layered::{LayeredConfig, LayeredGraph};

use super::text::estimate_text_width;
use super::types::{GraphEdge, GraphNode};

pub use crate::layered::Direction;

/// Narrow labels still get a usable card.
pub const MIN_NODE_WIDTH: f64 = 150.0;
pub const NODE_HEIGHT: f64 = 80.0;

// Spacing tuned for wide cards and room for arrowheads between ranks.
const NODE_SEP: f64 = 120.0;
const RANK_SEP: f64 = 500.0;

/// Size every node from its label and assign top-left positions so that edges
/// flow in `direction`. Edge endpoints must reference nodes in `nodes`;
/// decode drops dangling edges before they reach this point.
pub fn layout_graph(nodes: &mut [GraphNode], edges: &[GraphEdge], direction: Direction) {
	let mut graph = LayeredGraph::new(LayeredConfig {
		node_sep: NODE_SEP,
		rank_sep: RANK_SEP,
	});

	for node in nodes.iter_mut() {
		node.width = estimate_text_width(&node.label).max(MIN_NODE_WIDTH);
		node.height = NODE_HEIGHT;
		graph.add_node(&node.id, node.width, node.height);
	}
	for edge in edges {
		graph.add_edge(&edge.source, &edge.target);
	}

	let centers = graph.layout(direction);
	for node in nodes.iter_mut() {
		if let Some(&(cx, cy)) = centers.get(&node.id) {
			// Centers come back from the engine; the renderer wants the
			// top-left corner of the node's own footprint.
			node.x = cx - node.width / 2.0;
			node.y = cy - node.height / 2.0;
		}
	}
}
