//! View-space state for the canvas: pan/zoom transform, hover tracking and
//! hit testing against the laid-out graph.

use super::types::GraphData;

/// Screen = graph * k + (x, y).
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	/// Total pointer travel since mousedown, to tell a click from a drag.
	pub moved: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HoverTarget {
	Node(String),
	Edge(usize),
}

const FIT_PADDING: f64 = 0.3;
const EDGE_HIT_DISTANCE: f64 = 8.0;

pub struct CanvasState {
	pub graph: GraphData,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: Option<HoverTarget>,
	pub selected: Option<String>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl CanvasState {
	pub fn new(graph: GraphData, width: f64, height: f64) -> Self {
		let mut state = Self {
			graph,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			hover: None,
			selected: None,
			width,
			height,
			flow_time: 0.0,
		};
		state.fit_view();
		state
	}

	/// Swap in a freshly laid-out graph and reframe the viewport around it.
	pub fn set_graph(&mut self, graph: GraphData) {
		self.graph = graph;
		self.hover = None;
		self.fit_view();
	}

	/// Frame the graph's bounding box with padding, centered in the canvas.
	pub fn fit_view(&mut self) {
		let Some(first) = self.graph.nodes.first() else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		};

		let (mut min_x, mut min_y) = (first.x, first.y);
		let (mut max_x, mut max_y) = (first.x + first.width, first.y + first.height);
		for node in &self.graph.nodes {
			min_x = min_x.min(node.x);
			min_y = min_y.min(node.y);
			max_x = max_x.max(node.x + node.width);
			max_y = max_y.max(node.y + node.height);
		}

		let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let k = (self.width / (bw * (1.0 + 2.0 * FIT_PADDING)))
			.min(self.height / (bh * (1.0 + 2.0 * FIT_PADDING)))
			.clamp(0.05, 1.5);
		self.transform = ViewTransform {
			x: self.width / 2.0 - k * (min_x + bw / 2.0),
			y: self.height / 2.0 - k * (min_y + bh / 2.0),
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose footprint contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<&str> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.graph
			.nodes
			.iter()
			.rev()
			.find(|n| gx >= n.x && gx <= n.x + n.width && gy >= n.y && gy <= n.y + n.height)
			.map(|n| n.id.as_str())
	}

	/// Center of a node's footprint, by id.
	pub fn node_center(&self, id: &str) -> Option<(f64, f64)> {
		self.graph
			.node(id)
			.map(|n| (n.x + n.width / 2.0, n.y + n.height / 2.0))
	}

	/// Index of the first edge passing near the screen point.
	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.graph.edges.iter().position(|edge| {
			let (Some(a), Some(b)) = (
				self.node_center(&edge.source),
				self.node_center(&edge.target),
			) else {
				return false;
			};
			segment_distance(a, b, (gx, gy)) < EDGE_HIT_DISTANCE / self.transform.k.min(1.0)
		})
	}

	pub fn hit_test(&self, sx: f64, sy: f64) -> Option<HoverTarget> {
		if let Some(id) = self.node_at_position(sx, sy) {
			return Some(HoverTarget::Node(id.to_owned()));
		}
		self.edge_at_position(sx, sy).map(HoverTarget::Edge)
	}

	/// Advance the edge-flow animation clock.
	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.fit_view();
	}
}

fn segment_distance(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq == 0.0 {
		0.0
	} else {
		(((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
	((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::types::{GraphEdge, GraphNode, NodeKind};

	fn placed(id: &str, x: f64, y: f64) -> GraphNode {
		let mut node = GraphNode::new(id, NodeKind::Word, id);
		node.x = x;
		node.y = y;
		node.width = 150.0;
		node.height = 80.0;
		node
	}

	fn state() -> CanvasState {
		CanvasState::new(
			GraphData {
				nodes: vec![placed("a", 0.0, 0.0), placed("b", 600.0, 0.0)],
				edges: vec![GraphEdge::new("e", "a", "b")],
			},
			800.0,
			600.0,
		)
	}

	#[test]
	fn screen_to_graph_inverts_the_transform() {
		let s = state();
		let (gx, gy) = s.screen_to_graph(400.0, 300.0);
		let (sx, sy) = (
			gx * s.transform.k + s.transform.x,
			gy * s.transform.k + s.transform.y,
		);
		assert!((sx - 400.0).abs() < 1e-9);
		assert!((sy - 300.0).abs() < 1e-9);
	}

	#[test]
	fn fit_view_centers_the_bounding_box() {
		let s = state();
		// bbox spans x 0..750, y 0..80; its center should land mid-canvas
		let (cx, cy) = (
			375.0 * s.transform.k + s.transform.x,
			40.0 * s.transform.k + s.transform.y,
		);
		assert!((cx - 400.0).abs() < 1e-9);
		assert!((cy - 300.0).abs() < 1e-9);
	}

	#[test]
	fn node_hit_test_respects_footprints() {
		let s = state();
		let k = s.transform.k;
		let inside_a = (75.0 * k + s.transform.x, 40.0 * k + s.transform.y);
		assert_eq!(s.node_at_position(inside_a.0, inside_a.1), Some("a"));

		let gap = (400.0 * k + s.transform.x, 40.0 * k + s.transform.y);
		assert_eq!(s.node_at_position(gap.0, gap.1), None);
	}

	#[test]
	fn edge_hit_test_finds_the_segment() {
		let s = state();
		let k = s.transform.k;
		// midpoint between the two node centers lies on the edge
		let on_edge = (375.0 * k + s.transform.x, 40.0 * k + s.transform.y);
		assert_eq!(s.edge_at_position(on_edge.0, on_edge.1), Some(0));
		assert_eq!(s.hit_test(on_edge.0, on_edge.1), Some(HoverTarget::Edge(0)));
	}

	#[test]
	fn empty_graph_gets_identity_framing() {
		let s = CanvasState::new(GraphData::default(), 800.0, 600.0);
		assert_eq!(s.transform.k, 1.0);
		assert!(s.node_at_position(400.0, 300.0).is_none());
	}
}
