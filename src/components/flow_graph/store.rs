//! Graph view state, independent of any rendering framework.
//!
//! All transitions are synchronous methods on [`GraphStore`]; the pages own a
//! store inside a signal and the async fetch glue only ever calls
//! `begin_request` / `resolve` around an awaited backend call.

use log::debug;

use super::layout::{Direction, layout_graph};
use super::types::{GraphData, GraphNode, NodeStatus};

const ACTIVE_STROKE: &str = "#3b82f6";
const INACTIVE_STROKE: &str = "#64748b";

/// Lifecycle of the single outstanding backend request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchState {
	Idle,
	Pending(u64),
	Succeeded,
	Failed(String),
}

/// Current graph snapshot plus selection and fetch bookkeeping.
pub struct GraphStore {
	pub graph: GraphData,
	selected: Option<String>,
	fetch: FetchState,
	next_request: u64,
}

impl Default for GraphStore {
	fn default() -> Self {
		Self::new()
	}
}

impl GraphStore {
	pub fn new() -> Self {
		Self {
			graph: GraphData::default(),
			selected: None,
			fetch: FetchState::Idle,
			next_request: 0,
		}
	}

	/// Seed the store with an already laid-out graph (sample data).
	pub fn with_graph(graph: GraphData) -> Self {
		let mut store = Self::new();
		store.replace_graph(graph);
		store
	}

	/// Mark a request outstanding and hand back its id. Starting a new request
	/// while one is pending supersedes it: the older response becomes stale.
	pub fn begin_request(&mut self) -> u64 {
		self.next_request += 1;
		self.fetch = FetchState::Pending(self.next_request);
		self.next_request
	}

	pub fn is_loading(&self) -> bool {
		matches!(self.fetch, FetchState::Pending(_))
	}

	pub fn error(&self) -> Option<&str> {
		match &self.fetch {
			FetchState::Failed(message) => Some(message),
			_ => None,
		}
	}

	/// Complete the request with id `request`. A response that is not the
	/// current pending request is discarded so it can never overwrite a newer
	/// graph. On success the snapshot is laid out and fully swapped before any
	/// derived recomputation runs; on failure the prior graph stays visible.
	pub fn resolve(
		&mut self,
		request: u64,
		result: Result<GraphData, String>,
		direction: Direction,
	) {
		if self.fetch != FetchState::Pending(request) {
			debug!("discarding stale response for request {request}");
			return;
		}
		match result {
			Ok(mut graph) => {
				layout_graph(&mut graph.nodes, &graph.edges, direction);
				self.replace_graph(graph);
				self.fetch = FetchState::Succeeded;
			}
			Err(message) => {
				self.fetch = FetchState::Failed(message);
			}
		}
	}

	/// Full swap of the snapshot. No merge with prior state, no diffing.
	pub fn replace_graph(&mut self, graph: GraphData) {
		self.graph = graph;
		self.selected = None;
		self.refresh_edge_animation();
	}

	/// Select a node by id, or clear with `None`. An id that does not match
	/// any current node clears the selection silently.
	pub fn select_node(&mut self, id: Option<&str>) {
		self.selected = id
			.filter(|id| self.graph.node(id).is_some())
			.map(str::to_owned);
	}

	pub fn selected_node(&self) -> Option<&GraphNode> {
		self.selected.as_deref().and_then(|id| self.graph.node(id))
	}

	pub fn selected_id(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Advance a task's status one step and recompute edge animation. Returns
	/// the new status so the caller can notify the backend; `None` if the node
	/// is unknown or has no status.
	pub fn cycle_status(&mut self, id: &str) -> Option<NodeStatus> {
		let node = self.graph.nodes.iter_mut().find(|n| n.id == id)?;
		let next = node.status?.next();
		node.status = Some(next);
		self.refresh_edge_animation();
		Some(next)
	}

	/// Derived pass over the edge list: an edge whose source task is
	/// in-progress renders animated with the active stroke. Edges whose source
	/// carries no status (word nodes) keep their decoded style.
	fn refresh_edge_animation(&mut self) {
		for edge in &mut self.graph.edges {
			let source_status = self
				.graph
				.nodes
				.iter()
				.find(|n| n.id == edge.source)
				.and_then(|n| n.status);
			if let Some(status) = source_status {
				let active = status == NodeStatus::InProgress;
				edge.animated = active;
				edge.style.stroke = if active { ACTIVE_STROKE } else { INACTIVE_STROKE }.into();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flow_graph::types::{GraphEdge, NodeKind};

	fn task(id: &str, status: NodeStatus) -> GraphNode {
		GraphNode::new(id, NodeKind::Task, id).with_status(status)
	}

	fn two_task_graph() -> GraphData {
		GraphData {
			nodes: vec![
				task("task1", NodeStatus::Completed),
				task("task2", NodeStatus::Pending),
			],
			edges: vec![GraphEdge::new("e1-2", "task1", "task2")],
		}
	}

	#[test]
	fn replace_graph_is_a_full_swap() {
		let mut store = GraphStore::with_graph(two_task_graph());
		let second = GraphData {
			nodes: vec![task("other", NodeStatus::Pending)],
			edges: vec![],
		};
		store.replace_graph(second);
		assert_eq!(store.graph.nodes.len(), 1);
		assert!(store.graph.node("task1").is_none());
		assert!(store.graph.node("other").is_some());
	}

	#[test]
	fn replace_graph_clears_selection() {
		let mut store = GraphStore::with_graph(two_task_graph());
		store.select_node(Some("task1"));
		assert!(store.selected_node().is_some());
		store.replace_graph(GraphData::default());
		assert!(store.selected_node().is_none());
	}

	#[test]
	fn selecting_unknown_id_clears_selection() {
		let mut store = GraphStore::with_graph(two_task_graph());
		store.select_node(Some("task1"));
		store.select_node(Some("nope"));
		assert!(store.selected_node().is_none());
	}

	#[test]
	fn cycling_four_times_restores_status() {
		let mut store = GraphStore::with_graph(two_task_graph());
		for _ in 0..4 {
			store.cycle_status("task2");
		}
		assert_eq!(
			store.graph.node("task2").unwrap().status,
			Some(NodeStatus::Pending)
		);
	}

	#[test]
	fn in_progress_source_animates_outgoing_edges() {
		let mut store = GraphStore::with_graph(two_task_graph());
		// completed -> failed -> pending -> in-progress
		store.cycle_status("task1");
		store.cycle_status("task1");
		store.cycle_status("task1");
		assert!(store.graph.edges[0].animated);
		assert_eq!(store.graph.edges[0].style.stroke, ACTIVE_STROKE);

		store.cycle_status("task1");
		assert!(!store.graph.edges[0].animated);
		assert_eq!(store.graph.edges[0].style.stroke, INACTIVE_STROKE);
	}

	#[test]
	fn failed_fetch_keeps_prior_graph_and_sets_error() {
		let mut store = GraphStore::with_graph(two_task_graph());
		let request = store.begin_request();
		assert!(store.is_loading());

		store.resolve(request, Err("connection refused".into()), Direction::LeftRight);
		assert!(!store.is_loading());
		assert!(!store.error().unwrap().is_empty());
		assert_eq!(store.graph.nodes.len(), 2);
	}

	#[test]
	fn successful_fetch_lays_out_and_swaps() {
		let mut store = GraphStore::new();
		let request = store.begin_request();
		store.resolve(request, Ok(two_task_graph()), Direction::LeftRight);
		assert!(!store.is_loading());
		assert!(store.error().is_none());
		let (a, b) = (
			store.graph.node("task1").unwrap(),
			store.graph.node("task2").unwrap(),
		);
		assert!(a.x < b.x);
		assert!(a.width > 0.0);
	}

	#[test]
	fn stale_response_is_discarded() {
		let mut store = GraphStore::new();
		let first = store.begin_request();
		let second = store.begin_request();

		store.resolve(first, Ok(two_task_graph()), Direction::LeftRight);
		assert!(store.is_loading(), "superseded response must not land");
		assert!(store.graph.is_empty());

		let newer = GraphData {
			nodes: vec![task("fresh", NodeStatus::Pending)],
			edges: vec![],
		};
		store.resolve(second, Ok(newer), Direction::LeftRight);
		assert!(store.graph.node("fresh").is_some());
	}

	#[test]
	fn cycle_status_on_statusless_node_is_a_no_op() {
		let mut store = GraphStore::with_graph(GraphData {
			nodes: vec![GraphNode::new("w", NodeKind::Word, "word")],
			edges: vec![],
		});
		assert_eq!(store.cycle_status("w"), None);
		assert_eq!(store.cycle_status("missing"), None);
	}
}
