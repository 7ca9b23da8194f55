use serde::{Deserialize, Serialize};

/// Execution status of a task node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
	Pending,
	InProgress,
	Completed,
	Failed,
}

impl NodeStatus {
	/// Next status in the fixed cycle pending -> in-progress -> completed -> failed -> pending.
	pub fn next(self) -> Self {
		match self {
			NodeStatus::Pending => NodeStatus::InProgress,
			NodeStatus::InProgress => NodeStatus::Completed,
			NodeStatus::Completed => NodeStatus::Failed,
			NodeStatus::Failed => NodeStatus::Pending,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			NodeStatus::Pending => "pending",
			NodeStatus::InProgress => "in-progress",
			NodeStatus::Completed => "completed",
			NodeStatus::Failed => "failed",
		}
	}

	/// Parse a wire status. Unknown values are treated as absent rather than
	/// failing the whole payload.
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"pending" => Some(NodeStatus::Pending),
			"in-progress" => Some(NodeStatus::InProgress),
			"completed" => Some(NodeStatus::Completed),
			"failed" => Some(NodeStatus::Failed),
			_ => None,
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			NodeStatus::Pending => "#94a3b8",
			NodeStatus::InProgress => "#3b82f6",
			NodeStatus::Completed => "#22c55e",
			NodeStatus::Failed => "#ef4444",
		}
	}
}

/// Visual variant of a node, resolved once from the wire `type` tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeKind {
	Task,
	#[default]
	Word,
	Expanded,
}

impl NodeKind {
	pub fn from_tag(tag: &str) -> Self {
		match tag {
			"taskNode" => NodeKind::Task,
			"expandedNode" => NodeKind::Expanded,
			_ => NodeKind::Word,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	pub status: Option<NodeStatus>,
	pub summary: Option<String>,
	pub description: Option<String>,
	pub related_topics: Vec<String>,
	pub examples: Vec<String>,
	/// Top-left position in layout space, assigned by the layout adapter.
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl GraphNode {
	pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			kind,
			label: label.into(),
			status: None,
			summary: None,
			description: None,
			related_topics: Vec::new(),
			examples: Vec::new(),
			x: 0.0,
			y: 0.0,
			width: 0.0,
			height: 0.0,
		}
	}

	pub fn with_status(mut self, status: NodeStatus) -> Self {
		self.status = Some(status);
		self
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub stroke: String,
	pub stroke_width: f64,
	/// Dash/gap lengths; `None` renders a solid line.
	pub dash: Option<(f64, f64)>,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		Self {
			stroke: "#64748b".into(),
			stroke_width: 2.0,
			dash: Some((8.0, 4.0)),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub explanation: Option<String>,
	pub animated: bool,
	pub style: EdgeStyle,
}

impl GraphEdge {
	pub fn new(
		id: impl Into<String>,
		source: impl Into<String>,
		target: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			explanation: None,
			animated: false,
			style: EdgeStyle::default(),
		}
	}
}

/// The currently rendered (nodes, edges) snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_cycle_returns_after_four_steps() {
		for start in [
			NodeStatus::Pending,
			NodeStatus::InProgress,
			NodeStatus::Completed,
			NodeStatus::Failed,
		] {
			assert_eq!(start.next().next().next().next(), start);
		}
	}

	#[test]
	fn status_serializes_kebab_case() {
		let s = serde_json::to_string(&NodeStatus::InProgress).unwrap();
		assert_eq!(s, "\"in-progress\"");
		let back: NodeStatus = serde_json::from_str("\"in-progress\"").unwrap();
		assert_eq!(back, NodeStatus::InProgress);
	}

	#[test]
	fn kind_resolves_from_wire_tag() {
		assert_eq!(NodeKind::from_tag("taskNode"), NodeKind::Task);
		assert_eq!(NodeKind::from_tag("wordNode"), NodeKind::Word);
		assert_eq!(NodeKind::from_tag("WordNode"), NodeKind::Word);
		assert_eq!(NodeKind::from_tag("expandedNode"), NodeKind::Expanded);
	}
}
