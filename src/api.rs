//! Backend client: JSON fetch plumbing and wire decoding.
//!
//! The backend speaks React-Flow-shaped payloads: nodes carry their display
//! fields in a `data` object, edges carry style and an optional relationship
//! explanation. Decoding performs presence checks only; the one structural
//! rule enforced here is that edges referencing unknown node ids are dropped.

use log::warn;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

use crate::components::flow_graph::{
	EdgeStyle, GraphData, GraphEdge, GraphNode, NodeKind, NodeStatus,
};

const DAG_BACKEND: &str = "http://localhost:5000";
const WORD_BACKEND: &str = "http://localhost:8000";

/// One error per fetch attempt; never retried, never corrupts shown state.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("network error: {0}")]
	Network(String),
	#[error("request failed with status {0}")]
	Status(u16),
	#[error("{0}")]
	Backend(String),
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),
}

fn js_error(err: JsValue) -> ApiError {
	ApiError::Network(format!("{err:?}"))
}

// ---------------------------------------------------------------------------
// Wire payloads

#[derive(Debug, Deserialize)]
pub struct GraphPayload {
	#[serde(default)]
	nodes: Vec<NodePayload>,
	#[serde(default)]
	edges: Vec<EdgePayload>,
}

#[derive(Debug, Deserialize)]
struct NodePayload {
	id: String,
	#[serde(rename = "type", default)]
	kind: Option<String>,
	#[serde(default)]
	data: NodeDataPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NodeDataPayload {
	label: Option<String>,
	status: Option<String>,
	summary: Option<String>,
	description: Option<String>,
	#[serde(rename = "relatedTopics")]
	related_topics: Vec<String>,
	examples: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EdgePayload {
	#[serde(default)]
	id: Option<String>,
	source: String,
	target: String,
	#[serde(default)]
	animated: bool,
	#[serde(default)]
	style: Option<EdgeStylePayload>,
	#[serde(default)]
	data: Option<EdgeDataPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EdgeStylePayload {
	stroke: Option<String>,
	#[serde(rename = "strokeWidth")]
	stroke_width: Option<f64>,
	#[serde(rename = "strokeDasharray")]
	stroke_dasharray: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EdgeDataPayload {
	explanation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorEnvelope {
	error: Option<Value>,
	message: Option<String>,
}

/// SVG-style dasharray: "8,4" or "8 4". A bare "8" repeats the dash length.
fn parse_dasharray(value: &str) -> Option<(f64, f64)> {
	let mut parts = value
		.split(|c: char| c == ',' || c.is_whitespace())
		.filter(|p| !p.is_empty())
		.map(str::parse::<f64>);
	let dash = parts.next()?.ok()?;
	let gap = match parts.next() {
		Some(Ok(gap)) => gap,
		_ => dash,
	};
	Some((dash, gap))
}

impl GraphPayload {
	fn into_graph(self) -> GraphData {
		let nodes: Vec<GraphNode> = self
			.nodes
			.into_iter()
			.map(|n| {
				let kind = NodeKind::from_tag(n.kind.as_deref().unwrap_or(""));
				let label = n.data.label.unwrap_or_else(|| n.id.clone());
				let mut node = GraphNode::new(n.id, kind, label);
				node.status = n.data.status.as_deref().and_then(NodeStatus::parse);
				node.summary = n.data.summary;
				node.description = n.data.description;
				node.related_topics = n.data.related_topics;
				node.examples = n.data.examples;
				node
			})
			.collect();

		let edges = self
			.edges
			.into_iter()
			.enumerate()
			.filter_map(|(i, e)| {
				let known =
					|id: &str| nodes.iter().any(|n| n.id == id);
				if !known(&e.source) || !known(&e.target) {
					warn!("dropping edge {} -> {}: unknown endpoint", e.source, e.target);
					return None;
				}
				let mut edge = GraphEdge::new(
					e.id.unwrap_or_else(|| format!("edge-{i}")),
					e.source,
					e.target,
				);
				edge.animated = e.animated;
				edge.explanation = e.data.and_then(|d| d.explanation);
				if let Some(style) = e.style {
					let defaults = EdgeStyle::default();
					edge.style = EdgeStyle {
						stroke: style.stroke.unwrap_or(defaults.stroke),
						stroke_width: style.stroke_width.unwrap_or(defaults.stroke_width),
						dash: match style.stroke_dasharray.as_deref() {
							Some("none") => None,
							Some(value) => parse_dasharray(value),
							None => defaults.dash,
						},
					};
				}
				Some(edge)
			})
			.collect();

		GraphData { nodes, edges }
	}
}

/// A body carrying a present, non-false `error` field is a backend-reported
/// failure even when the HTTP status was 200.
fn backend_error(body: &str) -> Option<ApiError> {
	let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
	let error = envelope.error?;
	if matches!(error, Value::Bool(false) | Value::Null) {
		return None;
	}
	let message = envelope
		.message
		.filter(|m| !m.is_empty())
		.or_else(|| error.as_str().map(str::to_owned))
		.unwrap_or_else(|| "backend reported an error".into());
	Some(ApiError::Backend(message))
}

/// Decode a response body into a graph snapshot.
pub fn decode_graph(body: &str) -> Result<GraphData, ApiError> {
	if let Some(err) = backend_error(body) {
		return Err(err);
	}
	let payload: GraphPayload = serde_json::from_str(body)?;
	Ok(payload.into_graph())
}

// ---------------------------------------------------------------------------
// Fetch plumbing

fn json_request(url: &str, body: &Value) -> Result<Request, ApiError> {
	let init = RequestInit::new();
	init.set_method("POST");
	init.set_body(&JsValue::from_str(&body.to_string()));
	let request = Request::new_with_str_and_init(url, &init).map_err(js_error)?;
	request
		.headers()
		.set("Content-Type", "application/json")
		.map_err(js_error)?;
	Ok(request)
}

async fn send(request: Request) -> Result<String, ApiError> {
	let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(js_error)?
		.dyn_into()
		.map_err(|_| ApiError::Network("fetch did not yield a Response".into()))?;
	let text = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?
		.as_string()
		.unwrap_or_default();
	if !response.ok() {
		// Failure bodies often still carry a usable message.
		if let Some(err) = backend_error(&text) {
			return Err(err);
		}
		return Err(ApiError::Status(response.status()));
	}
	Ok(text)
}

/// Generate an execution DAG from a free-form prompt.
pub async fn generate_dag(prompt: &str) -> Result<GraphData, ApiError> {
	let request = json_request(
		&format!("{DAG_BACKEND}/api/dag/generate"),
		&json!({ "prompt": prompt }),
	)?;
	decode_graph(&send(request).await?)
}

/// Acknowledge a task status change. The local state has already advanced;
/// this is fire-and-forget from the UI's point of view.
pub async fn update_task_status(task_id: &str, status: NodeStatus) -> Result<(), ApiError> {
	let request = json_request(
		&format!("{DAG_BACKEND}/api/dag/status"),
		&json!({ "taskId": task_id, "status": status }),
	)?;
	send(request).await?;
	Ok(())
}

/// Generate a word graph for a topic.
pub async fn generate_word_graph(topic: &str, num_words: u32) -> Result<GraphData, ApiError> {
	let request = json_request(
		&format!("{WORD_BACKEND}/api/word-graph/generate"),
		&json!({ "topic": topic, "num_words": num_words }),
	)?;
	decode_graph(&send(request).await?)
}

/// Generate a word graph from an uploaded document, optionally scoped to a
/// topic. Multipart body; the browser supplies the boundary header.
pub async fn upload_document(file: &File, topic: &str) -> Result<GraphData, ApiError> {
	let form = FormData::new().map_err(js_error)?;
	form.append_with_blob("file", file).map_err(js_error)?;
	if !topic.is_empty() {
		form.append_with_str("topic", topic).map_err(js_error)?;
	}
	let init = RequestInit::new();
	init.set_method("POST");
	init.set_body(form.as_ref());
	let request = Request::new_with_str_and_init(
		&format!("{WORD_BACKEND}/api/word-graph/upload"),
		&init,
	)
	.map_err(js_error)?;
	decode_graph(&send(request).await?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_task_payload() {
		// hex colors put `"#` inside the literal, so the delimiters are doubled
		let body = r##"{
			"nodes": [
				{"id": "task1", "type": "taskNode", "data": {"label": "Data Loading", "status": "completed"}},
				{"id": "task2", "type": "taskNode", "data": {"label": "Model Training", "status": "in-progress"}}
			],
			"edges": [
				{"id": "e1-2", "source": "task1", "target": "task2", "animated": true,
				 "style": {"stroke": "#3b82f6", "strokeWidth": 2}}
			]
		}"##;
		let graph = decode_graph(body).unwrap();
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.node("task1").unwrap().status, Some(NodeStatus::Completed));
		assert_eq!(graph.node("task1").unwrap().kind, NodeKind::Task);
		assert!(graph.edges[0].animated);
		assert_eq!(graph.edges[0].style.stroke, "#3b82f6");
	}

	#[test]
	fn decodes_word_payload_with_explanations() {
		let body = r#"{
			"nodes": [
				{"id": "node-0", "type": "wordNode", "data": {
					"label": "Ownership", "summary": "Who frees what.",
					"description": "Long form.", "relatedTopics": ["Borrowing"],
					"examples": ["move semantics"]}},
				{"id": "node-1", "type": "wordNode", "data": {"label": "Borrowing"}}
			],
			"edges": [
				{"source": "node-0", "target": "node-1", "animated": true,
				 "style": {"strokeDasharray": "8,8"},
				 "data": {"explanation": "Ownership includes Borrowing as a related concept"}}
			]
		}"#;
		let graph = decode_graph(body).unwrap();
		let node = graph.node("node-0").unwrap();
		assert_eq!(node.kind, NodeKind::Word);
		assert_eq!(node.related_topics, vec!["Borrowing"]);
		assert_eq!(node.examples, vec!["move semantics"]);
		assert_eq!(graph.edges[0].id, "edge-0");
		assert_eq!(graph.edges[0].style.dash, Some((8.0, 8.0)));
		assert!(graph.edges[0].explanation.as_deref().unwrap().contains("Borrowing"));
	}

	#[test]
	fn dangling_edges_are_dropped() {
		let body = r#"{
			"nodes": [{"id": "a", "data": {"label": "a"}}],
			"edges": [
				{"source": "a", "target": "ghost"},
				{"source": "ghost", "target": "a"}
			]
		}"#;
		let graph = decode_graph(body).unwrap();
		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn backend_error_envelope_is_surfaced() {
		let err = decode_graph(r#"{"error": true, "message": "Failed to generate DAG"}"#)
			.unwrap_err();
		assert!(matches!(err, ApiError::Backend(ref m) if m == "Failed to generate DAG"));

		// The DAG backend sends the exception text in `error` itself.
		let err = decode_graph(r#"{"error": "quota exceeded", "message": ""}"#).unwrap_err();
		assert!(matches!(err, ApiError::Backend(ref m) if m == "quota exceeded"));
	}

	#[test]
	fn malformed_body_is_a_decode_error() {
		assert!(matches!(
			decode_graph("not json"),
			Err(ApiError::Decode(_))
		));
	}

	#[test]
	fn unknown_status_degrades_to_none() {
		let body = r#"{"nodes": [{"id": "t", "data": {"label": "t", "status": "paused"}}]}"#;
		let graph = decode_graph(body).unwrap();
		assert_eq!(graph.node("t").unwrap().status, None);
	}

	#[test]
	fn dasharray_variants_parse() {
		assert_eq!(parse_dasharray("8,4"), Some((8.0, 4.0)));
		assert_eq!(parse_dasharray("8 4"), Some((8.0, 4.0)));
		assert_eq!(parse_dasharray("6"), Some((6.0, 6.0)));
		assert_eq!(parse_dasharray("wat"), None);
	}
}
