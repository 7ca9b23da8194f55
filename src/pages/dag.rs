//! Execution DAG viewer: prompt-driven generation plus click-to-cycle task
//! statuses with a fire-and-forget backend acknowledgement.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::error;

use crate::api;
use crate::components::flow_graph::{
	Direction, FlowGraphCanvas, GraphData, GraphEdge, GraphNode, GraphStore, NodeKind,
	NodeStatus, layout_graph,
};

const DEFAULT_PROMPT: &str = "Generate an execution DAG for a machine learning pipeline with data preprocessing, feature engineering, model training, and evaluation";

const EXAMPLE_PROMPTS: &[&str] = &[
	"Generate an execution DAG for a data engineering pipeline with extraction, transformation, and loading steps",
	"Create a machine learning workflow DAG with data preprocessing, feature selection, model training, hyperparameter tuning, and evaluation",
	"Generate a DAG for a web scraping pipeline with URL collection, HTML retrieval, data extraction, and database storage",
	"Create an AI pipeline DAG for text processing with data collection, preprocessing, embedding generation, model training, and deployment",
];

/// Sample pipeline shown before the first generation.
fn sample_pipeline() -> GraphData {
	let task = |id: &str, label: &str, status: NodeStatus| {
		GraphNode::new(id, NodeKind::Task, label).with_status(status)
	};
	let mut nodes = vec![
		task("task1", "Data Loading", NodeStatus::Completed),
		task("task2", "Data Preprocessing", NodeStatus::Completed),
		task("task3", "Feature Engineering", NodeStatus::InProgress),
		task("task4", "Model Training", NodeStatus::Pending),
		task("task5", "Model Evaluation", NodeStatus::Pending),
		task("task6", "Model Deployment", NodeStatus::Pending),
		task("task7", "Post-processing", NodeStatus::Pending),
	];
	let edges = vec![
		GraphEdge::new("e1-2", "task1", "task2"),
		GraphEdge::new("e2-3", "task2", "task3"),
		GraphEdge::new("e3-4", "task3", "task4"),
		GraphEdge::new("e3-7", "task3", "task7"),
		GraphEdge::new("e4-5", "task4", "task5"),
		GraphEdge::new("e5-6", "task5", "task6"),
	];
	layout_graph(&mut nodes, &edges, Direction::LeftRight);
	GraphData { nodes, edges }
}

/// Execution DAG page.
#[component]
pub fn ExecutionDag() -> impl IntoView {
	let store = RwSignal::new(GraphStore::with_graph(sample_pipeline()));
	let prompt = RwSignal::new(DEFAULT_PROMPT.to_string());

	let graph = Signal::derive(move || store.with(|s| s.graph.clone()));
	let loading = Signal::derive(move || store.with(|s| s.is_loading()));
	let error_message =
		Signal::derive(move || store.with(|s| s.error().map(str::to_owned)));

	let generate = move |_| {
		let text = prompt.get_untracked();
		let Some(request) = store.try_update(|s| s.begin_request()) else {
			return;
		};
		spawn_local(async move {
			let result = api::generate_dag(&text).await.map_err(|e| e.to_string());
			store.update(|s| s.resolve(request, result, Direction::LeftRight));
		});
	};

	// Clicking a task advances its status locally, then tells the backend.
	// An ack failure is logged; the local cycle already happened.
	let on_node_click = Callback::new(move |id: String| {
		let Some(next) = store.try_update(|s| s.cycle_status(&id)).flatten() else {
			return;
		};
		spawn_local(async move {
			if let Err(err) = api::update_task_status(&id, next).await {
				error!("status update for {id} failed: {err}");
			}
		});
	});

	view! {
		<div class="page">
			<div class="prompt-panel">
				<label for="prompt">"Describe your execution DAG:"</label>
				<textarea
					id="prompt"
					prop:value=move || prompt.get()
					on:input=move |ev| prompt.set(event_target_value(&ev))
					placeholder="Describe the execution DAG you want to generate..."
				/>
				<div class="prompt-actions">
					<button on:click=generate disabled=move || loading.get()>
						{move || if loading.get() { "Generating..." } else { "Generate DAG" }}
					</button>
				</div>
				{move || {
					error_message
						.get()
						.map(|message| view! { <div class="error">"Error: " {message}</div> })
				}}
				<div class="examples">
					<h3>"Example prompts:"</h3>
					<div class="example-buttons">
						{EXAMPLE_PROMPTS
							.iter()
							.map(|example| {
								view! {
									<button
										class="example"
										on:click=move |_| prompt.set(example.to_string())
									>
										{shorten(example, 50)}
									</button>
								}
							})
							.collect_view()}
					</div>
				</div>
			</div>

			<div class="graph-pane">
				<FlowGraphCanvas data=graph on_node_click=on_node_click />
			</div>

			<div class="legend">
				{[
					NodeStatus::Completed,
					NodeStatus::InProgress,
					NodeStatus::Pending,
					NodeStatus::Failed,
				]
					.into_iter()
					.map(|status| {
						view! {
							<div class="legend-entry">
								<span
									class="legend-dot"
									style=format!("background: {};", status.color())
								/>
								<span>{legend_name(status)}</span>
							</div>
						}
					})
					.collect_view()}
			</div>

			<div class="hint">"Click on a task to cycle through states"</div>
		</div>
	}
}

fn legend_name(status: NodeStatus) -> &'static str {
	match status {
		NodeStatus::Pending => "Pending",
		NodeStatus::InProgress => "In Progress",
		NodeStatus::Completed => "Completed",
		NodeStatus::Failed => "Failed",
	}
}

fn shorten(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		return text.to_owned();
	}
	let head: String = text.chars().take(max_chars).collect();
	format!("{head}...")
}
