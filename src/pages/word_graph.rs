//! Word/knowledge graph explorer: generate a concept graph from a topic or an
//! uploaded document, then explore nodes through the detail panel.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{File, HtmlInputElement};

use crate::api;
use crate::components::flow_graph::{Direction, FlowGraphCanvas, GraphNode, GraphStore};

const NUM_WORDS: u32 = 5;

/// Word graph page.
#[component]
pub fn WordGraph() -> impl IntoView {
	let store = RwSignal::new(GraphStore::new());
	let topic = RwSignal::new(String::new());
	// `File` is a JS handle, so it lives in local (non-Send) storage.
	let attachment: RwSignal<Option<File>, LocalStorage> = RwSignal::new_local(None);

	let graph = Signal::derive(move || store.with(|s| s.graph.clone()));
	let loading = Signal::derive(move || store.with(|s| s.is_loading()));
	let error_message =
		Signal::derive(move || store.with(|s| s.error().map(str::to_owned)));
	let selected_id =
		Signal::derive(move || store.with(|s| s.selected_id().map(str::to_owned)));
	let selected_node: Memo<Option<GraphNode>> =
		Memo::new(move |_| store.with(|s| s.selected_node().cloned()));

	let on_file_change = move |ev: leptos::ev::Event| {
		let input: HtmlInputElement = event_target(&ev);
		attachment.set(input.files().and_then(|files| files.get(0)));
	};

	let remove_attachment = move |_| {
		attachment.set(None);
		if let Some(input) = document().get_element_by_id("file-upload") {
			if let Ok(input) = input.dyn_into::<HtmlInputElement>() {
				input.set_value("");
			}
		}
	};

	let generate = move |_| {
		let query = topic.get_untracked();
		let file = attachment.get_untracked();
		let Some(request) = store.try_update(|s| s.begin_request()) else {
			return;
		};
		spawn_local(async move {
			let result = match file {
				Some(file) => api::upload_document(&file, &query).await,
				None => api::generate_word_graph(&query, NUM_WORDS).await,
			};
			store.update(|s| {
				s.resolve(request, result.map_err(|e| e.to_string()), Direction::LeftRight)
			});
		});
	};

	let on_node_click = Callback::new(move |id: String| {
		store.update(|s| s.select_node(Some(&id)));
	});
	let on_background_click = Callback::new(move |_| {
		store.update(|s| s.select_node(None));
	});
	let close_panel = move |_| store.update(|s| s.select_node(None));

	view! {
		<div class="page word-page">
			<div class="topic-panel">
				<h3>"learning journey"</h3>
				<label for="topic">
					"Topic "
					{move || {
						attachment
							.with(|f| f.is_some())
							.then(|| view! { <span class="muted">"(optional with attachment)"</span> })
					}}
				</label>
				<input
					type="text"
					id="topic"
					prop:value=move || topic.get()
					on:input=move |ev| topic.set(event_target_value(&ev))
					placeholder=move || {
						if attachment.with(|f| f.is_some()) {
							"Optional with attachment"
						} else {
							"Enter a topic"
						}
					}
				/>

				<label for="file-upload" class="upload">
					"Upload Attachment"
				</label>
				<input
					id="file-upload"
					type="file"
					class="hidden"
					accept=".pdf,image/*"
					on:change=on_file_change
				/>

				{move || {
					attachment
						.with(|f| f.as_ref().map(|f| f.name()))
						.map(|name| {
							view! {
								<div class="attachment">
									<span class="attachment-name">{name}</span>
									<button
										class="attachment-remove"
										aria-label="Remove file"
										on:click=remove_attachment
									>
										"✕"
									</button>
								</div>
							}
						})
				}}

				<button class="generate" on:click=generate disabled=move || loading.get()>
					{move || {
						if loading.get() { "Creating your journey..." } else { "Generate Knowledge Map" }
					}}
				</button>
				{move || {
					error_message.get().map(|message| view! { <div class="error">{message}</div> })
				}}
			</div>

			<div class="graph-pane">
				<FlowGraphCanvas
					data=graph
					selected=Some(selected_id)
					on_node_click=on_node_click
					on_background_click=Some(on_background_click)
				/>
			</div>

			{move || {
				selected_node
					.get()
					.map(|node| view! { <DetailPanel node=node on_close=close_panel /> })
			}}

			<div class="hint">
				"Click on a node to explore details"
				<span class="muted">" (hover for relationships)"</span>
			</div>
		</div>
	}
}

/// Side panel with the selected concept's full description.
#[component]
fn DetailPanel(node: GraphNode, on_close: impl Fn(web_sys::MouseEvent) + 'static) -> impl IntoView {
	view! {
		<div class="detail-panel">
			<div class="detail-header">
				<h2>{node.label.clone()}</h2>
				<button class="detail-close" on:click=on_close>
					"✕"
				</button>
			</div>
			<div class="detail-section">
				<h3>"Description"</h3>
				<p>{node.description.clone().unwrap_or_default()}</p>
			</div>
			<div class="detail-section">
				<h3>"Related Topics"</h3>
				<div class="chips">
					{node
						.related_topics
						.iter()
						.map(|topic| view! { <span class="chip">{topic.clone()}</span> })
						.collect_view()}
				</div>
			</div>
			<div class="detail-section">
				<h3>"Examples"</h3>
				<ul>
					{node
						.examples
						.iter()
						.enumerate()
						.map(|(i, example)| {
							view! {
								<li>
									<span class="example-index">{i + 1}</span>
									{example.clone()}
								</li>
							}
						})
						.collect_view()}
				</ul>
			</div>
		</div>
	}
}
