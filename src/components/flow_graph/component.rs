use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::CanvasState;
use super::types::GraphData;

/// Pointer travel below this is treated as a click rather than a pan.
const CLICK_SLOP: f64 = 4.0;

/// Canvas view over a laid-out graph: pan, zoom, hover and click handling.
///
/// The component owns only view-space state; the graph itself arrives through
/// the `data` signal already positioned, and interactions are reported back
/// through the callbacks.
#[component]
pub fn FlowGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = None)] selected: Option<Signal<Option<String>>>,
	#[prop(into)] on_node_click: Callback<String>,
	#[prop(default = None)] on_background_click: Option<Callback<()>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CanvasState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = (
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0),
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0),
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() = Some(CanvasState::new(data.get_untracked(), w, h));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(parent) = canvas_resize.parent_element() else {
				return;
			};
			let (nw, nh) = (parent.client_width() as f64, parent.client_height() as f64);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Swap in new graph data whenever the upstream store replaces it.
	let state_data = state.clone();
	Effect::new(move |_| {
		let graph = data.get();
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.set_graph(graph);
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let current = selected.map(|sig| sig.get()).unwrap_or(None);
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.selected = current;
		}
	});

	let cursor_position = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = cursor_position(&ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pan.active = true;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
			s.pan.moved = 0.0;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = cursor_position(&ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				s.pan.moved = dx.abs().max(dy.abs()).max(s.pan.moved);
				if s.pan.moved >= CLICK_SLOP {
					s.transform.x = s.pan.transform_start_x + dx;
					s.transform.y = s.pan.transform_start_y + dy;
				}
			} else {
				s.hover = s.hit_test(x, y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let (x, y) = cursor_position(&ev);
		let clicked_node = {
			let mut borrow = state_mu.borrow_mut();
			let Some(ref mut s) = *borrow else {
				return;
			};
			let was_click = s.pan.active && s.pan.moved < CLICK_SLOP;
			s.pan.active = false;
			if was_click {
				Some(s.node_at_position(x, y).map(str::to_owned))
			} else {
				None
			}
		};
		// Callbacks run outside the borrow: they may re-enter through signals.
		match clicked_node {
			Some(Some(id)) => on_node_click.run(id),
			Some(None) => {
				if let Some(cb) = on_background_click {
					cb.run(());
				}
			}
			None => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pan.active = false;
			s.hover = None;
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = cursor_position(&ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.05, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="flow-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
