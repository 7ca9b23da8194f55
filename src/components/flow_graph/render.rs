//! Canvas drawing for the graph view.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasState, HoverTarget};
use super::types::{GraphNode, NodeKind};

const BACKGROUND: &str = "#faf7f0";
const CARD_BORDER: &str = "#e0d8c0";
const WORD_FILL: &str = "#f5f0e1";
const WORD_ACCENT: &str = "#94c5cc";
const WORD_SELECTED: &str = "#7a9e9f";
const TEXT_COLOR: &str = "#4a4a4a";
const LIGHT_TEXT: &str = "#8a8a8a";
const TASK_FILL: &str = "#ffffff";

const CORNER_RADIUS: f64 = 8.0;
const DASH_FLOW_SPEED: f64 = 30.0;

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_edge_tooltip(state, ctx);
	ctx.restore();
}

/// Anchor points where an edge leaves its source card and enters its target,
/// picked on the facing sides of the two footprints.
fn edge_anchors(source: &GraphNode, target: &GraphNode) -> ((f64, f64), (f64, f64)) {
	let (scx, scy) = (source.x + source.width / 2.0, source.y + source.height / 2.0);
	let (tcx, tcy) = (target.x + target.width / 2.0, target.y + target.height / 2.0);
	if (tcx - scx).abs() >= (tcy - scy).abs() {
		if tcx >= scx {
			((source.x + source.width, scy), (target.x, tcy))
		} else {
			((source.x, scy), (target.x + target.width, tcy))
		}
	} else if tcy >= scy {
		((scx, source.y + source.height), (tcx, target.y))
	} else {
		((scx, source.y), (tcx, target.y + target.height))
	}
}

fn draw_edges(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	for (i, edge) in state.graph.edges.iter().enumerate() {
		let (Some(source), Some(target)) =
			(state.graph.node(&edge.source), state.graph.node(&edge.target))
		else {
			continue;
		};
		let ((x1, y1), (x2, y2)) = edge_anchors(source, target);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let hovered = state.hover == Some(HoverTarget::Edge(i));
		let width = if hovered {
			edge.style.stroke_width + 1.5
		} else {
			edge.style.stroke_width
		};

		ctx.set_stroke_style_str(&edge.style.stroke);
		ctx.set_line_width(width);
		match edge.style.dash {
			Some((dash, gap)) if !hovered => {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash),
					&JsValue::from_f64(gap),
				));
				if edge.animated {
					ctx.set_line_dash_offset(-(state.flow_time * DASH_FLOW_SPEED) % (dash + gap));
				} else {
					ctx.set_line_dash_offset(0.0);
				}
			}
			_ => {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
		}

		let (ux, uy) = (dx / dist, dy / dist);
		let arrow = 10.0;
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2 - ux * arrow, y2 - uy * arrow);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&edge.style.stroke);
		let (back_x, back_y) = (x2 - ux * arrow, y2 - uy * arrow);
		let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);
		ctx.begin_path();
		ctx.move_to(x2, y2);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	for node in &state.graph.nodes {
		let selected = state.selected.as_deref() == Some(node.id.as_str());
		let hovered = state.hover == Some(HoverTarget::Node(node.id.clone()));
		match node.kind {
			NodeKind::Task => draw_task_node(ctx, node, selected),
			NodeKind::Word | NodeKind::Expanded => {
				draw_word_node(ctx, node, selected, hovered);
			}
		}
	}
}

fn draw_task_node(ctx: &CanvasRenderingContext2d, node: &GraphNode, selected: bool) {
	rounded_rect(ctx, node.x, node.y, node.width, node.height, CORNER_RADIUS);
	ctx.set_fill_style_str(TASK_FILL);
	ctx.fill();
	ctx.set_stroke_style_str(if selected { WORD_SELECTED } else { "#e5e7eb" });
	ctx.set_line_width(2.0);
	ctx.stroke();

	ctx.set_fill_style_str("#1f2937");
	ctx.set_font("bold 16px sans-serif");
	let _ = ctx.fill_text(&node.label, node.x + 16.0, node.y + 28.0);

	if let Some(status) = node.status {
		let chip_y = node.y + node.height - 32.0;
		rounded_rect(ctx, node.x + 16.0, chip_y, node.width - 32.0, 20.0, 4.0);
		ctx.set_fill_style_str(status.color());
		ctx.fill();
		ctx.set_fill_style_str("#ffffff");
		ctx.set_font("12px sans-serif");
		let _ = ctx.fill_text(status.label(), node.x + 24.0, chip_y + 14.0);
	}
}

fn draw_word_node(
	ctx: &CanvasRenderingContext2d,
	node: &GraphNode,
	selected: bool,
	hovered: bool,
) {
	rounded_rect(ctx, node.x, node.y, node.width, node.height, CORNER_RADIUS);
	ctx.set_fill_style_str(if selected { WORD_SELECTED } else { WORD_FILL });
	ctx.fill();
	ctx.set_stroke_style_str(CARD_BORDER);
	ctx.set_line_width(1.0);
	ctx.stroke();

	// Accent bar on the leading edge, as in the card styling.
	ctx.set_fill_style_str(if selected { "#6c8a8b" } else { WORD_ACCENT });
	ctx.fill_rect(node.x, node.y + CORNER_RADIUS, 5.0, node.height - 2.0 * CORNER_RADIUS);

	ctx.set_fill_style_str(if selected { "#ffffff" } else { TEXT_COLOR });
	ctx.set_font("500 16px sans-serif");
	let _ = ctx.fill_text(&node.label, node.x + 20.0, node.y + 30.0);

	if hovered {
		if let Some(summary) = node.summary.as_deref() {
			ctx.set_fill_style_str(if selected { "#f0f0f0" } else { LIGHT_TEXT });
			ctx.set_font("11px sans-serif");
			let _ = ctx.fill_text(&truncate(summary, 75), node.x + 20.0, node.y + 52.0);
		}
	}
}

fn draw_edge_tooltip(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let Some(HoverTarget::Edge(i)) = &state.hover else {
		return;
	};
	let Some(edge) = state.graph.edges.get(*i) else {
		return;
	};
	let Some(explanation) = edge.explanation.as_deref() else {
		return;
	};
	let (Some((x1, y1)), Some((x2, y2))) = (
		state.node_center(&edge.source),
		state.node_center(&edge.target),
	) else {
		return;
	};

	let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
	let lines = wrap_text(explanation, 36);
	let line_height = 16.0;
	let box_w = 230.0;
	let box_h = lines.len() as f64 * line_height + 16.0;
	let (bx, by) = (mx - box_w / 2.0, my - box_h / 2.0);

	rounded_rect(ctx, bx, by, box_w, box_h, 8.0);
	ctx.set_fill_style_str("rgba(245, 240, 225, 0.95)");
	ctx.fill();
	ctx.set_stroke_style_str(CARD_BORDER);
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_fill_style_str(TEXT_COLOR);
	ctx.set_font("500 12px sans-serif");
	for (n, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, bx + 10.0, by + 20.0 + n as f64 * line_height);
	}
}

fn truncate(text: &str, max_chars: usize) -> String {
	if text.chars().count() <= max_chars {
		return text.to_owned();
	}
	let cut: String = text.chars().take(max_chars).collect();
	format!("{cut}...")
}

/// Greedy word wrap by character count; canvas text metrics are not worth the
/// round trip for a tooltip.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
	let mut lines = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > max_chars {
			lines.push(std::mem::take(&mut current));
		}
		if !current.is_empty() {
			current.push(' ');
		}
		current.push_str(word);
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wrap_splits_on_word_boundaries() {
		let lines = wrap_text("one two three four five six seven", 12);
		assert!(lines.len() > 1);
		for line in &lines {
			assert!(line.chars().count() <= 13);
		}
		assert_eq!(lines.join(" "), "one two three four five six seven");
	}

	#[test]
	fn wrap_keeps_overlong_words_whole() {
		let lines = wrap_text("antidisestablishmentarianism yes", 10);
		assert_eq!(lines[0], "antidisestablishmentarianism");
	}

	#[test]
	fn truncate_appends_ellipsis_only_when_needed() {
		assert_eq!(truncate("short", 10), "short");
		assert_eq!(truncate("0123456789ab", 10), "0123456789...");
	}
}
