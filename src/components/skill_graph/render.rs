use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::interaction::Highlight;
use super::physics::Body;
use super::state::{SkillGraphState, node_half_extent};
use super::types::{GraphNode, NodeKind};

const BACKGROUND: &str = "#0f172a";
const ACCENT: &str = "#22c1c3";
const DIM_ALPHA: f64 = 0.3;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &SkillGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	let highlight = state.highlight();
	let t = ease_out_cubic(state.highlight_t);
	draw_links(state, &highlight, t, ctx);
	draw_nodes(state, &highlight, t, ctx);
	ctx.restore();
}

fn draw_links(state: &SkillGraphState, highlight: &Highlight, t: f64, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let bodies = state.engine.bodies();
	let nodes = state.data.nodes();

	for link in state.data.links() {
		let (a, b) = (&bodies[link.skill], &bodies[link.project]);
		let lit = highlight.link_lit(link);

		// Unlit links fade out and turn dashed while something is highlighted.
		if lit {
			let color = nodes[link.project].color.as_deref().unwrap_or(ACCENT);
			ctx.set_stroke_style_str(color);
			ctx.set_global_alpha(0.25 + 0.55 * t);
			ctx.set_line_width(2.0 / k);
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		} else if !highlight.is_empty() {
			ctx.set_stroke_style_str("rgba(148, 163, 184, 1)");
			ctx.set_global_alpha(0.15 * (1.0 - t) + 0.05);
			ctx.set_line_width(1.0 / k);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0 / k),
				&JsValue::from_f64(4.0 / k),
			));
		} else {
			ctx.set_stroke_style_str("rgba(148, 163, 184, 1)");
			ctx.set_global_alpha(0.2);
			ctx.set_line_width(1.0 / k);
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &SkillGraphState, highlight: &Highlight, t: f64, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let pairs = state.data.nodes().iter().zip(state.engine.bodies()).enumerate();

	// Skills first so project cards sit on top, matching hit testing.
	for kind in [NodeKind::Skill, NodeKind::Project] {
		for (idx, (node, body)) in pairs.clone().filter(|(_, (n, _))| n.kind == kind) {
			let alpha = if highlight.is_empty() || highlight.is_lit(idx) {
				1.0
			} else {
				1.0 - (1.0 - DIM_ALPHA) * t
			};
			let emphasis = if highlight.is_focus(idx) {
				1.0 + 0.15 * t
			} else if highlight.is_active(idx) {
				1.0 + 0.08 * t
			} else {
				1.0
			};
			ctx.set_global_alpha(alpha);
			match kind {
				NodeKind::Skill => draw_skill(node, body, highlight.is_lit(idx), emphasis, k, ctx),
				NodeKind::Project => draw_project(node, body, highlight.is_lit(idx), emphasis, k, ctx),
			}
			if highlight.is_focus(idx) && t > 0.01 {
				let (hw, hh) = node_half_extent(node);
				ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
				ctx.set_line_width(1.5 / k);
				ctx.stroke_rect(
					body.x - hw * emphasis - 3.0,
					body.y - hh * emphasis - 3.0,
					2.0 * hw * emphasis + 6.0,
					2.0 * hh * emphasis + 6.0,
				);
			}
		}
	}
	ctx.set_global_alpha(1.0);
}

fn pill_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, hw: f64, hh: f64) {
	let inner = (hw - hh).max(0.0);
	ctx.begin_path();
	let _ = ctx.arc(x - inner, y, hh, PI / 2.0, 3.0 * PI / 2.0);
	let _ = ctx.arc(x + inner, y, hh, 3.0 * PI / 2.0, PI / 2.0);
	ctx.close_path();
}

fn draw_skill(
	node: &GraphNode,
	body: &Body,
	lit: bool,
	emphasis: f64,
	k: f64,
	ctx: &CanvasRenderingContext2d,
) {
	let (hw, hh) = node_half_extent(node);
	let (hw, hh) = (hw * emphasis, hh * emphasis);
	pill_path(ctx, body.x, body.y, hw, hh);
	ctx.set_fill_style_str(if lit { "rgba(34, 193, 195, 0.2)" } else { "rgba(30, 41, 59, 0.9)" });
	ctx.fill();
	ctx.set_stroke_style_str(if lit { ACCENT } else { "rgba(71, 85, 105, 0.5)" });
	ctx.set_line_width(2.0 / k);
	ctx.stroke();

	ctx.set_fill_style_str(if lit { ACCENT } else { "#cbd5e1" });
	ctx.set_font("500 12px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.label, body.x, body.y);
}

fn draw_project(
	node: &GraphNode,
	body: &Body,
	lit: bool,
	emphasis: f64,
	k: f64,
	ctx: &CanvasRenderingContext2d,
) {
	let (hw, hh) = node_half_extent(node);
	let (hw, hh) = (hw * emphasis, hh * emphasis);
	let color = node.color.as_deref().unwrap_or(ACCENT);

	ctx.set_fill_style_str("rgba(30, 41, 59, 0.95)");
	ctx.fill_rect(body.x - hw, body.y - hh, 2.0 * hw, 2.0 * hh);
	ctx.set_stroke_style_str(if lit { color } else { "rgba(71, 85, 105, 0.5)" });
	ctx.set_line_width(2.0 / k);
	ctx.stroke_rect(body.x - hw, body.y - hh, 2.0 * hw, 2.0 * hh);

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(if lit { color } else { "#cbd5e1" });
	ctx.set_font("bold 12px sans-serif");
	let _ = ctx.fill_text(&node.label, body.x, body.y - 7.0);
	if let Some(detail) = &node.detail {
		ctx.set_font("11px sans-serif");
		let _ = ctx.fill_text(detail, body.x, body.y + 9.0);
	}
}
