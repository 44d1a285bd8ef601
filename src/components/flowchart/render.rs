use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{LABEL_FONT_SIZE, port_point};
use super::shape::{BaseShape, LabelAnchor};
use super::state::{FlowchartState, PORT_RADIUS, REMOVE_BUTTON_RADIUS};
use super::types::{EdgeRecord, NodeRecord, Rect};

const BACKGROUND: &str = "#F2F7FA";
const GRID_DOT: &str = "#d5dde5";
const GRID_SIZE: f64 = 10.0;
const SELECTION: &str = "#239edd";
const PORT_STROKE: &str = "#5F95FF";

pub fn render(state: &FlowchartState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	for edge in &state.chart.edges {
		draw_edge(state, ctx, edge);
	}
	draw_pending_link(state, ctx);
	for node in &state.chart.nodes {
		draw_node(state, ctx, node);
	}
	ctx.restore();
}

fn draw_grid(state: &FlowchartState, ctx: &CanvasRenderingContext2d) {
	let step = GRID_SIZE * state.transform.k;
	if step < 4.0 {
		return;
	}
	let (ox, oy) = (
		state.transform.x.rem_euclid(step),
		state.transform.y.rem_euclid(step),
	);
	ctx.set_fill_style_str(GRID_DOT);
	let mut x = ox;
	while x < state.width {
		let mut y = oy;
		while y < state.height {
			ctx.fill_rect(x, y, 1.0, 1.0);
			y += step;
		}
		x += step;
	}
}

fn draw_edge(state: &FlowchartState, ctx: &CanvasRenderingContext2d, edge: &EdgeRecord) {
	let Some((a, b)) = state.edge_points(edge) else {
		return;
	};
	let k = state.transform.k;
	let selected = state.selected_edges.contains(&edge.id);
	let hovered = state.hover.edge.as_deref() == Some(edge.id.as_str());

	ctx.set_stroke_style_str(if selected { SELECTION } else { edge.style.stroke.as_str() });
	ctx.set_line_width(if hovered || selected {
		edge.style.stroke_width + 1.0 / k
	} else {
		edge.style.stroke_width
	});
	ctx.begin_path();
	ctx.move_to(a.0, a.1);
	ctx.line_to(b.0, b.1);
	ctx.stroke();

	if edge.style.target_marker {
		draw_arrow(ctx, a, b, &edge.style.stroke);
	}

	if !edge.label.display.is_empty() {
		let (mx, my) = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
		ctx.set_font(&format!("{LABEL_FONT_SIZE}px sans-serif"));
		let width = ctx
			.measure_text(&edge.label.display)
			.map(|m| m.width())
			.unwrap_or(0.0);
		ctx.set_fill_style_str(BACKGROUND);
		ctx.fill_rect(
			mx - width / 2.0 - 2.0,
			my - LABEL_FONT_SIZE / 2.0 - 2.0,
			width + 4.0,
			LABEL_FONT_SIZE + 4.0,
		);
		ctx.set_fill_style_str("#262626");
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&edge.label.display, mx, my);
	}

	if hovered && edge.tools.remove_button {
		if let Some((bx, by)) = state.remove_button_point(edge) {
			draw_remove_button(ctx, bx, by, k);
		}
	}
}

fn draw_arrow(ctx: &CanvasRenderingContext2d, a: (f64, f64), b: (f64, f64), color: &str) {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let dist = dx.hypot(dy);
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (length, half) = (12.0, 4.0);
	let (back_x, back_y) = (b.0 - ux * length, b.1 - uy * length);
	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(b.0, b.1);
	ctx.line_to(back_x - uy * half, back_y + ux * half);
	ctx.line_to(back_x + uy * half, back_y - ux * half);
	ctx.close_path();
	ctx.fill();
}

fn draw_remove_button(ctx: &CanvasRenderingContext2d, x: f64, y: f64, k: f64) {
	let r = REMOVE_BUTTON_RADIUS / k;
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("#fe854f");
	ctx.fill();
	let c = r * 0.45;
	ctx.set_stroke_style_str("#fff");
	ctx.set_line_width(2.0 / k);
	ctx.begin_path();
	ctx.move_to(x - c, y - c);
	ctx.line_to(x + c, y + c);
	ctx.move_to(x + c, y - c);
	ctx.line_to(x - c, y + c);
	ctx.stroke();
}

fn draw_pending_link(state: &FlowchartState, ctx: &CanvasRenderingContext2d) {
	let Some(link) = &state.linking else {
		return;
	};
	let Some(rect) = state.chart.node(&link.source).and_then(NodeRecord::rect) else {
		return;
	};
	let (sx, sy) = port_point(&rect, Some(link.port));
	let k = state.transform.k;
	ctx.set_stroke_style_str(PORT_STROKE);
	ctx.set_line_width(1.0 / k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(5.0 / k),
		&JsValue::from_f64(5.0 / k),
	));
	ctx.begin_path();
	ctx.move_to(sx, sy);
	ctx.line_to(link.x, link.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn trace_outline(ctx: &CanvasRenderingContext2d, base: BaseShape, r: &Rect) {
	ctx.begin_path();
	match base {
		BaseShape::Rect { corner_radius } if corner_radius > 0.0 => {
			let radius = corner_radius.min(r.width / 2.0).min(r.height / 2.0);
			let _ = ctx.round_rect_with_f64(r.x, r.y, r.width, r.height, radius);
		}
		BaseShape::Rect { .. } => ctx.rect(r.x, r.y, r.width, r.height),
		BaseShape::Ellipse => {
			let (cx, cy) = r.center();
			let _ = ctx.ellipse(cx, cy, r.width / 2.0, r.height / 2.0, 0.0, 0.0, 2.0 * PI);
		}
		BaseShape::Polygon(points) => {
			for (i, &(px, py)) in points.iter().enumerate() {
				let (x, y) = (r.x + px * r.width, r.y + py * r.height);
				if i == 0 {
					ctx.move_to(x, y);
				} else {
					ctx.line_to(x, y);
				}
			}
			ctx.close_path();
		}
	}
}

fn draw_node(state: &FlowchartState, ctx: &CanvasRenderingContext2d, node: &NodeRecord) {
	let Some(rect) = node.rect() else {
		return;
	};
	let k = state.transform.k;
	let template = node.shape.template();
	let style = template.style;

	trace_outline(ctx, template.base, &rect);
	ctx.set_fill_style_str(style.fill);
	ctx.fill();
	ctx.set_stroke_style_str(style.stroke);
	ctx.set_line_width(style.stroke_width);
	ctx.stroke();

	if state.selected_nodes.contains(&node.id) {
		ctx.set_stroke_style_str(SELECTION);
		ctx.set_line_width(1.0 / k);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(4.0 / k),
			&JsValue::from_f64(3.0 / k),
		));
		ctx.stroke_rect(rect.x - 3.0, rect.y - 3.0, rect.width + 6.0, rect.height + 6.0);
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	ctx.set_fill_style_str(style.text_color);
	ctx.set_font(&format!("{}px sans-serif", style.font_size));
	match style.label_anchor {
		LabelAnchor::Center => {
			let (cx, cy) = rect.center();
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			let _ = ctx.fill_text_with_max_width(&node.label, cx, cy, rect.width - 10.0);
		}
		LabelAnchor::TopLeft => {
			ctx.set_text_align("left");
			ctx.set_text_baseline("top");
			let _ = ctx.fill_text_with_max_width(
				&node.label,
				rect.x + 3.0,
				rect.y + 2.0,
				rect.width - 6.0,
			);
		}
	}

	let hovered = state.hover.node.as_deref() == Some(node.id.as_str());
	if hovered {
		if let Some(description) = &node.description {
			ctx.set_fill_style_str("#595959");
			ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
			ctx.set_text_align("left");
			ctx.set_text_baseline("top");
			let _ = ctx.fill_text(description, rect.x, rect.y + rect.height + 6.0);
		}
	}

	// ports stay hidden unless the node is hovered or a link is being drawn
	if let Some(ports) = node.ports {
		if hovered || state.linking.is_some() {
			for port in ports.iter() {
				let (px, py) = port_point(&rect, Some(port));
				ctx.begin_path();
				let _ = ctx.arc(px, py, PORT_RADIUS, 0.0, 2.0 * PI);
				ctx.set_fill_style_str("#fff");
				ctx.fill();
				ctx.set_stroke_style_str(PORT_STROKE);
				ctx.set_line_width(1.0);
				ctx.stroke();
			}
		}
	}
}
