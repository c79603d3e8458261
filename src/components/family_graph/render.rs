//! Canvas rendering for the family graph.
//!
//! Draws in passes for correct z-ordering: background, relationship lines
//! (arrowheads on parent links, dashes on spouse links), node circles with
//! labels, then the selection ring and vignette.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::GraphState;
use super::theme::Theme;
use super::types::RelationshipType;

/// Renders the complete scene to the canvas.
pub fn render(state: &GraphState, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_links(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.use_gradient {
		let gradient = ctx
			.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.unwrap();
		gradient
			.add_color_stop(0.0, &theme.background.color_secondary.to_css())
			.unwrap();
		gradient
			.add_color_stop(1.0, &theme.background.color.to_css())
			.unwrap();
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = ctx
		.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			state.width.min(state.height) * 0.3,
			state.width / 2.0,
			state.height / 2.0,
			state.width.max(state.height) * 0.7,
		)
		.unwrap();
	gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)").unwrap();
	gradient
		.add_color_stop(1.0, &format!("rgba(0, 0, 0, {})", theme.background.vignette))
		.unwrap();
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(state: &GraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	ctx.set_line_width(scale.line_width);

	for segment in state.sim.link_segments() {
		let (dx, dy) = (segment.x2 - segment.x1, segment.y2 - segment.y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		let color = match segment.kind {
			RelationshipType::ParentOf => theme.edge.parent_color,
			_ => theme.edge.kin_color,
		};
		ctx.set_stroke_style_str(&color.with_alpha(theme.edge.opacity).to_css());

		// Spouse links dash; the pattern collapses to solid when zoomed
		// far out so distant views stay clean.
		let dashed = segment.kind == RelationshipType::SpouseOf && scale.dash_alpha > 0.1;
		if dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(scale.spouse_dash.0),
				&JsValue::from_f64(scale.spouse_dash.1),
			));
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		// Leave room at the target end for the arrowhead on parent links.
		let arrow = segment.kind == RelationshipType::ParentOf && !scale.cull_arrows;
		let end_gap = if arrow {
			scale.node_radius + scale.arrow_size
		} else {
			scale.node_radius
		};

		ctx.begin_path();
		ctx.move_to(
			segment.x1 + ux * scale.node_radius,
			segment.y1 + uy * scale.node_radius,
		);
		ctx.line_to(segment.x2 - ux * end_gap, segment.y2 - uy * end_gap);
		ctx.stroke();

		if arrow {
			draw_arrowhead(ctx, segment.x2, segment.y2, ux, uy, scale, theme);
		}
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Directional arrowhead at the child end of a parent link.
fn draw_arrowhead(
	ctx: &CanvasRenderingContext2d,
	x2: f64,
	y2: f64,
	ux: f64,
	uy: f64,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let alpha = theme.edge.opacity * scale.arrow_alpha;
	ctx.set_fill_style_str(&theme.edge.parent_color.with_alpha(alpha).to_css());

	let (tip_x, tip_y) = (x2 - ux * scale.node_radius, y2 - uy * scale.node_radius);
	let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
	let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(state: &GraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	for (node, body) in state.graph.nodes.iter().zip(state.sim.bodies()) {
		let (x, y) = (body.x, body.y);
		let radius = scale.node_radius;
		let base = theme.generation_color(node.generation);

		if theme.node.use_gradient {
			let gradient = ctx
				.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.unwrap();
			gradient
				.add_color_stop(0.0, &base.lighten(0.35).to_css())
				.unwrap();
			gradient.add_color_stop(0.7, &base.to_css()).unwrap();
			gradient
				.add_color_stop(1.0, &base.darken(0.2).to_css())
				.unwrap();
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		} else {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(&base.to_css());
			ctx.fill();
		}

		if theme.node.border_width > 0.0 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.node.border_color.to_css());
			ctx.set_line_width(theme.node.border_width / scale.k);
			ctx.stroke();
		}

		if state.selected.as_deref() == Some(node.id.as_str()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.ring_color.to_css());
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&theme.node.name_color.to_css());
		ctx.set_font(&scale.name_font);
		let _ = ctx.fill_text(&node.name, x + radius + 6.0, y + 5.0);

		if let Some(label) = &node.relation_label {
			ctx.set_fill_style_str(&theme.node.relation_color.to_css());
			ctx.set_font(&scale.relation_font);
			let _ = ctx.fill_text(label, x + radius + 6.0, y + 22.0);
		}
	}
}
