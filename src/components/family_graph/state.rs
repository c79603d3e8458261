//! Interaction state for the family graph canvas.
//!
//! Owns the sanitized graph snapshot, the running layout simulation, the
//! pan/zoom view transform, and in-progress gesture tracking. The renderer
//! and event handlers read and drive this state; the simulation's position
//! buffers are mutated only through it.

use super::scale::{ScaleConfig, ScaledValues};
use super::sim::{LayoutConfig, Simulation};
use super::types::FamilyGraph;

/// Zoom bounds for the view transform.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;

/// Pointer movement (screen px) below which a press still counts as a click.
const CLICK_SLOP: f64 = 3.0;

/// Alpha target held while a node is being dragged.
const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Pan and zoom transform applied to the entire scene.
///
/// Purely a render-time affine transform; world coordinates are untouched.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to [`MIN_ZOOM`]..[`MAX_ZOOM`].
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

/// Core canvas state: graph snapshot, simulation, view, and gestures.
///
/// Created on mount and rebuilt whenever the input graph changes, so every
/// snapshot starts a fresh simulation from default positions.
pub struct GraphState {
	pub graph: FamilyGraph,
	pub sim: Simulation,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	/// Id of the currently selected person, for the renderer's ring.
	pub selected: Option<String>,
	pub width: f64,
	pub height: f64,
}

impl GraphState {
	/// Build state from a graph snapshot. Dangling links are filtered here
	/// so the simulation only ever sees a referentially intact snapshot.
	pub fn new(mut graph: FamilyGraph, width: f64, height: f64) -> Self {
		graph.retain_valid_links();
		let sim = Simulation::new(&graph, LayoutConfig::default());
		Self {
			graph,
			sim,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			selected: None,
			width,
			height,
		}
	}

	/// Swap in a new graph snapshot, restarting the simulation from
	/// default positions. The pan/zoom transform, canvas size, and
	/// selection survive the swap; in-flight gestures are dropped.
	pub fn replace_graph(&mut self, mut graph: FamilyGraph) {
		graph.retain_valid_links();
		self.sim = Simulation::new(&graph, LayoutConfig::default());
		self.graph = graph;
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	/// Convert screen coordinates to world coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Hit-test a screen position against the nodes' scaled hit radii.
	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		for (i, body) in self.sim.bodies().iter().enumerate() {
			let (dx, dy) = (body.x - gx, body.y - gy);
			if (dx * dx + dy * dy).sqrt() < scale.hit_radius {
				found = Some(i);
			}
		}
		found
	}

	/// Start dragging a node: pin it where it stands and reheat the
	/// simulation so neighbors keep adjusting.
	pub fn begin_drag(&mut self, index: usize, sx: f64, sy: f64) {
		let Some(body) = self.sim.bodies().get(index).copied() else {
			return;
		};
		self.drag = DragState {
			active: true,
			node: Some(index),
			start_x: sx,
			start_y: sy,
			moved: false,
		};
		self.sim.pin(index, body.x, body.y);
		self.sim.set_alpha_target(DRAG_ALPHA_TARGET);
	}

	/// Move the dragged node's pin to the pointer position.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		if !self.drag.active {
			return;
		}
		if (sx - self.drag.start_x).abs() > CLICK_SLOP
			|| (sy - self.drag.start_y).abs() > CLICK_SLOP
		{
			self.drag.moved = true;
		}
		if let Some(index) = self.drag.node {
			let (gx, gy) = self.screen_to_graph(sx, sy);
			self.sim.pin(index, gx, gy);
		}
	}

	/// End a drag: release the pin and let the simulation cool.
	/// Returns the node index if the gesture never left click slop, so the
	/// caller can treat it as a selection click.
	pub fn end_drag(&mut self) -> Option<usize> {
		if !self.drag.active {
			return None;
		}
		let clicked = (!self.drag.moved).then_some(self.drag.node).flatten();
		if let Some(index) = self.drag.node {
			self.sim.release(index);
		}
		self.sim.set_alpha_target(0.0);
		self.drag = DragState::default();
		clicked
	}

	/// Start panning the viewport.
	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
			moved: false,
		};
	}

	/// Update the viewport translation during a pan.
	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		if (sx - self.pan.start_x).abs() > CLICK_SLOP || (sy - self.pan.start_y).abs() > CLICK_SLOP
		{
			self.pan.moved = true;
		}
		self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
	}

	/// End a pan. Returns true if the gesture never left click slop, so the
	/// caller can treat it as a background click.
	pub fn end_pan(&mut self) -> bool {
		if !self.pan.active {
			return false;
		}
		let clicked = !self.pan.moved;
		self.pan = PanState::default();
		clicked
	}

	/// Zoom by a factor anchored at a screen position, clamping the scale.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Cancel any in-flight gesture, releasing pins.
	pub fn cancel_gestures(&mut self) {
		if let Some(index) = self.drag.node {
			self.sim.release(index);
			self.sim.set_alpha_target(0.0);
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
	}

	/// Advance the simulation one step if it is still hot.
	pub fn tick(&mut self) {
		if !self.sim.dormant() {
			self.sim.tick();
		}
	}

	/// Resize the canvas bounds without disturbing the layout.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::family_graph::types::{
		NewRelative, RelationshipLink, RelationshipType, RelativeKind,
	};

	fn state() -> GraphState {
		GraphState::new(FamilyGraph::seed_family(), 800.0, 600.0)
	}

	#[test]
	fn construction_filters_dangling_links() {
		let mut graph = FamilyGraph::seed_family();
		graph.links.push(RelationshipLink {
			source: "1".into(),
			target: "nobody".into(),
			kind: RelationshipType::SiblingOf,
		});
		let state = GraphState::new(graph, 800.0, 600.0);
		assert_eq!(state.graph.links.len(), 7);
	}

	#[test]
	fn drag_pins_to_the_pointer_and_release_frees() {
		let mut state = state();
		let index = state.sim.index_of("5").unwrap();
		state.begin_drag(index, 400.0, 300.0);
		state.drag_to(460.0, 220.0);
		let (gx, gy) = state.screen_to_graph(460.0, 220.0);
		for _ in 0..10 {
			state.tick();
			let body = state.sim.bodies()[index];
			assert_eq!((body.x, body.y), (gx, gy));
		}
		assert!(!state.sim.dormant());

		let clicked = state.end_drag();
		assert_eq!(clicked, None, "a moved drag is not a click");
		assert!(!state.drag.active);
	}

	#[test]
	fn press_and_release_without_movement_is_a_click() {
		let mut state = state();
		let index = state.sim.index_of("1").unwrap();
		state.begin_drag(index, 400.0, 300.0);
		state.drag_to(401.0, 300.5);
		assert_eq!(state.end_drag(), Some(index));
	}

	#[test]
	fn pan_without_movement_is_a_background_click() {
		let mut state = state();
		state.begin_pan(100.0, 100.0);
		state.pan_to(101.0, 100.0);
		assert!(state.end_pan());

		state.begin_pan(100.0, 100.0);
		state.pan_to(160.0, 140.0);
		assert_eq!(state.transform.x, 400.0 + 60.0);
		assert_eq!(state.transform.y, 300.0 + 40.0);
		assert!(!state.end_pan());
	}

	#[test]
	fn zoom_is_clamped_to_the_allowed_range() {
		let mut state = state();
		for _ in 0..100 {
			state.zoom_at(400.0, 300.0, 1.1);
		}
		assert!(state.transform.k <= MAX_ZOOM);
		for _ in 0..200 {
			state.zoom_at(400.0, 300.0, 0.9);
		}
		assert!(state.transform.k >= MIN_ZOOM);
	}

	#[test]
	fn zoom_keeps_the_anchor_point_fixed() {
		let mut state = state();
		let before = state.screen_to_graph(250.0, 180.0);
		state.zoom_at(250.0, 180.0, 1.1);
		let after = state.screen_to_graph(250.0, 180.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn replacing_the_graph_keeps_the_view_transform() {
		let mut state = state();
		state.zoom_at(200.0, 150.0, 1.1);
		state.begin_pan(100.0, 100.0);
		state.pan_to(160.0, 130.0);
		assert!(!state.end_pan());
		state.selected = Some("1".into());
		let before = (state.transform.x, state.transform.y, state.transform.k);

		let mut graph = state.graph.clone();
		graph.add_relative("1", RelativeKind::Sibling, NewRelative::default());
		state.replace_graph(graph);

		assert_eq!(state.sim.len(), 7);
		assert_eq!(
			(state.transform.x, state.transform.y, state.transform.k),
			before
		);
		assert_eq!(state.selected.as_deref(), Some("1"));
		assert!(!state.sim.dormant(), "a new snapshot starts hot");
	}

	#[test]
	fn hit_test_finds_a_node_under_the_cursor() {
		let mut state = state();
		// Settle so positions are stable, then aim at a known node.
		while !state.sim.dormant() {
			state.tick();
		}
		let index = state.sim.index_of("1").unwrap();
		let body = state.sim.bodies()[index];
		let (sx, sy) = (
			body.x * state.transform.k + state.transform.x,
			body.y * state.transform.k + state.transform.y,
		);
		let config = ScaleConfig::default();
		assert_eq!(state.node_at_position(sx, sy, &config), Some(index));
		assert_eq!(state.node_at_position(sx + 500.0, sy, &config), None);
	}
}
