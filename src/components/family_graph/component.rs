//! Leptos component wrapping the family graph canvas.
//!
//! Creates an HTML canvas, wires mouse/wheel handlers for dragging, panning,
//! and zooming, and runs one `requestAnimationFrame` loop that ticks the
//! layout simulation and redraws. The loop is owned by the component: a
//! shared flag is cleared on cleanup so no frame callback outlives the view,
//! and any change to the input graph rebuilds the simulation from default
//! positions.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::scale::ScaleConfig;
use super::state::GraphState;
use super::theme::Theme;
use super::types::{FamilyGraph, PersonNode};

/// Bundles the interactive state with visual configuration.
struct GraphContext {
	state: GraphState,
	scale: ScaleConfig,
	theme: Theme,
}

/// Screen position of a mouse event relative to the canvas.
fn event_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders an interactive family tree on a canvas element.
///
/// Pass the graph via the reactive `data` signal; any node or link change
/// restarts the layout from default positions. `on_node_click` fires with
/// the clicked person, `on_background_click` when empty canvas is clicked.
/// The `selected` signal drives the selection ring. The component sizes
/// itself to its parent container by default; set `fullscreen = true` to
/// fill the viewport and track window resizes.
#[component]
pub fn FamilyGraphCanvas(
	#[prop(into)] data: Signal<FamilyGraph>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_node_click: Callback<PersonNode>,
	#[prop(into)] on_background_click: Callback<()>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	// Atomic rather than Cell: on_cleanup requires a Send + Sync closure.
	let running = Arc::new(AtomicBool::new(true));

	// The loop must stop when the view unmounts, otherwise the frame
	// callback would keep mutating coordinates for a dead surface.
	let running_cleanup = running.clone();
	on_cleanup(move || running_cleanup.store(false, Ordering::Relaxed));

	let (context_init, animate_init, resize_cb_init, running_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		running.clone(),
	);
	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		// Input change after mount: restart the simulation, keep the
		// pan/zoom transform so edits do not snap the viewport back.
		if let Some(ref mut c) = *context_init.borrow_mut() {
			c.state.replace_graph(graph);
			c.state.selected = selected.get_untracked();
			return;
		}

		let window: Window = web_sys::window().unwrap();
		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut state = GraphState::new(graph, w, h);
		state.selected = selected.get_untracked();
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale: ScaleConfig::default(),
			theme: Theme::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, running_anim) = (
			context_init.clone(),
			animate_init.clone(),
			running_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !running_anim.load(Ordering::Relaxed) {
				return;
			}
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick();
				render::render(&c.state, &ctx, &c.scale, &c.theme);
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

	// Keep the renderer's selection ring in sync with the host.
	let context_sel = context.clone();
	Effect::new(move |_| {
		let id = selected.get();
		if let Some(ref mut c) = *context_sel.borrow_mut() {
			c.state.selected = id;
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut c) = *context_md.borrow_mut() {
			match c.state.node_at_position(x, y, &c.scale) {
				Some(index) => c.state.begin_drag(index, x, y),
				None => c.state.begin_pan(x, y),
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.active {
				c.state.drag_to(x, y);
			} else if c.state.pan.active {
				c.state.pan_to(x, y);
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		// Resolve the gesture inside the borrow, fire callbacks outside it:
		// a callback may update host signals that re-enter this component.
		let mut clicked_node: Option<PersonNode> = None;
		let mut clicked_background = false;
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag.active {
				if let Some(index) = c.state.end_drag() {
					clicked_node = c.state.graph.nodes.get(index).cloned();
				}
			} else if c.state.pan.active && c.state.end_pan() {
				clicked_background = true;
			}
		}
		if let Some(person) = clicked_node {
			on_node_click.run(person);
		} else if clicked_background {
			on_background_click.run(());
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.cancel_gestures();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="family-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
