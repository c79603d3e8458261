//! kin-graph: interactive family tree visualization.
//!
//! A WASM application that renders a family graph with a hierarchical
//! force-directed layout: generations form horizontal bands (ancestors
//! above, descendants below) while spring, repulsion, and collision forces
//! spread relatives apart. The canvas supports pan, zoom, node dragging,
//! and click selection; a side panel shows the selected person and offers
//! the add-relative and remove operations.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::family_graph::{
	FamilyGraph, FamilyGraphCanvas, NewRelative, PersonNode, RelationshipLink, RelationshipType,
	RelativeKind,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("kin-graph: logging initialized");
}

/// Load the family graph from a script element with id="family-data".
/// Expected format: JSON with { nodes: [...], links: [...] }.
fn load_family_data() -> Option<FamilyGraph> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("family-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<FamilyGraph>(&json_text) {
		Ok(graph) => {
			info!(
				"kin-graph: loaded {} people, {} relationships",
				graph.nodes.len(),
				graph.links.len()
			);
			Some(graph)
		}
		Err(e) => {
			warn!("kin-graph: failed to parse family data: {e}");
			None
		}
	}
}

/// Main application component.
///
/// Loads the family from the DOM (falling back to the built-in demo
/// family), renders the graph fullscreen, and overlays a profile panel for
/// the selected person.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph = RwSignal::new(load_family_data().unwrap_or_else(FamilyGraph::seed_family));
	let selected = RwSignal::new(None::<PersonNode>);

	let on_node_click = Callback::new(move |person: PersonNode| selected.set(Some(person)));
	let on_background_click = Callback::new(move |_: ()| selected.set(None));
	let selected_id = Signal::derive(move || selected.get().map(|p| p.id));

	let add_relative = move |kind: RelativeKind| {
		let Some(person) = selected.get_untracked() else {
			return;
		};
		let label = match kind {
			RelativeKind::Parent => "Parent",
			RelativeKind::Child => "Child",
			RelativeKind::Spouse => "Spouse",
			RelativeKind::Sibling => "Sibling",
		};
		graph.update(|g| {
			g.add_relative(
				&person.id,
				kind,
				NewRelative {
					name: format!("New {label}"),
					relation_label: Some(label.to_string()),
					..NewRelative::default()
				},
			);
		});
	};

	let remove_selected = move |_| {
		let Some(person) = selected.get_untracked() else {
			return;
		};
		graph.update(|g| {
			g.remove_node(&person.id);
		});
		selected.set(None);
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Family Tree" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<FamilyGraphCanvas
				data=graph
				selected=selected_id
				on_node_click=on_node_click
				on_background_click=on_background_click
				fullscreen=true
			/>
			<div class="graph-overlay">
				<h1>"Family Tree"</h1>
				<p class="subtitle">
					"Drag people to rearrange. Scroll to zoom. Drag the background to pan."
				</p>
			</div>
			{move || {
				selected
					.get()
					.map(|person| {
						view! {
							<aside class="profile-panel">
								<h2>{person.name.clone()}</h2>
								{person
									.relation_label
									.clone()
									.map(|label| view! { <p class="relation">{label}</p> })}
								<p class="bio">{person.bio.clone()}</p>
								<dl class="details">
									{person.age.clone().map(|v| view! { <dt>"Age"</dt> <dd>{v}</dd> })}
									{person
										.gender
										.clone()
										.map(|v| view! { <dt>"Gender"</dt> <dd>{v}</dd> })}
									{person
										.location
										.clone()
										.map(|v| view! { <dt>"Location"</dt> <dd>{v}</dd> })}
									{person
										.occupation
										.clone()
										.map(|v| view! { <dt>"Occupation"</dt> <dd>{v}</dd> })}
								</dl>
								{person
									.is_close_family
									.then(|| view! { <span class="badge">"Close family"</span> })}
								<div class="actions">
									<button on:click=move |_| add_relative(RelativeKind::Parent)>
										"Add parent"
									</button>
									<button on:click=move |_| add_relative(RelativeKind::Child)>
										"Add child"
									</button>
									<button on:click=move |_| add_relative(RelativeKind::Spouse)>
										"Add spouse"
									</button>
									<button on:click=move |_| add_relative(RelativeKind::Sibling)>
										"Add sibling"
									</button>
									<button class="danger" on:click=remove_selected>
										"Remove"
									</button>
								</div>
							</aside>
						}
					})
			}}
		</div>
	}
}
