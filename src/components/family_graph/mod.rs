//! Family tree visualization component.
//!
//! Renders an interactive, hierarchically laid-out family graph on an HTML
//! canvas:
//! - Physics-based positioning with generation bands (ancestors above,
//!   descendants below) via a custom force simulation
//! - Pan, zoom, and node dragging with pin-and-reheat semantics
//! - Click selection with host callbacks
//! - Relationship-aware styling: arrowheads on parent links, dashes on
//!   spouse links, generation-colored nodes
//!
//! # Example
//!
//! ```ignore
//! use kin_graph::{FamilyGraphCanvas, FamilyGraph};
//!
//! let graph = RwSignal::new(FamilyGraph::seed_family());
//! let selected = RwSignal::new(None::<String>);
//!
//! view! {
//!     <FamilyGraphCanvas
//!         data=graph
//!         selected=selected
//!         on_node_click=move |person| log::info!("clicked {}", person.name)
//!         on_background_click=move |_| {}
//!         fullscreen=true
//!     />
//! }
//! ```

mod component;
mod render;
pub mod scale;
pub mod sim;
mod state;
pub mod theme;
mod types;

pub use component::FamilyGraphCanvas;
pub use sim::{LayoutConfig, Simulation};
pub use theme::Theme;
pub use types::{
	FamilyGraph, NewRelative, PersonNode, RelationshipLink, RelationshipType, RelativeKind,
};
