//! Hierarchical force-directed layout simulation.
//!
//! An iterative velocity-based relaxation in the manner of d3-force: each
//! tick combines link attraction, pairwise repulsion, collision separation,
//! centering, and a generation band force, then damps velocity and
//! integrates. The simulation cools by decaying its alpha parameter and
//! goes dormant once alpha falls below a threshold; dragging a node pins it
//! in place and raises the alpha target so the rest of the graph keeps
//! adjusting around it.
//!
//! Mutable state lives in an index-based [`Body`] store parallel to the
//! immutable node list. Domain entities are never mutated.

use std::collections::HashMap;

use super::types::{FamilyGraph, RelationshipType};

/// Positional override for a node during user interaction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Pin {
	/// The node moves freely under the simulation forces.
	#[default]
	Free,
	/// The node is held at a fixed position; forces are ignored.
	Pinned { x: f64, y: f64 },
}

/// Mutable simulation state for one node, addressed by index.
#[derive(Clone, Copy, Debug, Default)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub pin: Pin,
}

/// A link resolved to body indices, with its d3-style strength split.
#[derive(Clone, Copy, Debug)]
struct ResolvedLink {
	source: usize,
	target: usize,
	kind: RelationshipType,
	/// 1 / min(degree(source), degree(target)), so high-degree nodes are
	/// not over-constrained.
	strength: f64,
	/// Share of the correction applied to the target endpoint.
	bias: f64,
}

/// Resolved world-space endpoints of one link, for the renderer.
#[derive(Clone, Copy, Debug)]
pub struct LinkSegment {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub kind: RelationshipType,
}

/// Tunable constants for the layout forces.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Rest length of the link spring force.
	pub link_distance: f64,
	/// Pairwise repulsion strength (negative repels).
	pub charge_strength: f64,
	/// Minimum separation between node centers.
	pub collide_radius: f64,
	/// Pull of the free-node centroid toward the origin, per tick.
	pub center_strength: f64,
	/// Vertical distance between adjacent generations.
	pub generation_spacing: f64,
	/// Strength of the pull toward a node's generation band.
	pub generation_strength: f64,
	/// Weak pull toward x = 0 when nothing else constrains a node.
	pub horizontal_strength: f64,
	/// Alpha below which the simulation is dormant.
	pub alpha_min: f64,
	/// Geometric decay applied to alpha each tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			link_distance: 100.0,
			charge_strength: -500.0,
			collide_radius: 45.0,
			center_strength: 0.05,
			generation_spacing: 120.0,
			generation_strength: 0.5,
			horizontal_strength: 0.02,
			alpha_min: 0.001,
			// Reaches alpha_min after ~300 ticks from a cold start.
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			velocity_decay: 0.4,
		}
	}
}

/// Golden angle, used for deterministic initial placement.
const INITIAL_ANGLE: f64 = std::f64::consts::PI * (3.0 - 2.236_067_977_499_79);

/// One running layout simulation over a graph snapshot.
///
/// Construct it from a snapshot whose links have been filtered for
/// referential integrity ([`FamilyGraph::retain_valid_links`]); links whose
/// endpoints cannot be resolved are skipped. Positions update in place on
/// every [`tick`](Self::tick) until the simulation goes
/// [`dormant`](Self::dormant).
pub struct Simulation {
	ids: Vec<String>,
	generations: Vec<i32>,
	bodies: Vec<Body>,
	links: Vec<ResolvedLink>,
	config: LayoutConfig,
	alpha: f64,
	alpha_target: f64,
}

impl Simulation {
	/// Build a simulation from a graph snapshot, starting every node at a
	/// deterministic default position in its generation band.
	pub fn new(graph: &FamilyGraph, config: LayoutConfig) -> Self {
		let mut id_to_index = HashMap::with_capacity(graph.nodes.len());
		for (i, node) in graph.nodes.iter().enumerate() {
			id_to_index.insert(node.id.as_str(), i);
		}

		// Degree counts drive link strength normalization.
		let mut degrees = vec![0usize; graph.nodes.len()];
		for link in &graph.links {
			if let (Some(&s), Some(&t)) = (
				id_to_index.get(link.source.as_str()),
				id_to_index.get(link.target.as_str()),
			) {
				degrees[s] += 1;
				degrees[t] += 1;
			}
		}

		let links = graph
			.links
			.iter()
			.filter_map(|link| {
				let (&s, &t) = (
					id_to_index.get(link.source.as_str())?,
					id_to_index.get(link.target.as_str())?,
				);
				let (ds, dt) = (degrees[s].max(1) as f64, degrees[t].max(1) as f64);
				Some(ResolvedLink {
					source: s,
					target: t,
					kind: link.kind,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				})
			})
			.collect();

		// Phyllotaxis spiral around each node's generation band: spreads
		// coincident starts apart without randomness, so layouts are
		// reproducible across runs.
		let bodies = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let radius = config.collide_radius * (0.5 + i as f64).sqrt();
				let angle = i as f64 * INITIAL_ANGLE;
				Body {
					x: radius * angle.cos(),
					y: node.generation as f64 * config.generation_spacing
						+ radius.min(config.generation_spacing * 0.3) * angle.sin() * 0.25,
					..Body::default()
				}
			})
			.collect::<Vec<_>>();

		// An empty graph has nothing to relax; start dormant.
		let alpha = if bodies.is_empty() { 0.0 } else { 1.0 };

		Self {
			ids: graph.nodes.iter().map(|n| n.id.clone()).collect(),
			generations: graph.nodes.iter().map(|n| n.generation).collect(),
			bodies,
			links,
			config,
			alpha,
			alpha_target: 0.0,
		}
	}

	/// Number of simulated nodes.
	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	/// True when the simulation has no nodes.
	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	/// Current simulation heat.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// True once alpha has cooled below the threshold and no reheat target
	/// is holding the simulation awake. Ticking a dormant simulation is a
	/// no-op for the caller's purposes; positions are inert.
	pub fn dormant(&self) -> bool {
		self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
	}

	/// Raise (or clear) the alpha floor the simulation decays toward.
	/// A target of 0.3 keeps it live during a drag; 0.0 lets it cool.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Index of a node id, if present in this snapshot.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.ids.iter().position(|i| i == id)
	}

	/// Read access to the body store, parallel to the snapshot's node list.
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// Per-node positions as `(id, x, y)`.
	pub fn positions(&self) -> impl Iterator<Item = (&str, f64, f64)> + '_ {
		self.ids
			.iter()
			.zip(&self.bodies)
			.map(|(id, b)| (id.as_str(), b.x, b.y))
	}

	/// Resolved link endpoints for the renderer.
	pub fn link_segments(&self) -> impl Iterator<Item = LinkSegment> + '_ {
		self.links.iter().map(|link| {
			let (s, t) = (&self.bodies[link.source], &self.bodies[link.target]);
			LinkSegment {
				x1: s.x,
				y1: s.y,
				x2: t.x,
				y2: t.y,
				kind: link.kind,
			}
		})
	}

	/// Pin a node to a fixed position. Takes effect immediately and holds
	/// through every subsequent tick until [`release`](Self::release).
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(index) {
			body.pin = Pin::Pinned { x, y };
			body.x = x;
			body.y = y;
			body.vx = 0.0;
			body.vy = 0.0;
		}
	}

	/// Release a pinned node back to free movement.
	pub fn release(&mut self, index: usize) {
		if let Some(body) = self.bodies.get_mut(index) {
			body.pin = Pin::Free;
		}
	}

	/// Advance the simulation one step.
	pub fn tick(&mut self) {
		if self.bodies.is_empty() {
			return;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		let alpha = self.alpha;

		self.apply_links(alpha);
		self.apply_repulsion(alpha);
		self.apply_collisions();
		self.apply_centering(alpha);
		self.apply_generation_bands(alpha);
		self.apply_horizontal_pull(alpha);
		self.integrate();
	}

	/// Spring force pulling link endpoints toward the rest distance, with
	/// the correction split by relative degree so hubs move less.
	fn apply_links(&mut self, alpha: f64) {
		for link in &self.links {
			let (s, t) = (self.bodies[link.source], self.bodies[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 && dy == 0.0 {
				dx = jiggle(link.source + link.target);
				dy = jiggle(link.source * 31 + link.target);
			}
			let len = (dx * dx + dy * dy).sqrt();
			let l = (len - self.config.link_distance) / len * alpha * link.strength;
			dx *= l;
			dy *= l;
			self.bodies[link.target].vx -= dx * link.bias;
			self.bodies[link.target].vy -= dy * link.bias;
			self.bodies[link.source].vx += dx * (1.0 - link.bias);
			self.bodies[link.source].vy += dy * (1.0 - link.bias);
		}
	}

	/// Inverse-distance-squared repulsion between every pair of nodes.
	fn apply_repulsion(&mut self, alpha: f64) {
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = self.bodies[j].x - self.bodies[i].x;
				let dy = self.bodies[j].y - self.bodies[i].y;
				let d2 = (dx * dx + dy * dy).max(1.0);
				// Negative charge: w points each node away from the other.
				let w = self.config.charge_strength * alpha / d2;
				self.bodies[i].vx += dx * w;
				self.bodies[i].vy += dy * w;
				self.bodies[j].vx -= dx * w;
				self.bodies[j].vy -= dy * w;
			}
		}
	}

	/// Hard minimum-separation constraint, resolved positionally so close
	/// overlap cannot survive a tick. Pinned bodies do not move; their
	/// counterpart absorbs the full correction.
	fn apply_collisions(&mut self) {
		let min_dist = self.config.collide_radius;
		let n = self.bodies.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let mut dx = self.bodies[j].x - self.bodies[i].x;
				let mut dy = self.bodies[j].y - self.bodies[i].y;
				let mut dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_dist {
					continue;
				}
				if dist < 1e-6 {
					dx = jiggle(i + j);
					dy = jiggle(i * 31 + j);
					dist = (dx * dx + dy * dy).sqrt();
				}
				let overlap = (min_dist - dist) / dist;
				let (i_free, j_free) = (
					self.bodies[i].pin == Pin::Free,
					self.bodies[j].pin == Pin::Free,
				);
				let (wi, wj) = match (i_free, j_free) {
					(true, true) => (0.5, 0.5),
					(true, false) => (1.0, 0.0),
					(false, true) => (0.0, 1.0),
					(false, false) => continue,
				};
				self.bodies[i].x -= dx * overlap * wi;
				self.bodies[i].y -= dy * overlap * wi;
				self.bodies[j].x += dx * overlap * wj;
				self.bodies[j].y += dy * overlap * wj;
			}
		}
	}

	/// Shift the free nodes so their centroid drifts toward the origin.
	/// Weak and alpha-scaled so it never fights the generation bands: once
	/// the simulation cools it stops pulling nodes off their bands.
	fn apply_centering(&mut self, alpha: f64) {
		let free: Vec<usize> = (0..self.bodies.len())
			.filter(|&i| self.bodies[i].pin == Pin::Free)
			.collect();
		if free.is_empty() {
			return;
		}
		let inv = 1.0 / free.len() as f64;
		let cx: f64 = free.iter().map(|&i| self.bodies[i].x).sum::<f64>() * inv;
		let cy: f64 = free.iter().map(|&i| self.bodies[i].y).sum::<f64>() * inv;
		let (sx, sy) = (
			cx * self.config.center_strength * alpha,
			cy * self.config.center_strength * alpha,
		);
		for &i in &free {
			self.bodies[i].x -= sx;
			self.bodies[i].y -= sy;
		}
	}

	/// The hierarchy force: pull each node toward y = generation x spacing.
	fn apply_generation_bands(&mut self, alpha: f64) {
		let strength = self.config.generation_strength;
		for (body, &generation) in self.bodies.iter_mut().zip(&self.generations) {
			let target = generation as f64 * self.config.generation_spacing;
			body.vy += (target - body.y) * strength * alpha;
		}
	}

	/// Weak pull toward x = 0 for nodes with no stronger horizontal
	/// constraint.
	fn apply_horizontal_pull(&mut self, alpha: f64) {
		let strength = self.config.horizontal_strength;
		for body in &mut self.bodies {
			body.vx += (0.0 - body.x) * strength * alpha;
		}
	}

	/// Damp velocities and advance positions; pinned bodies snap exactly to
	/// their pin so overrides win over every force.
	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		for body in &mut self.bodies {
			match body.pin {
				Pin::Pinned { x, y } => {
					body.x = x;
					body.y = y;
					body.vx = 0.0;
					body.vy = 0.0;
				}
				Pin::Free => {
					body.vx *= keep;
					body.vy *= keep;
					body.x += body.vx;
					body.y += body.vy;
				}
			}
		}
	}
}

/// Deterministic sub-unit offset used to break exact coincidence.
fn jiggle(seed: usize) -> f64 {
	let x = ((seed as f64 + 1.0) * 12.9898).sin() * 43758.5453;
	(x - x.floor()) * 1e-3 - 5e-4
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::family_graph::types::{PersonNode, RelationshipLink};

	fn run_to_rest(sim: &mut Simulation) {
		let mut guard = 0;
		while !sim.dormant() {
			sim.tick();
			guard += 1;
			assert!(guard < 2000, "simulation failed to go dormant");
		}
	}

	fn seeded() -> Simulation {
		Simulation::new(&FamilyGraph::seed_family(), LayoutConfig::default())
	}

	#[test]
	fn alpha_decays_monotonically_until_dormant() {
		let mut sim = seeded();
		let mut previous = sim.alpha();
		let mut ticks = 0;
		while !sim.dormant() {
			sim.tick();
			assert!(sim.alpha() < previous);
			previous = sim.alpha();
			ticks += 1;
			assert!(ticks < 2000);
		}
		assert!(sim.alpha() < LayoutConfig::default().alpha_min);
	}

	#[test]
	fn nodes_settle_into_their_generation_bands() {
		let mut sim = seeded();
		run_to_rest(&mut sim);
		let graph = FamilyGraph::seed_family();
		for (id, _, y) in sim.positions() {
			let generation = graph.node(id).unwrap().generation as f64;
			let target = generation * 120.0;
			assert!(
				(y - target).abs() <= 60.0,
				"node {id} at y={y:.1}, band {target:.0}"
			);
		}
	}

	#[test]
	fn settled_nodes_respect_the_collision_radius() {
		let mut sim = seeded();
		run_to_rest(&mut sim);
		let points: Vec<(f64, f64)> = sim.positions().map(|(_, x, y)| (x, y)).collect();
		for i in 0..points.len() {
			for j in (i + 1)..points.len() {
				let (dx, dy) = (points[j].0 - points[i].0, points[j].1 - points[i].1);
				let dist = (dx * dx + dy * dy).sqrt();
				assert!(dist >= 45.0 - 1.0, "nodes {i} and {j} at distance {dist:.2}");
			}
		}
	}

	#[test]
	fn pinned_node_reports_its_pin_exactly_until_release() {
		let mut sim = seeded();
		let idx = sim.index_of("4").unwrap();
		sim.set_alpha_target(0.3);
		sim.pin(idx, 250.0, -80.0);
		for _ in 0..50 {
			sim.tick();
			let body = sim.bodies()[idx];
			assert_eq!((body.x, body.y), (250.0, -80.0));
		}
		assert!(!sim.dormant());

		sim.release(idx);
		sim.set_alpha_target(0.0);
		sim.tick();
		assert_eq!(sim.bodies()[idx].pin, Pin::Free);
		run_to_rest(&mut sim);
	}

	#[test]
	fn reheating_wakes_a_dormant_simulation() {
		let mut sim = seeded();
		run_to_rest(&mut sim);
		assert!(sim.dormant());

		sim.set_alpha_target(0.3);
		assert!(!sim.dormant());
		let cold = sim.alpha();
		sim.tick();
		assert!(sim.alpha() > cold);

		sim.set_alpha_target(0.0);
		run_to_rest(&mut sim);
	}

	#[test]
	fn empty_graph_is_immediately_dormant() {
		let mut sim = Simulation::new(&FamilyGraph::default(), LayoutConfig::default());
		assert!(sim.dormant());
		sim.tick();
		assert!(sim.is_empty());
	}

	#[test]
	fn isolated_node_settles_at_its_band_near_the_center() {
		let graph = FamilyGraph {
			nodes: vec![PersonNode {
				id: "solo".into(),
				name: "Solo".into(),
				generation: -2,
				..PersonNode::default()
			}],
			links: vec![],
		};
		let mut sim = Simulation::new(&graph, LayoutConfig::default());
		run_to_rest(&mut sim);
		let (_, x, y) = sim.positions().next().unwrap();
		assert!((y - -240.0).abs() <= 60.0, "y={y:.1}");
		assert!(x.abs() <= 60.0, "x={x:.1}");
	}

	#[test]
	fn dangling_links_are_skipped_at_construction() {
		let mut graph = FamilyGraph::seed_family();
		graph.links.push(RelationshipLink {
			source: "1".into(),
			target: "ghost".into(),
			kind: RelationshipType::SiblingOf,
		});
		let sim = Simulation::new(&graph, LayoutConfig::default());
		assert_eq!(sim.link_segments().count(), 7);
	}

	#[test]
	fn snapshot_roundtrip_preserves_layout_properties() {
		let graph = FamilyGraph::seed_family();
		let json = serde_json::to_string(&graph).unwrap();
		let restored: FamilyGraph = serde_json::from_str(&json).unwrap();

		let mut sim = Simulation::new(&restored, LayoutConfig::default());
		run_to_rest(&mut sim);
		for (id, _, y) in sim.positions() {
			let generation = restored.node(id).unwrap().generation as f64;
			assert!((y - generation * 120.0).abs() <= 60.0);
		}
		let points: Vec<(f64, f64)> = sim.positions().map(|(_, x, y)| (x, y)).collect();
		for i in 0..points.len() {
			for j in (i + 1)..points.len() {
				let (dx, dy) = (points[j].0 - points[i].0, points[j].1 - points[i].1);
				assert!((dx * dx + dy * dy).sqrt() >= 44.0);
			}
		}
	}
}
