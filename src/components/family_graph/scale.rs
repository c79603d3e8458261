//! Zoom-dependent scaling configuration for the graph visuals.
//!
//! Centralizes how each visual element behaves across the zoom range so the
//! renderer never hand-computes sizes.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the simulation's coordinate system. Values scale
//!   proportionally with zoom.
//! - **Screen-space**: pixel coordinates on the canvas, constant regardless
//!   of zoom level.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "World/Screen variants complete the API for users customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Compute the world-space value for a base value at zoom level `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => {
				// screen_size = world_size * k, so bounds divide by k.
				let min_world = min_screen / k;
				let max_world = max_screen / k;
				base.clamp(min_world, max_world)
			}
		}
	}
}

/// Defines how alpha/opacity scales with zoom level.
#[derive(Clone, Debug)]
#[allow(dead_code, reason = "Constant variant available for custom alpha behaviors")]
pub enum AlphaBehavior {
	/// Constant alpha regardless of zoom.
	Constant,
	/// Alpha scales linearly with zoom, clamped to [0, 1].
	ScaleWithZoom,
	/// Fully visible at `full_alpha_k`, fading to zero at `zero_alpha_k`.
	Fade {
		zero_alpha_k: f64,
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Compute the alpha multiplier for a zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::ScaleWithZoom => k.clamp(0.0, 1.0),
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				let t = (k - zero_alpha_k) / (full_alpha_k - zero_alpha_k);
				t.clamp(0.0, 1.0)
			}
		}
	}
}

/// Configuration for node circle and label scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Base node radius in world units.
	pub radius: f64,
	/// How the node radius scales with zoom.
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// How hit radius scales with zoom.
	pub hit_behavior: ScaleBehavior,
	/// Name label font size in screen pixels.
	pub name_size: f64,
	/// Relation label font size in screen pixels.
	pub relation_size: f64,
	/// Minimum zoom level for label font scaling.
	pub label_min_k: f64,
}

/// Configuration for relationship line scaling.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Base line width in screen pixels.
	pub line_width: f64,
	/// Dash pattern for spouse links (dash, gap) in world units.
	pub spouse_dash: (f64, f64),
	/// Dash visibility across zoom; dashes collapse to solid when faded.
	pub dash_alpha_behavior: AlphaBehavior,
}

/// Configuration for parent-link arrowhead scaling.
#[derive(Clone, Debug)]
pub struct ArrowScaleConfig {
	/// Base arrow size in world units.
	pub size: f64,
	/// How arrow size scales with zoom.
	pub size_behavior: ScaleBehavior,
	/// How arrow alpha scales with zoom.
	pub alpha_behavior: AlphaBehavior,
	/// Minimum alpha to bother drawing.
	pub cull_alpha: f64,
}

/// Configuration for the selection ring.
#[derive(Clone, Debug)]
pub struct SelectionScaleConfig {
	/// Ring stroke width in screen pixels.
	pub ring_width: f64,
	/// Ring offset from the node edge in screen pixels.
	pub ring_offset: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
	pub arrow: ArrowScaleConfig,
	pub selection: SelectionScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 22.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 26.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 8.0,
					max_screen: f64::INFINITY,
				},
				name_size: 14.0,
				relation_size: 11.0,
				label_min_k: 0.5,
			},
			edge: EdgeScaleConfig {
				line_width: 2.0,
				spouse_dash: (5.0, 5.0),
				dash_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.3,
					full_alpha_k: 0.8,
				},
			},
			arrow: ArrowScaleConfig {
				size: 8.0,
				size_behavior: ScaleBehavior::Clamped {
					min_screen: 0.0,
					max_screen: 20.0,
				},
				alpha_behavior: AlphaBehavior::ScaleWithZoom,
				cull_alpha: 0.05,
			},
			selection: SelectionScaleConfig {
				ring_width: 2.0,
				ring_offset: 4.0,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create once per frame and pass to the rendering functions. All sizes are
/// in world-space, ready to use after the canvas transform.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Node radius in world-space.
	pub node_radius: f64,
	/// Hit detection radius in world-space.
	pub hit_radius: f64,
	/// Name label font string, e.g. "600 14px sans-serif".
	pub name_font: String,
	/// Relation label font string.
	pub relation_font: String,
	/// Line width in world-space.
	pub line_width: f64,
	/// Spouse dash pattern in world units.
	pub spouse_dash: (f64, f64),
	/// Dash visibility [0, 1]. At 0 spouse links draw solid.
	pub dash_alpha: f64,
	/// Arrow size in world-space.
	pub arrow_size: f64,
	/// Arrow alpha multiplier [0, 1].
	pub arrow_alpha: f64,
	/// Whether to skip arrowheads entirely at this zoom.
	pub cull_arrows: bool,
	/// Selection ring width in world-space.
	pub ring_width: f64,
	/// Selection ring offset in world-space.
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let arrow_alpha = config.arrow.alpha_behavior.apply(k);
		let label_k = k.max(config.node.label_min_k);
		Self {
			k,
			node_radius: config.node.radius_behavior.apply(config.node.radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			name_font: format!("600 {}px sans-serif", config.node.name_size / label_k),
			relation_font: format!(
				"italic {}px sans-serif",
				config.node.relation_size / label_k
			),
			line_width: config.edge.line_width / k,
			spouse_dash: config.edge.spouse_dash,
			dash_alpha: config.edge.dash_alpha_behavior.apply(k),
			arrow_size: config.arrow.size_behavior.apply(config.arrow.size, k),
			arrow_alpha,
			cull_arrows: arrow_alpha < config.arrow.cull_alpha,
			ring_width: config.selection.ring_width / k,
			ring_offset: config.selection.ring_offset / k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_behavior_respects_screen_bounds() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 6.0,
			max_screen: 30.0,
		};
		// Zoomed far out, the world size grows to keep 6 screen px.
		assert_eq!(behavior.apply(22.0, 0.1), 60.0);
		// At 1x the base is within bounds.
		assert_eq!(behavior.apply(22.0, 1.0), 22.0);
		// Zoomed in, clamped to 30 screen px.
		assert_eq!(behavior.apply(22.0, 4.0), 7.5);
	}

	#[test]
	fn fade_alpha_interpolates_between_thresholds() {
		let fade = AlphaBehavior::Fade {
			zero_alpha_k: 0.3,
			full_alpha_k: 0.8,
		};
		assert_eq!(fade.apply(0.2), 0.0);
		assert_eq!(fade.apply(0.8), 1.0);
		let mid = fade.apply(0.55);
		assert!((mid - 0.5).abs() < 1e-9);
	}
}
