//! Visual theming for the family graph.
//!
//! Color helpers plus the generation palette: the viewing user's
//! generation draws pink, ancestors indigo, descendants green.

/// RGBA color representation.
#[derive(Clone, Copy, Debug)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white).
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black).
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node fill colors keyed by generation sign.
#[derive(Clone, Debug)]
pub struct GenerationPalette {
	/// Generation 0, the viewing user's level.
	pub own: Color,
	/// Negative generations.
	pub ancestor: Color,
	/// Positive generations.
	pub descendant: Color,
}

/// Background style.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	pub color_secondary: Color,
	pub use_gradient: bool,
	/// Vignette darkness at the corners, 0 to disable.
	pub vignette: f64,
}

/// Node circle style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub border_color: Color,
	pub border_width: f64,
	pub use_gradient: bool,
	pub name_color: Color,
	pub relation_color: Color,
}

/// Relationship line style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Parent-of links, drawn with arrowheads.
	pub parent_color: Color,
	/// Spouse and sibling links.
	pub kin_color: Color,
	pub opacity: f64,
}

/// Complete theme for the family graph canvas.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
	pub palette: GenerationPalette,
	/// Selection ring color.
	pub ring_color: Color,
}

impl Theme {
	/// Fill color for a node at the given generation.
	pub fn generation_color(&self, generation: i32) -> Color {
		if generation == 0 {
			self.palette.own
		} else if generation < 0 {
			self.palette.ancestor
		} else {
			self.palette.descendant
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(15, 23, 42),
				color_secondary: Color::rgb(30, 41, 59),
				use_gradient: true,
				vignette: 0.25,
			},
			node: NodeStyle {
				border_color: Color::rgb(255, 255, 255),
				border_width: 2.0,
				use_gradient: true,
				name_color: Color::rgb(241, 245, 249),
				relation_color: Color::rgb(203, 213, 225),
			},
			edge: EdgeStyle {
				parent_color: Color::rgb(148, 163, 184),
				kin_color: Color::rgb(203, 213, 225),
				opacity: 0.6,
			},
			palette: GenerationPalette {
				own: Color::rgb(219, 39, 119),
				ancestor: Color::rgb(79, 70, 229),
				descendant: Color::rgb(5, 150, 105),
			},
			ring_color: Color::rgba(255, 255, 255, 0.9),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generation_color_splits_by_sign() {
		let theme = Theme::default();
		assert_eq!(theme.generation_color(0).to_css(), "#db2777");
		assert_eq!(theme.generation_color(-2).to_css(), "#4f46e5");
		assert_eq!(theme.generation_color(1).to_css(), "#059669");
	}

	#[test]
	fn css_output_switches_on_alpha() {
		assert_eq!(Color::rgb(15, 23, 42).to_css(), "#0f172a");
		assert_eq!(
			Color::rgba(255, 255, 255, 0.5).to_css(),
			"rgba(255, 255, 255, 0.5)"
		);
	}
}
