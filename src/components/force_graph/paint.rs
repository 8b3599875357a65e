//! Per-node and per-link painters.
//!
//! Nodes are composited from up to seven layers, each gated by zoom and
//! degree so that cost follows visible detail:
//! 1. wide halo (hubs and the hovered node, additive)
//! 2. soft color glow
//! 3. drop shadow (hubs)
//! 4. core fill
//! 5. inner highlight crescent
//! 6. border ring
//! 7. label pill

use super::colors::{self, DIMMED, HOVER_ACCENT, NEIGHBOR_ACCENT};
use super::highlight::HighlightState;
use super::surface::Surface;
use super::tier::TierConfig;
use super::types::{GraphLink, GraphNode};

pub const HIGH_DEGREE: u32 = 8;
pub const MED_DEGREE: u32 = 3;
/// Below this zoom nodes are flat dots.
pub const LOD_SCALE: f64 = 0.4;

const FONT_FAMILY: &str = "Inter, system-ui, -apple-system, sans-serif";

/// Visible area in graph coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub left: f64,
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
}

impl Viewport {
	fn excludes(&self, x: f64, y: f64, margin: f64) -> bool {
		x < self.left - margin
			|| x > self.right + margin
			|| y < self.top - margin
			|| y > self.bottom + margin
	}
}

/// Everything a node paint needs besides the node itself.
pub struct PaintState<'a> {
	pub highlight: &'a HighlightState,
	pub tier: &'a TierConfig,
	pub viewport: Option<Viewport>,
	/// Animation clock in milliseconds, drives the hub pulse.
	pub time_ms: f64,
}

fn degree(node: &GraphNode) -> u32 {
	node.connections.max(1)
}

/// Drawn radius of `node` in graph units.
pub fn node_radius(node: &GraphNode) -> f64 {
	let val = if node.val > 0.0 { node.val } else { 1.0 };
	let base = (val.sqrt() * 4.0).max(3.0);
	match degree(node) {
		d if d >= HIGH_DEGREE => base * 1.15,
		d if d <= 1 => base * 0.8,
		_ => base,
	}
}

/// Paints `node` onto `surface` at zoom `scale`. Nodes without a finite
/// position or outside the viewport issue no draw calls.
pub fn paint_node<S: Surface + ?Sized>(node: &GraphNode, surface: &S, scale: f64, state: &PaintState<'_>) {
	if !node.has_position() {
		return;
	}
	let (x, y) = (node.x, node.y);
	let degree = degree(node);
	let radius = node_radius(node);

	if let Some(viewport) = state.viewport {
		if viewport.excludes(x, y, radius + 30.0) {
			return;
		}
	}

	let highlight = state.highlight;
	let tier = state.tier;
	let raw = colors::group_color(node.group);
	let hovered = highlight.is_hovered(&node.id);
	let neighbor = !hovered && highlight.is_neighbor(&node.id);
	let dimmed = highlight.is_active() && !hovered && !neighbor;
	let hub = degree >= HIGH_DEGREE;

	let fill = if hovered {
		HOVER_ACCENT.to_string()
	} else if neighbor {
		NEIGHBOR_ACCENT.to_string()
	} else if dimmed {
		DIMMED.to_string()
	} else if degree <= 1 {
		colors::desaturate(raw, 0.45)
	} else if degree < MED_DEGREE {
		colors::desaturate(raw, 0.2)
	} else {
		raw.to_string()
	};

	if scale < LOD_SCALE && !hovered && !neighbor {
		surface.set_fill(&fill);
		surface.begin_path();
		surface.circle(x, y, (radius * 0.5).max(1.5));
		surface.fill();
		return;
	}

	// 1. halo
	if (hub || hovered) && !dimmed && scale > LOD_SCALE {
		let saved = surface.composite();
		surface.set_composite("lighter");

		let pulse = if hub && !hovered && tier.ambient_glow {
			0.02 * (0.5 + 0.5 * (state.time_ms / 1800.0 + x * 0.01).sin())
		} else {
			0.0
		};
		let halo_radius = radius * if hovered { 4.0 } else { 3.0 };
		let halo_alpha = if hovered { 0.12 } else { 0.05 + pulse };
		let halo_color = if hovered { HOVER_ACCENT } else { raw };
		let (from, to) = (colors::rgba(halo_color, halo_alpha), colors::rgba(halo_color, 0.0));
		surface.set_radial_fill(
			(x, y, radius * 0.3),
			(x, y, halo_radius),
			&[(0.0, from.as_str()), (1.0, to.as_str())],
		);
		surface.begin_path();
		surface.circle(x, y, halo_radius);
		surface.fill();

		surface.set_composite(&saved);
	}

	// 2. glow
	if !dimmed && tier.ambient_glow && scale > 0.5 {
		let glow_alpha = if hovered {
			0.28
		} else if neighbor {
			0.18
		} else if hub {
			0.10
		} else if degree >= MED_DEGREE {
			0.06
		} else {
			0.0
		};
		if glow_alpha > 0.0 {
			let glow_radius = radius
				* if hovered {
					2.8
				} else if neighbor {
					2.2
				} else {
					1.8
				};
			let color = if hovered {
				HOVER_ACCENT
			} else if neighbor {
				NEIGHBOR_ACCENT
			} else {
				raw
			};
			let (from, to) = (colors::rgba(color, glow_alpha), colors::rgba(color, 0.0));
			surface.set_radial_fill(
				(x, y, radius * 0.4),
				(x, y, glow_radius),
				&[(0.0, from.as_str()), (1.0, to.as_str())],
			);
			surface.begin_path();
			surface.circle(x, y, glow_radius);
			surface.fill();
		}
	}

	// 3. shadow
	if hub && !dimmed && scale > 0.7 {
		surface.set_fill("rgba(0,0,0,0.18)");
		surface.begin_path();
		surface.circle(x + 1.2, y + 1.2, radius + 0.5);
		surface.fill();
	}

	// 4. core
	surface.set_fill(&fill);
	surface.begin_path();
	surface.circle(x, y, radius);
	surface.fill();

	// 5. crescent
	if !dimmed && scale > 0.8 && degree >= MED_DEGREE {
		surface.set_radial_fill(
			(x, y - radius * 0.35, radius * 0.15),
			(x, y, radius),
			&[(0.0, "rgba(255,255,255,0.18)"), (1.0, "rgba(255,255,255,0)")],
		);
		surface.begin_path();
		surface.circle(x, y, radius);
		surface.fill();
	}

	// 6. border
	let (border, width) = if hovered {
		("rgba(255,255,255,0.9)", 2.0)
	} else if neighbor {
		("rgba(255,255,255,0.45)", 1.5)
	} else if dimmed {
		("rgba(255,255,255,0.06)", 0.5)
	} else if hub {
		("rgba(255,255,255,0.3)", 1.2)
	} else {
		("rgba(255,255,255,0.12)", 0.8)
	};
	surface.set_stroke(border);
	surface.set_line_width(width);
	surface.begin_path();
	surface.circle(x, y, radius);
	surface.stroke();

	// 7. label
	let show_label = hovered
		|| neighbor
		|| scale > tier.show_labels_at_scale
		|| (degree > tier.label_degree_threshold && scale > 1.0);
	if !show_label || dimmed {
		return;
	}

	let font_size = (11.0 / scale).clamp(9.0, 14.0);
	surface.set_font(&format!("500 {}px {}", font_size, FONT_FAMILY));
	surface.set_text_align("center");
	surface.set_text_baseline("middle");

	let text_width = surface.measure_text(&node.id);
	let (pad_x, pad_y) = (6.0, 4.0);
	let (pill_w, pill_h) = (text_width + pad_x * 2.0, font_size + pad_y * 2.0);
	let label_y = y - radius - pill_h / 2.0 - 4.0;

	surface.set_fill("rgba(10, 15, 28, 0.78)");
	surface.begin_path();
	surface.round_rect(x - pill_w / 2.0, label_y - pill_h / 2.0, pill_w, pill_h, pill_h / 2.0);
	surface.fill();

	let border_color = if hovered {
		HOVER_ACCENT
	} else if neighbor {
		NEIGHBOR_ACCENT
	} else {
		raw
	};
	surface.set_stroke(&colors::rgba(border_color, 0.25));
	surface.set_line_width(0.8);
	surface.stroke();

	surface.set_fill(if hovered {
		"rgba(255,255,255,0.95)"
	} else if neighbor {
		"rgba(255,255,255,0.88)"
	} else {
		"rgba(220,225,235,0.82)"
	});
	surface.fill_text(&node.id, x, label_y);
}

/// Paints the relation label at the midpoint of `link` once zoom passes the
/// tier's threshold. Links with unresolved ends are skipped.
pub fn paint_link_label<S: Surface + ?Sized>(link: &GraphLink, surface: &S, scale: f64, tier: &TierConfig) {
	if scale < tier.show_relation_labels_at_scale {
		return;
	}
	let Some(label) = link.label.as_deref().filter(|l| !l.is_empty()) else {
		return;
	};
	let (Some((sx, sy)), Some((tx, ty))) = (link.source.position(), link.target.position()) else {
		return;
	};
	let (mid_x, mid_y) = ((sx + tx) / 2.0, (sy + ty) / 2.0);

	let font_size = (9.0 / scale).clamp(7.0, 10.0);
	surface.set_font(&format!("400 {}px Inter, system-ui, sans-serif", font_size));

	let text_width = surface.measure_text(label);
	let (pill_w, pill_h) = (text_width + 10.0, font_size + 6.0);

	surface.set_fill("rgba(10, 15, 28, 0.82)");
	surface.begin_path();
	surface.round_rect(mid_x - pill_w / 2.0, mid_y - pill_h / 2.0, pill_w, pill_h, pill_h / 2.0);
	surface.fill();

	surface.set_stroke("rgba(100, 116, 139, 0.2)");
	surface.set_line_width(0.5);
	surface.stroke();

	surface.set_fill("rgba(180, 190, 205, 0.85)");
	surface.set_text_align("center");
	surface.set_text_baseline("middle");
	surface.fill_text(label, mid_x, mid_y);
}
