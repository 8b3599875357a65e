use super::colors;
use super::highlight::HighlightState;
use super::paint::{PaintState, node_radius, paint_link_label, paint_node};
use super::state::ForceGraphState;
use super::surface::Surface;

const BACKGROUND: &str = "#000000";
const CURVATURE: f64 = 0.12;
const ARROW_LENGTH: f64 = 5.0;
const PARTICLE_RADIUS: f64 = 1.25;
const PARTICLE_SPEED: f64 = 0.24;
const PARTICLE_COLOR: &str = "rgba(99, 102, 241, 0.8)";

/// Draws one frame: background, edges, relation labels, then nodes with the
/// highlighted ones on top.
pub fn render<S: Surface + ?Sized>(state: &ForceGraphState, surface: &S, time_ms: f64) {
	surface.clear_rect(0.0, 0.0, state.width, state.height);
	surface.set_fill(BACKGROUND);
	surface.fill_rect(0.0, 0.0, state.width, state.height);

	surface.save();
	surface.translate(state.transform.x, state.transform.y);
	surface.scale(state.transform.k);

	let highlight = state.highlight.state();
	let k = state.transform.k;
	if k >= state.tier.show_edges_at_scale {
		draw_edges(state, surface, &highlight);
	}
	for link in &state.links {
		paint_link_label(link, surface, k, &state.tier);
	}

	let paint_state = PaintState {
		highlight: &highlight,
		tier: &state.tier,
		viewport: Some(state.viewport()),
		time_ms,
	};
	let on_top = |id: &str| highlight.is_hovered(id) || highlight.is_neighbor(id);
	for node in state.nodes.iter().filter(|n| !on_top(n.id.as_str())) {
		paint_node(node, surface, k, &paint_state);
	}
	for node in state.nodes.iter().filter(|n| on_top(n.id.as_str())) {
		paint_node(node, surface, k, &paint_state);
	}

	surface.restore();
}

/// Point on the quadratic curve from `a` to `b` through control `c`.
fn curve_point(a: (f64, f64), c: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
	let u = 1.0 - t;
	(
		u * u * a.0 + 2.0 * u * t * c.0 + t * t * b.0,
		u * u * a.1 + 2.0 * u * t * c.1 + t * t * b.1,
	)
}

fn draw_edges<S: Surface + ?Sized>(state: &ForceGraphState, surface: &S, highlight: &HighlightState) {
	let k = state.transform.k;
	let hovering = highlight.is_active();

	for (i, link) in state.links.iter().enumerate() {
		let (Some(a), Some(b)) = (link.source.position(), link.target.position()) else {
			continue;
		};
		let (dx, dy) = (b.0 - a.0, b.1 - a.1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let highlighted = highlight.highlight_links.contains(&i);
		let label = link.label.as_deref();
		let c = (
			(a.0 + b.0) / 2.0 - dy * CURVATURE,
			(a.1 + b.1) / 2.0 + dx * CURVATURE,
		);

		let dash: Vec<f64> = colors::link_dash(label).iter().map(|d| d / k).collect();
		surface.set_line_dash(&dash);
		surface.set_stroke(colors::link_color(label, hovering, highlighted));
		surface.set_line_width((if highlighted { 2.8 } else { 1.0 }) / k);
		surface.begin_path();
		surface.move_to(a.0, a.1);
		surface.quadratic_to(c.0, c.1, b.0, b.1);
		surface.stroke();
		surface.set_line_dash(&[]);

		// arrow tip sits on the target's rim, along the curve tangent
		let (tx, ty) = (b.0 - c.0, b.1 - c.1);
		let tlen = (tx * tx + ty * ty).sqrt().max(0.001);
		let (ux, uy) = (tx / tlen, ty / tlen);
		let rim = state
			.node_index(link.target_id())
			.map(|idx| node_radius(&state.nodes[idx]))
			.unwrap_or(0.0);
		let (tip_x, tip_y) = (b.0 - ux * rim, b.1 - uy * rim);
		let (back_x, back_y) = (tip_x - ux * ARROW_LENGTH, tip_y - uy * ARROW_LENGTH);
		let (px, py) = (-uy * ARROW_LENGTH * 0.5, ux * ARROW_LENGTH * 0.5);
		surface.set_fill(colors::link_color(label, hovering, highlighted));
		surface.begin_path();
		surface.move_to(tip_x, tip_y);
		surface.line_to(back_x + px, back_y + py);
		surface.line_to(back_x - px, back_y - py);
		surface.close_path();
		surface.fill();

		if highlighted && state.tier.particles_on_hover && state.tier.particle_count > 0 {
			let count = state.tier.particle_count as f64;
			surface.set_fill(PARTICLE_COLOR);
			for p in 0..state.tier.particle_count {
				let t = (state.flow_time * PARTICLE_SPEED + p as f64 / count).fract();
				let (x, y) = curve_point(a, c, b, t);
				surface.begin_path();
				surface.circle(x, y, PARTICLE_RADIUS);
				surface.fill();
			}
		}
	}
}
