//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation. The simulation owns node
//! positions; after every tick they are copied into `nodes` and link ends are
//! resolved to positioned references for the painters.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::highlight::HighlightTracker;
use super::paint::{Viewport, node_radius};
use super::tier::TierConfig;
use super::types::{GraphData, GraphLink, GraphNode, LinkEnd, NodeGroup, NodeRef};

pub const MIN_ZOOM: f64 = 0.1;
/// Screen pixels a press may travel and still count as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;
pub const MAX_ZOOM: f64 = 10.0;
const EXPLOSION_SECS: f64 = 1.5;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to `MIN_ZOOM..=MAX_ZOOM`.
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	/// Set once the pointer travels past the click tolerance.
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
}

/// What the hover panel shows; the only hover data that goes through
/// reactive state.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverInfo {
	pub id: String,
	pub group: NodeGroup,
	pub connections: u32,
}

impl From<&GraphNode> for HoverInfo {
	fn from(node: &GraphNode) -> Self {
		Self {
			id: node.id.clone(),
			group: node.group,
			connections: node.connections,
		}
	}
}

/// Deterministic pseudo-random value in `[0, 1)`.
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

pub struct ForceGraphState {
	pub graph: ForceGraph<usize, ()>,
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
	pub tier: TierConfig,
	pub highlight: HighlightTracker,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	ticks: u32,
	explosion_t: Option<f64>,
	sim_idx: Vec<DefaultNodeIdx>,
	index_by_id: HashMap<String, usize>,
}

impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		tier: TierConfig,
		highlight: HighlightTracker,
		width: f64,
		height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: (1.0 - tier.velocity_decay) as f32,
		});
		let nodes = data.nodes.clone();
		let mut index_by_id = HashMap::with_capacity(nodes.len());
		let mut sim_idx = Vec::with_capacity(nodes.len());

		for (i, node) in nodes.iter().enumerate() {
			let (x, y) = if node.has_position() {
				(node.x, node.y)
			} else {
				let angle = (i as f64) * 2.0 * PI / nodes.len() as f64;
				(100.0 * angle.cos(), 100.0 * angle.sin())
			};
			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: i,
			});
			index_by_id.insert(node.id.clone(), i);
			sim_idx.push(idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (
				index_by_id.get(link.source_id()),
				index_by_id.get(link.target_id()),
			) {
				graph.add_edge(sim_idx[src], sim_idx[tgt], EdgeData::default());
			}
		}

		highlight.on_hover(None, &data.links);

		let mut state = Self {
			graph,
			nodes,
			links: data.links.clone(),
			tier,
			highlight,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			ticks: 0,
			explosion_t: None,
			sim_idx,
			index_by_id,
		};

		for _ in 0..tier.warmup_ticks {
			state.graph.update(0.016);
		}
		if tier.explosion_enabled {
			state.explode();
		}
		state.sync_positions();
		state
	}

	/// Pins every node at a scattered position; released after a short delay.
	fn explode(&mut self) {
		self.graph.visit_nodes_mut(|node| {
			let i = node.data.user_data;
			let angle = rand_simple(i * 2) * PI * 2.0;
			let distance = 100.0 + rand_simple(i * 2 + 1) * 300.0;
			node.data.x = (angle.cos() * distance) as f32;
			node.data.y = (angle.sin() * distance) as f32;
			node.data.is_anchor = true;
		});
		self.explosion_t = Some(0.0);
	}

	fn release_explosion(&mut self) {
		let dragged = self.drag.node.map(|i| self.sim_idx[i]);
		self.graph.visit_nodes_mut(|node| {
			if Some(node.index()) != dragged {
				node.data.is_anchor = false;
			}
		});
		self.explosion_t = None;
		self.sync_positions();
		self.fit_view(100.0);
	}

	/// Copies simulation positions into `nodes` and resolves link ends.
	pub fn sync_positions(&mut self) {
		let nodes = &mut self.nodes;
		self.graph.visit_nodes(|node| {
			if let Some(n) = nodes.get_mut(node.data.user_data) {
				n.x = node.x() as f64;
				n.y = node.y() as f64;
			}
		});
		for link in &mut self.links {
			resolve(&mut link.source, &self.nodes, &self.index_by_id);
			resolve(&mut link.target, &self.nodes, &self.index_by_id);
		}
	}

	pub fn tick(&mut self, dt: f32) {
		self.flow_time += dt as f64;
		if !self.animation_running {
			return;
		}
		self.graph.update(dt);
		self.ticks += 1;

		if let Some(t) = self.explosion_t.as_mut() {
			*t += dt as f64;
			if *t >= EXPLOSION_SECS {
				self.release_explosion();
			}
		}
		if self.explosion_t.is_none() && !self.drag.active && self.ticks >= self.tier.cooldown_ticks {
			self.animation_running = false;
		}
		self.sync_positions();
	}

	/// Restarts the simulation after the cooldown stopped it.
	pub fn reheat(&mut self) {
		self.ticks = 0;
		self.animation_running = true;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn viewport(&self) -> Viewport {
		let (left, top) = self.screen_to_graph(0.0, 0.0);
		let (right, bottom) = self.screen_to_graph(self.width, self.height);
		Viewport {
			left,
			top,
			right,
			bottom,
		}
	}

	/// Topmost node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.nodes.iter().rposition(|node| {
			let (dx, dy) = (node.x - gx, node.y - gy);
			node.has_position() && (dx * dx + dy * dy).sqrt() < node_radius(node) + 2.0
		})
	}

	pub fn node_index(&self, id: &str) -> Option<usize> {
		self.index_by_id.get(id).copied()
	}

	pub fn hovered(&self) -> Option<usize> {
		let state = self.highlight.state();
		state.hovered_id.as_deref().and_then(|id| self.node_index(id))
	}

	/// Updates the highlight cell. Returns whether the hovered node changed.
	pub fn set_hover(&mut self, node: Option<usize>) -> bool {
		if self.hovered() == node {
			return false;
		}
		self.highlight
			.on_hover(node.and_then(|i| self.nodes.get(i)), &self.links);
		true
	}

	pub fn hover_info(&self) -> Option<HoverInfo> {
		self.hovered().map(|i| HoverInfo::from(&self.nodes[i]))
	}

	pub fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		self.drag = DragState {
			active: true,
			node: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: self.nodes[idx].x,
			node_start_y: self.nodes[idx].y,
			moved: false,
		};
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node else {
			return;
		};
		if !self.drag.moved {
			let (mx, my) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if (mx * mx + my * my).sqrt() < CLICK_TOLERANCE {
				return;
			}
			self.drag.moved = true;
		}
		let (dx, dy) = (
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		let (nx, ny) = (
			(self.drag.node_start_x + dx) as f32,
			(self.drag.node_start_y + dy) as f32,
		);
		let target = self.sim_idx[idx];
		self.graph.visit_nodes_mut(|node| {
			if node.index() == target {
				node.data.x = nx;
				node.data.y = ny;
				node.data.is_anchor = true;
			}
		});
		self.reheat();
		self.sync_positions();
	}

	/// Ends a drag or pan. A press that never moved is a click on its node,
	/// which is returned.
	pub fn end_interaction(&mut self) -> Option<usize> {
		let clicked = self.drag.node.filter(|_| !self.drag.moved);
		self.drag = DragState::default();
		self.pan.active = false;
		clicked
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
	}

	/// Zooms by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	/// Centers the view on a graph position at zoom `k`.
	pub fn center_at(&mut self, gx: f64, gy: f64, k: f64) {
		let k = k.clamp(MIN_ZOOM, MAX_ZOOM);
		self.transform = ViewTransform {
			x: self.width / 2.0 - gx * k,
			y: self.height / 2.0 - gy * k,
			k,
		};
	}

	/// Centers on the node `id` at zoom `k`. Returns its index, or `None`
	/// when the id is unknown or the node has no position yet.
	pub fn center_on(&mut self, id: &str, k: f64) -> Option<usize> {
		let idx = self.node_index(id)?;
		let node = &self.nodes[idx];
		if !node.has_position() {
			return None;
		}
		let (x, y) = (node.x, node.y);
		self.center_at(x, y, k);
		Some(idx)
	}

	/// Fits every positioned node into the view with `padding` screen pixels.
	pub fn fit_view(&mut self, padding: f64) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		for node in self.nodes.iter().filter(|n| n.has_position()) {
			let (x0, y0, x1, y1) = bounds.unwrap_or((node.x, node.y, node.x, node.y));
			bounds = Some((x0.min(node.x), y0.min(node.y), x1.max(node.x), y1.max(node.y)));
		}
		let Some((x0, y0, x1, y1)) = bounds else {
			return;
		};
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let avail_w = (self.width - 2.0 * padding).max(1.0);
		let avail_h = (self.height - 2.0 * padding).max(1.0);
		let k = (avail_w / bw).min(avail_h / bh);
		self.center_at((x0 + x1) / 2.0, (y0 + y1) / 2.0, k);
	}
}

fn resolve(end: &mut LinkEnd, nodes: &[GraphNode], index_by_id: &HashMap<String, usize>) {
	let Some(&i) = index_by_id.get(end.id()) else {
		return;
	};
	let (x, y) = (nodes[i].x, nodes[i].y);
	match end {
		LinkEnd::Node(node) => {
			node.x = x;
			node.y = y;
		}
		LinkEnd::Id(id) => {
			let id = std::mem::take(id);
			*end = LinkEnd::Node(NodeRef { id, x, y });
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::loader::prepare;
	use crate::components::force_graph::tier::{LARGE, SMALL};

	fn data() -> GraphData {
		let mut data = GraphData {
			nodes: vec![
				GraphNode::new("Acme Corp", NodeGroup::Organization),
				GraphNode::new("Jane Doe", NodeGroup::Person),
				GraphNode::new("Contract 7", NodeGroup::Document),
			],
			links: vec![
				GraphLink::new("Jane Doe", "Acme Corp", Some("EMPLOYED_BY")),
				GraphLink::new("Contract 7", "Acme Corp", Some("REVISES")),
				GraphLink::new("Contract 7", "Nobody", None),
			],
		};
		prepare(&mut data);
		data
	}

	#[test]
	fn builds_and_resolves_links() {
		let state = ForceGraphState::new(&data(), LARGE, HighlightTracker::new(), 800.0, 600.0);
		assert_eq!(state.nodes.len(), 3);
		assert!(state.nodes.iter().all(|n| n.has_position()));
		assert!(state.links[0].source.position().is_some());
		assert!(state.links[0].target.position().is_some());
		// dangling end stays unresolved
		assert_eq!(state.links[2].target, LinkEnd::Id("Nobody".into()));
	}

	#[test]
	fn center_on_puts_node_mid_screen() {
		let mut state = ForceGraphState::new(&data(), LARGE, HighlightTracker::new(), 800.0, 600.0);
		let idx = state.center_on("Jane Doe", 4.0).expect("known node");
		let jane = &state.nodes[idx];
		let sx = jane.x * state.transform.k + state.transform.x;
		let sy = jane.y * state.transform.k + state.transform.y;
		assert!((sx - 400.0).abs() < 1e-6);
		assert!((sy - 300.0).abs() < 1e-6);
		assert_eq!(state.transform.k, 4.0);
		assert_eq!(state.center_on("Nobody", 4.0), None);
	}

	#[test]
	fn hover_through_hit_test() {
		let tracker = HighlightTracker::new();
		let mut state = ForceGraphState::new(&data(), LARGE, tracker.clone(), 800.0, 600.0);
		let jane = &state.nodes[1];
		let (sx, sy) = (
			jane.x * state.transform.k + state.transform.x,
			jane.y * state.transform.k + state.transform.y,
		);
		let hit = state.node_at_position(sx, sy);
		assert_eq!(hit, Some(1));
		assert!(state.set_hover(hit));
		assert!(!state.set_hover(hit));
		assert_eq!(tracker.state().hovered_id.as_deref(), Some("Jane Doe"));
		assert_eq!(state.hover_info().map(|h| h.connections), Some(1));
		assert!(state.set_hover(None));
		assert!(!tracker.state().is_active());
	}

	#[test]
	fn cooldown_stops_simulation() {
		let mut state = ForceGraphState::new(&data(), LARGE, HighlightTracker::new(), 800.0, 600.0);
		for _ in 0..LARGE.cooldown_ticks {
			state.tick(0.016);
		}
		assert!(!state.animation_running);
		let before = state.flow_time;
		state.tick(0.016);
		assert!(state.flow_time > before);
		state.reheat();
		assert!(state.animation_running);
	}

	#[test]
	fn explosion_pins_then_releases() {
		let mut state = ForceGraphState::new(&data(), SMALL, HighlightTracker::new(), 800.0, 600.0);
		let mut anchored = 0;
		state.graph.visit_nodes(|n| anchored += n.data.is_anchor as usize);
		assert_eq!(anchored, 3);
		for _ in 0..100 {
			state.tick(0.016);
		}
		let mut anchored = 0;
		state.graph.visit_nodes(|n| anchored += n.data.is_anchor as usize);
		assert_eq!(anchored, 0);
	}

	#[test]
	fn press_without_motion_is_a_click() {
		let mut state = ForceGraphState::new(&data(), LARGE, HighlightTracker::new(), 800.0, 600.0);
		let before = (state.nodes[0].x, state.nodes[0].y);
		state.begin_drag(0, 100.0, 100.0);
		state.drag_to(101.0, 101.0);
		assert_eq!((state.nodes[0].x, state.nodes[0].y), before);
		assert_eq!(state.end_interaction(), Some(0));

		state.begin_drag(0, 100.0, 100.0);
		state.drag_to(140.0, 100.0);
		assert!(state.drag.moved);
		assert!((state.nodes[0].x - (before.0 + 40.0)).abs() < 1e-3);
		assert_eq!(state.end_interaction(), None);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = ForceGraphState::new(&data(), LARGE, HighlightTracker::new(), 800.0, 600.0);
		state.zoom_by(1000.0);
		assert_eq!(state.transform.k, MAX_ZOOM);
		state.zoom_by(0.00001);
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn fit_view_contains_all_nodes() {
		let mut state = ForceGraphState::new(&data(), LARGE, HighlightTracker::new(), 800.0, 600.0);
		state.fit_view(80.0);
		let vp = state.viewport();
		for node in &state.nodes {
			assert!(node.x >= vp.left && node.x <= vp.right);
			assert!(node.y >= vp.top && node.y <= vp.bottom);
		}
	}
}
