//! Rendering-feature profiles selected by graph size.
//!
//! Large graphs progressively lose the expensive effects (glow layers, hover
//! particles, the opening scatter) and settle with fewer simulation ticks.

/// Size band of the loaded graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
	Small,
	Medium,
	Large,
}

/// Feature toggles and simulation constants for one [`Tier`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierConfig {
	pub tier: Tier,
	/// Inclusive upper bound on node count for this tier.
	pub max_nodes: usize,
	pub show_glow: bool,
	/// Hub pulse and soft color glow layers.
	pub ambient_glow: bool,
	/// Zoom above which every node gets a label.
	pub show_labels_at_scale: f64,
	/// Zoom below which edges are not drawn.
	pub show_edges_at_scale: f64,
	/// Zoom above which relation labels are drawn on links.
	pub show_relation_labels_at_scale: f64,
	pub particles_on_hover: bool,
	pub particle_count: u32,
	pub explosion_enabled: bool,
	/// Nodes with a degree above this get labels once zoom passes 1.0.
	pub label_degree_threshold: u32,
	pub velocity_decay: f64,
	pub warmup_ticks: u32,
	pub cooldown_ticks: u32,
}

pub const SMALL: TierConfig = TierConfig {
	tier: Tier::Small,
	max_nodes: 500,
	show_glow: true,
	ambient_glow: true,
	show_labels_at_scale: 1.5,
	show_edges_at_scale: 0.0,
	show_relation_labels_at_scale: 2.0,
	particles_on_hover: true,
	particle_count: 2,
	explosion_enabled: true,
	label_degree_threshold: 0,
	velocity_decay: 0.25,
	warmup_ticks: 50,
	cooldown_ticks: 200,
};

pub const MEDIUM: TierConfig = TierConfig {
	tier: Tier::Medium,
	max_nodes: 2000,
	show_glow: true,
	ambient_glow: true,
	show_labels_at_scale: 2.0,
	show_edges_at_scale: 0.0,
	show_relation_labels_at_scale: 2.5,
	particles_on_hover: true,
	particle_count: 1,
	explosion_enabled: false,
	label_degree_threshold: 2,
	velocity_decay: 0.35,
	warmup_ticks: 80,
	cooldown_ticks: 300,
};

pub const LARGE: TierConfig = TierConfig {
	tier: Tier::Large,
	max_nodes: usize::MAX,
	show_glow: false,
	ambient_glow: false,
	show_labels_at_scale: 2.5,
	show_edges_at_scale: 0.2,
	show_relation_labels_at_scale: 3.0,
	particles_on_hover: false,
	particle_count: 0,
	explosion_enabled: false,
	label_degree_threshold: 5,
	velocity_decay: 0.4,
	warmup_ticks: 100,
	cooldown_ticks: 400,
};

impl Default for TierConfig {
	fn default() -> Self {
		SMALL
	}
}

/// Picks the tier for `node_count`: up to 500 small, up to 2000 medium, else large.
pub fn select_tier(node_count: usize) -> TierConfig {
	if node_count <= SMALL.max_nodes {
		SMALL
	} else if node_count <= MEDIUM.max_nodes {
		MEDIUM
	} else {
		LARGE
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn thresholds() {
		assert_eq!(select_tier(0).tier, Tier::Small);
		assert_eq!(select_tier(500).tier, Tier::Small);
		assert_eq!(select_tier(501).tier, Tier::Medium);
		assert_eq!(select_tier(2000).tier, Tier::Medium);
		assert_eq!(select_tier(2001).tier, Tier::Large);
		assert_eq!(select_tier(usize::MAX).tier, Tier::Large);
	}

	#[test]
	fn monotonic_in_node_count() {
		let mut prev = select_tier(0).tier;
		for n in (0..5000).step_by(7) {
			let tier = select_tier(n).tier;
			assert!(tier >= prev, "tier went backwards at {n}");
			prev = tier;
		}
	}

	#[test]
	fn effects_shrink_with_size() {
		assert!(SMALL.explosion_enabled && !MEDIUM.explosion_enabled);
		assert!(MEDIUM.ambient_glow && !LARGE.ambient_glow);
		assert!(SMALL.particle_count > MEDIUM.particle_count);
		assert!(!LARGE.particles_on_hover);
		assert!(SMALL.cooldown_ticks < MEDIUM.cooldown_ticks && MEDIUM.cooldown_ticks < LARGE.cooldown_ticks);
	}
}
