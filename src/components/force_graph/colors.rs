//! Palette and color helpers for nodes and links.

use super::types::NodeGroup;

pub const HOVER_ACCENT: &str = "#10B981";
pub const NEIGHBOR_ACCENT: &str = "#6366F1";
pub const DIMMED: &str = "rgba(100,116,139,0.25)";

/// Base color for each entity group.
pub fn group_color(group: NodeGroup) -> &'static str {
	match group {
		NodeGroup::Person => "#34D399",
		NodeGroup::Organization => "#FBBF24",
		NodeGroup::Statute => "#A78BFA",
		NodeGroup::Date => "#22D3EE",
		NodeGroup::Document => "#F472B6",
		NodeGroup::Entity => "#94A3B8",
	}
}

/// Parses `#RRGGBB`; anything else reads as mid gray.
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
	let digits = hex.trim_start_matches('#');
	if digits.len() != 6 {
		return (128, 128, 128);
	}
	let channel = |range: std::ops::Range<usize>| {
		digits
			.get(range)
			.and_then(|s| u8::from_str_radix(s, 16).ok())
			.unwrap_or(128)
	};
	(channel(0..2), channel(2..4), channel(4..6))
}

pub fn rgba(hex: &str, alpha: f64) -> String {
	let (r, g, b) = hex_to_rgb(hex);
	format!("rgba({},{},{},{})", r, g, b, alpha)
}

/// Mixes `hex` toward its luma gray; `amount` 0 keeps it, 1 is fully gray.
pub fn desaturate(hex: &str, amount: f64) -> String {
	let (r, g, b) = hex_to_rgb(hex);
	let gray = (r as f64 * 0.299 + g as f64 * 0.587 + b as f64 * 0.114).round();
	let mix = |c: u8| (c as f64 + (gray - c as f64) * amount).round() as u8;
	format!("rgb({},{},{})", mix(r), mix(g), mix(b))
}

fn is_adversarial(label: &str) -> bool {
	matches!(label, "CONTRADICTS" | "SUPERSEDES" | "NEGATES")
}

/// Stroke color for a link given the current hover state.
pub fn link_color(label: Option<&str>, hovering: bool, highlighted: bool) -> &'static str {
	if hovering {
		return if highlighted {
			"rgba(129, 140, 248, 0.65)"
		} else {
			"rgba(100, 116, 139, 0.06)"
		};
	}
	match label.unwrap_or_default() {
		l if is_adversarial(l) => "rgba(248, 113, 113, 0.30)",
		"REVISES" => "rgba(251, 191, 36, 0.28)",
		_ => "rgba(148, 163, 184, 0.18)",
	}
}

/// Dash pattern for conflicting or revising relations; solid otherwise.
pub fn link_dash(label: Option<&str>) -> &'static [f64] {
	match label.unwrap_or_default() {
		l if is_adversarial(l) || l == "REVISES" => &[5.0, 5.0],
		_ => &[],
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rgba_from_hex() {
		assert_eq!(rgba("#10B981", 0.5), "rgba(16,185,129,0.5)");
		assert_eq!(hex_to_rgb("bogus"), (128, 128, 128));
	}

	#[test]
	fn desaturate_extremes() {
		assert_eq!(desaturate("#FBBF24", 0.0), "rgb(251,191,36)");
		// luma of (251,191,36) rounds to 191
		assert_eq!(desaturate("#FBBF24", 1.0), "rgb(191,191,191)");
	}

	#[test]
	fn link_styles() {
		assert_eq!(link_color(Some("CONTRADICTS"), false, false), "rgba(248, 113, 113, 0.30)");
		assert_eq!(link_color(Some("REVISES"), false, false), "rgba(251, 191, 36, 0.28)");
		assert_eq!(link_color(None, false, false), "rgba(148, 163, 184, 0.18)");
		assert_eq!(link_color(Some("REVISES"), true, true), "rgba(129, 140, 248, 0.65)");
		assert_eq!(link_color(Some("REVISES"), true, false), "rgba(100, 116, 139, 0.06)");
		assert_eq!(link_dash(Some("NEGATES")), &[5.0, 5.0]);
		assert!(link_dash(Some("EMPLOYED_BY")).is_empty());
	}
}
