//! Ctrl/Cmd + digit view switching.

/// Route for a keydown, or `None` when it is not a view shortcut.
/// `modifier` is whether Ctrl or Cmd was held.
pub fn route_for_key(key: &str, modifier: bool) -> Option<&'static str> {
	if !modifier {
		return None;
	}
	match key {
		"1" => Some("/"),
		"2" => Some("/chat"),
		"3" => Some("/documents"),
		"4" => Some("/summaries"),
		"5" => Some("/graph"),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn digits_switch_views_with_modifier() {
		assert_eq!(route_for_key("1", true), Some("/"));
		assert_eq!(route_for_key("3", true), Some("/documents"));
		assert_eq!(route_for_key("4", true), Some("/summaries"));
		assert_eq!(route_for_key("5", true), Some("/graph"));
	}

	#[test]
	fn plain_keys_are_left_alone() {
		assert_eq!(route_for_key("1", false), None);
		assert_eq!(route_for_key("6", true), None);
		assert_eq!(route_for_key("0", true), None);
		assert_eq!(route_for_key("a", true), None);
	}
}
