//! Runtime configuration read from the hosting page.

use log::info;
use wasm_bindgen::JsCast;
use web_sys::HtmlMetaElement;

/// Default prefix every backend path is joined onto.
pub const DEFAULT_API_BASE: &str = "/api";

/// Application settings. Only the API base is configurable from the page; the
/// rest are fixed UI cadences.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Prefix every backend path is joined onto.
	pub api_base: String,
	/// Max edges requested from `/graph`.
	pub graph_limit: usize,
	/// Interval between upload task-status polls.
	pub task_poll_ms: u32,
	/// Interval between dashboard refreshes.
	pub dashboard_poll_ms: u32,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.to_string(),
			graph_limit: 2000,
			task_poll_ms: 2000,
			dashboard_poll_ms: 30_000,
		}
	}
}

impl AppConfig {
	/// Reads `<meta name="api-base" content="...">` when present.
	pub fn from_document() -> Self {
		let mut config = Self::default();
		if let Some(base) = read_meta("api-base") {
			config = config.with_api_base(&base);
			info!("api base overridden: {}", config.api_base);
		}
		config
	}

	/// Returns a copy with `base` as the API prefix (trailing slashes dropped).
	pub fn with_api_base(mut self, base: &str) -> Self {
		let trimmed = base.trim().trim_end_matches('/');
		if !trimmed.is_empty() {
			self.api_base = trimmed.to_string();
		}
		self
	}
}

fn read_meta(name: &str) -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document
		.query_selector(&format!("meta[name=\"{}\"]", name))
		.ok()??;
	let meta: HtmlMetaElement = element.dyn_into().ok()?;
	Some(meta.content())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = AppConfig::default();
		assert_eq!(config.api_base, "/api");
		assert_eq!(config.graph_limit, 2000);
		assert_eq!(config.task_poll_ms, 2000);
		assert_eq!(config.dashboard_poll_ms, 30_000);
	}

	#[test]
	fn base_override_strips_trailing_slash() {
		let config = AppConfig::default().with_api_base("https://example.test/api/");
		assert_eq!(config.api_base, "https://example.test/api");
		let config = AppConfig::default().with_api_base("   ");
		assert_eq!(config.api_base, "/api");
	}
}
