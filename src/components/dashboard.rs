//! Dashboard load state and the derived figures its panels show.

use std::collections::BTreeMap;

use crate::api::types::{DashboardData, GraphSummary, Health, Overview, TopEntity};

const TOP_ENTITY_LIMIT: usize = 6;
const RELATION_LIMIT: usize = 5;

/// What the dashboard currently has to show.
#[derive(Clone, Debug, PartialEq)]
pub enum DashboardState {
	Loading,
	/// The endpoint was unreachable; the payload is the zeroed fallback.
	Failed(DashboardData),
	Loaded(DashboardData),
}

impl DashboardState {
	pub fn from_result<E>(result: Result<DashboardData, E>) -> Self {
		match result {
			Ok(data) => DashboardState::Loaded(data),
			Err(_) => DashboardState::Failed(DashboardData::fallback()),
		}
	}

	pub fn data(&self) -> Option<&DashboardData> {
		match self {
			DashboardState::Loading => None,
			DashboardState::Failed(data) | DashboardState::Loaded(data) => Some(data),
		}
	}

	pub fn is_offline(&self) -> bool {
		matches!(self, DashboardState::Failed(_))
	}

	/// Polling starts after the first answer, successful or not.
	pub fn should_poll(&self) -> bool {
		!matches!(self, DashboardState::Loading)
	}
}

impl DashboardData {
	/// Placeholder shown while the backend is unreachable.
	pub fn fallback() -> Self {
		Self {
			overview: Overview {
				total_documents: 0,
				total_entities: 0,
				total_relations: 0,
				active_jobs: 0,
				llm_provider: "Not Connected".to_string(),
				concurrency_mode: "Unknown".to_string(),
			},
			documents: Vec::new(),
			graph: GraphSummary {
				total_nodes: 0,
				total_links: 0,
				top_entities: Vec::new(),
				relation_types: BTreeMap::new(),
			},
			health: Health {
				redis: "unknown".to_string(),
				neo4j: "unknown".to_string(),
				qdrant: "unknown".to_string(),
				llm: "unknown".to_string(),
			},
		}
	}
}

/// Overall service summary line under the health rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthSummary {
	Operational,
	Degraded,
	Checking,
}

impl HealthSummary {
	pub fn message(&self) -> &'static str {
		match self {
			HealthSummary::Operational => "All systems operational",
			HealthSummary::Degraded => "Some services are offline",
			HealthSummary::Checking => "Checking service status...",
		}
	}
}

impl Health {
	pub fn services(&self) -> [(&'static str, &str); 4] {
		[
			("Redis (State Manager)", self.redis.as_str()),
			("Neo4j (Knowledge Graph)", self.neo4j.as_str()),
			("Qdrant (Vector Store)", self.qdrant.as_str()),
			("LLM Provider", self.llm.as_str()),
		]
	}

	pub fn summary(&self) -> HealthSummary {
		let services = self.services();
		if services.iter().all(|(_, s)| *s == "connected") {
			HealthSummary::Operational
		} else if services.iter().any(|(_, s)| *s == "disconnected") {
			HealthSummary::Degraded
		} else {
			HealthSummary::Checking
		}
	}
}

/// Width in percent of a bar for `value` against the largest value `max`.
pub fn bar_percent(value: u64, max: u64) -> f64 {
	if max == 0 {
		return 0.0;
	}
	(value as f64 / max as f64 * 100.0).min(100.0)
}

impl GraphSummary {
	pub fn top_entities(&self) -> &[TopEntity] {
		&self.top_entities[..self.top_entities.len().min(TOP_ENTITY_LIMIT)]
	}

	/// Most frequent relation types, largest first.
	pub fn top_relations(&self) -> Vec<(&str, u64)> {
		let mut entries: Vec<(&str, u64)> = self
			.relation_types
			.iter()
			.map(|(k, v)| (k.as_str(), *v))
			.collect();
		entries.sort_by(|a, b| b.1.cmp(&a.1));
		entries.truncate(RELATION_LIMIT);
		entries
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn failed_load_uses_fallback() {
		let state = DashboardState::from_result::<()>(Err(()));
		assert!(state.is_offline());
		let data = state.data().expect("fallback");
		assert_eq!(data.overview.llm_provider, "Not Connected");
		assert_eq!(data.health.summary(), HealthSummary::Checking);
		assert!(DashboardState::Loading.data().is_none());
		assert!(!DashboardState::Loading.should_poll());
		assert!(state.should_poll());
	}

	#[test]
	fn decodes_payload() {
		let data: DashboardData = serde_json::from_str(
			r#"{
				"overview": {"total_documents": 3, "total_entities": 40, "total_relations": 55,
					"active_jobs": 1, "llm_provider": "ollama", "concurrency_mode": "celery"},
				"documents": [],
				"graph": {"total_nodes": 40, "total_links": 55,
					"top_entities": [{"name": "Acme Corp", "connections": 12}],
					"relation_types": {"EMPLOYED_BY": 4, "CONTRADICTS": 9}},
				"health": {"redis": "connected", "neo4j": "connected", "qdrant": "connected", "llm": "connected"}
			}"#,
		)
		.expect("dashboard");
		let state = DashboardState::from_result::<()>(Ok(data));
		let data = state.data().expect("loaded");
		assert_eq!(data.health.summary(), HealthSummary::Operational);
		assert_eq!(data.graph.top_relations(), vec![("CONTRADICTS", 9), ("EMPLOYED_BY", 4)]);
		assert_eq!(data.graph.top_entities().len(), 1);
	}

	#[test]
	fn degraded_when_any_service_down() {
		let mut health = DashboardData::fallback().health;
		health.neo4j = "disconnected".into();
		assert_eq!(health.summary(), HealthSummary::Degraded);
	}

	#[test]
	fn bars_are_clamped() {
		assert_eq!(bar_percent(5, 10), 50.0);
		assert_eq!(bar_percent(20, 10), 100.0);
		assert_eq!(bar_percent(1, 0), 0.0);
	}
}
