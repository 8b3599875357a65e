//! Wire types for the backend REST API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::force_graph::{GraphLink, GraphNode};

/// Processing state of an uploaded document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
	Processing,
	Completed,
	Failed,
	#[serde(other)]
	Other,
}

/// A document known to the backend.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Document {
	pub filename: String,
	pub status: DocumentStatus,
	#[serde(default)]
	pub size: u64,
	#[serde(default)]
	pub uploaded_at: Option<String>,
	#[serde(default)]
	pub summary: Option<String>,
	#[serde(default)]
	pub completed_at: Option<String>,
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Whether the summary reveal animation already played.
	#[serde(skip)]
	pub summary_revealed: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DocumentList {
	#[serde(default)]
	pub documents: Vec<Document>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadResponse {
	pub task_id: String,
	pub filename: String,
}

/// Celery-style task state as reported by `/status/{task_id}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
	Pending,
	Started,
	Success,
	Failure,
	Revoked,
	#[serde(other)]
	Unknown,
}

impl TaskState {
	/// Polling stops once a task reaches this point.
	pub fn is_terminal(&self) -> bool {
		matches!(self, TaskState::Success | TaskState::Failure)
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct TaskStatus {
	pub status: TaskState,
}

#[derive(Clone, Debug, Serialize)]
pub struct HistoryEntry {
	pub role: String,
	pub content: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct QueryRequest {
	pub question: String,
	pub history: Vec<HistoryEntry>,
	pub selected_docs: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QueryResponse {
	pub answer: String,
	#[serde(default)]
	pub context_used: Vec<String>,
	#[serde(default)]
	pub confidence: f64,
	#[serde(default)]
	pub model: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SummaryResponse {
	pub summary: String,
}

/// Response of `/graph`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphPayload {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
	#[serde(default)]
	pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Overview {
	pub total_documents: u64,
	pub total_entities: u64,
	pub total_relations: u64,
	pub active_jobs: u64,
	pub llm_provider: String,
	pub concurrency_mode: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TopEntity {
	pub name: String,
	pub connections: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphSummary {
	pub total_nodes: u64,
	pub total_links: u64,
	#[serde(default)]
	pub top_entities: Vec<TopEntity>,
	#[serde(default)]
	pub relation_types: BTreeMap<String, u64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Health {
	pub redis: String,
	pub neo4j: String,
	pub qdrant: String,
	pub llm: String,
}

/// Response of `/dashboard`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DashboardData {
	pub overview: Overview,
	#[serde(default)]
	pub documents: Vec<Document>,
	pub graph: GraphSummary,
	pub health: Health,
}

/// Error body shape used by the backend for non-2xx answers.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
	pub detail: Option<serde_json::Value>,
}
