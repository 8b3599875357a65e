//! Conversation state for the question-answering view, citation parsing and
//! per-document summary bookkeeping.

use crate::api::types::{Document, HistoryEntry, QueryRequest, QueryResponse};
use crate::error::{ApiError, Result};

/// Number of prior messages sent along with a question.
const HISTORY_WINDOW: usize = 6;

/// A `filename:page` source reference attached to an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Citation {
	pub filename: String,
	pub page: Option<String>,
}

impl Citation {
	pub fn parse(source: &str) -> Self {
		let mut parts = source.split(':');
		let filename = parts.next().unwrap_or_default().to_string();
		let page = parts.next().filter(|p| !p.is_empty()).map(str::to_string);
		Self { filename, page }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
	User,
	Assistant,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::User => "user",
			Role::Assistant => "assistant",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
	pub id: u64,
	pub role: Role,
	pub content: String,
	pub sources: Vec<Citation>,
	pub confidence: Option<f64>,
	pub model: Option<String>,
	pub is_error: bool,
	/// Set once the typing reveal has played for this message.
	pub revealed: bool,
}

impl ChatMessage {
	fn new(id: u64, role: Role, content: String) -> Self {
		Self {
			id,
			role,
			content,
			sources: Vec::new(),
			confidence: None,
			model: None,
			is_error: false,
			revealed: role == Role::User,
		}
	}
}

/// Rejects a question that has no documents to search.
pub fn validate_query(selected: &[String]) -> Result<()> {
	if selected.is_empty() {
		return Err(ApiError::Validation(
			"Select at least one document to ask about.".to_string(),
		));
	}
	Ok(())
}

/// Ordered message log with monotonically increasing ids.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
	messages: Vec<ChatMessage>,
	next_id: u64,
}

impl Conversation {
	pub fn messages(&self) -> &[ChatMessage] {
		&self.messages
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	pub fn clear(&mut self) {
		self.messages.clear();
	}

	fn push(&mut self, role: Role, content: String) -> &mut ChatMessage {
		self.next_id += 1;
		self.messages.push(ChatMessage::new(self.next_id, role, content));
		let last = self.messages.len() - 1;
		&mut self.messages[last]
	}

	/// Validates the question, appends it as a user message and returns the
	/// request to send. History covers the messages before this one.
	pub fn ask(&mut self, question: &str, selected: &[String]) -> Result<QueryRequest> {
		let question = question.trim();
		if question.is_empty() {
			return Err(ApiError::Validation("Type a question first.".to_string()));
		}
		validate_query(selected)?;

		let start = self.messages.len().saturating_sub(HISTORY_WINDOW);
		let history = self.messages[start..]
			.iter()
			.map(|m| HistoryEntry {
				role: m.role.as_str().to_string(),
				content: m.content.clone(),
			})
			.collect();
		self.push(Role::User, question.to_string());

		Ok(QueryRequest {
			question: question.to_string(),
			history,
			selected_docs: selected.to_vec(),
		})
	}

	/// Appends the backend answer, or an error bubble when the answer is empty.
	pub fn answer(&mut self, response: QueryResponse) {
		if response.answer.trim().is_empty() {
			self.fail(&ApiError::Transport(
				"Received empty or invalid response from backend".to_string(),
			));
			return;
		}
		let msg = self.push(Role::Assistant, response.answer);
		msg.sources = response.context_used.iter().map(|s| Citation::parse(s)).collect();
		msg.confidence = Some(response.confidence);
		msg.model = Some(if response.model.is_empty() {
			"unknown".to_string()
		} else {
			response.model
		});
	}

	pub fn fail(&mut self, err: &ApiError) {
		let text = format!("Error: {}", err.user_message(&err.to_string()));
		let msg = self.push(Role::Assistant, text);
		msg.is_error = true;
		msg.revealed = true;
	}

	pub fn mark_revealed(&mut self, id: u64) {
		if let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) {
			msg.revealed = true;
		}
	}
}

/// Stores a freshly generated summary on its document; the reveal plays again.
pub fn apply_summary(docs: &mut [Document], filename: &str, summary: String) -> bool {
	match docs.iter_mut().find(|d| d.filename == filename) {
		Some(doc) => {
			doc.summary = Some(summary);
			doc.summary_revealed = false;
			true
		}
		None => false,
	}
}

pub fn mark_summary_revealed(docs: &mut [Document], filename: &str) {
	if let Some(doc) = docs.iter_mut().find(|d| d.filename == filename) {
		doc.summary_revealed = true;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::types::DocumentStatus;

	fn response(answer: &str) -> QueryResponse {
		QueryResponse {
			answer: answer.to_string(),
			context_used: vec!["lease.pdf:4".to_string(), "memo.txt".to_string()],
			confidence: 0.82,
			model: String::new(),
		}
	}

	#[test]
	fn parses_citations() {
		assert_eq!(
			Citation::parse("lease.pdf:4"),
			Citation { filename: "lease.pdf".into(), page: Some("4".into()) }
		);
		assert_eq!(Citation::parse("memo.txt").page, None);
		assert_eq!(Citation::parse("memo.txt:").page, None);
	}

	#[test]
	fn rejects_empty_selection() {
		assert!(matches!(validate_query(&[]), Err(ApiError::Validation(_))));
		let mut chat = Conversation::default();
		assert!(chat.ask("What changed?", &[]).is_err());
		assert!(chat.ask("   ", &["a.pdf".to_string()]).is_err());
		assert!(chat.is_empty());
	}

	#[test]
	fn history_is_bounded_and_excludes_current_question() {
		let mut chat = Conversation::default();
		let docs = vec!["a.pdf".to_string()];
		for i in 0..4 {
			chat.ask(&format!("q{i}"), &docs).expect("question");
			chat.answer(response(&format!("a{i}")));
		}
		let request = chat.ask("latest", &docs).expect("question");
		assert_eq!(request.history.len(), HISTORY_WINDOW);
		assert_eq!(request.history.last().map(|h| h.content.as_str()), Some("a3"));
		assert_eq!(request.history[0].role, "user");
		assert_eq!(request.selected_docs, docs);
	}

	#[test]
	fn answers_carry_sources_and_reveal_once() {
		let mut chat = Conversation::default();
		chat.ask("Who signed?", &["lease.pdf".to_string()]).expect("question");
		chat.answer(response("Jane Doe"));
		let answer = chat.messages().last().cloned().expect("answer");
		assert_eq!(answer.sources.len(), 2);
		assert_eq!(answer.model.as_deref(), Some("unknown"));
		assert!(!answer.revealed);
		chat.mark_revealed(answer.id);
		assert!(chat.messages()[1].revealed);
		assert!(chat.messages()[0].revealed);
	}

	#[test]
	fn failures_become_error_bubbles() {
		let mut chat = Conversation::default();
		chat.answer(response(""));
		chat.fail(&ApiError::Status { status: 500, detail: Some("LLM offline".into()) });
		let msgs = chat.messages();
		assert!(msgs.iter().all(|m| m.is_error));
		assert_eq!(msgs[1].content, "Error: LLM offline");
	}

	#[test]
	fn summary_lives_on_document() {
		let mut docs = vec![Document {
			filename: "lease.pdf".into(),
			status: DocumentStatus::Completed,
			size: 1,
			uploaded_at: None,
			summary: None,
			completed_at: None,
			kind: None,
			summary_revealed: true,
		}];
		assert!(apply_summary(&mut docs, "lease.pdf", "Ten year lease.".into()));
		assert!(!docs[0].summary_revealed);
		mark_summary_revealed(&mut docs, "lease.pdf");
		assert!(docs[0].summary_revealed);
		assert!(!apply_summary(&mut docs, "missing.pdf", String::new()));
	}
}
