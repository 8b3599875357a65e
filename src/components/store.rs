//! Document and conversation state shared across pages.
//!
//! Lives at the app root so uploads keep polling and the conversation
//! survives route changes.

use std::collections::BTreeMap;
use std::time::Duration;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::File;

use crate::api::ApiClient;
use crate::api::types::Document;
use crate::components::chat::{Conversation, apply_summary, mark_summary_revealed};
use crate::components::documents::{UploadTracker, merge_revealed, validate_upload};

pub fn alert(message: &str) {
	if let Some(win) = web_sys::window() {
		let _ = win.alert_with_message(message);
	}
}

pub fn confirm(message: &str) -> bool {
	web_sys::window()
		.and_then(|win| win.confirm_with_message(message).ok())
		.unwrap_or(false)
}

#[derive(Clone, Copy)]
pub struct DocumentStore {
	pub docs: RwSignal<Vec<Document>>,
	pub selected: RwSignal<Vec<String>>,
	pub uploads: RwSignal<UploadTracker>,
	pub loading: RwSignal<bool>,
	pub summarizing: RwSignal<Vec<String>>,
	pub summary_errors: RwSignal<BTreeMap<String, String>>,
}

impl DocumentStore {
	pub fn new() -> Self {
		Self {
			docs: RwSignal::new(Vec::new()),
			selected: RwSignal::new(Vec::new()),
			uploads: RwSignal::new(UploadTracker::default()),
			loading: RwSignal::new(true),
			summarizing: RwSignal::new(Vec::new()),
			summary_errors: RwSignal::new(BTreeMap::new()),
		}
	}

	pub fn refresh(self, client: ApiClient) {
		spawn_local(async move {
			self.loading.set(true);
			match client.documents().await {
				Ok(fresh) => {
					let now = js_sys::Date::now();
					self.uploads.update(|u| u.sync(&fresh, now));
					self.docs.update(|docs| *docs = merge_revealed(docs, fresh));
				}
				Err(e) => error!("failed to fetch documents: {}", e),
			}
			self.loading.set(false);
		});
	}

	pub fn upload(self, client: ApiClient, files: Vec<File>) {
		spawn_local(async move {
			for file in files {
				let name = file.name();
				if let Err(e) = validate_upload(&name) {
					warn!("upload rejected: {}", e);
					alert(&e.user_message("Unsupported file type"));
					continue;
				}
				match client.upload(&file).await {
					Ok(resp) => {
						info!("uploaded {} as task {}", resp.filename, resp.task_id);
						let now = js_sys::Date::now();
						self.uploads.update(|u| u.track(&resp.filename, &resp.task_id, now));
					}
					Err(e) => {
						error!("failed to upload {}: {}", name, e);
						alert(&format!("Upload failed: {}", e.user_message(&e.to_string())));
					}
				}
			}
			self.refresh(client);
		});
	}

	/// Checks every tracked task once. Finished tasks stop being tracked and
	/// trigger a list refresh.
	pub fn poll_tasks(self, client: ApiClient) {
		let pending = self.uploads.with_untracked(|u| u.pending());
		if pending.is_empty() {
			return;
		}
		spawn_local(async move {
			let mut finished = false;
			for (filename, task_id) in pending {
				match client.task_status(&task_id).await {
					Ok(status) if status.status.is_terminal() => {
						debug!("task {} for {} finished: {:?}", task_id, filename, status.status);
						self.uploads.update(|u| {
							u.finish(&filename);
						});
						finished = true;
					}
					Ok(_) => {}
					Err(e) => error!("failed to check status for {}: {}", filename, e),
				}
			}
			if finished {
				self.refresh(client);
			}
		});
	}

	/// Polls tracked uploads every `every_ms` until the owner is disposed.
	pub fn start_polling(self, client: ApiClient, every_ms: u32) {
		match set_interval_with_handle(
			move || self.poll_tasks(client.clone()),
			Duration::from_millis(every_ms as u64),
		) {
			Ok(handle) => on_cleanup(move || handle.clear()),
			Err(e) => error!("failed to start upload polling: {:?}", e),
		}
	}

	pub fn delete(self, client: ApiClient, filename: String) {
		if !confirm(&format!("Delete \"{}\"? This cannot be undone.", filename)) {
			return;
		}
		spawn_local(async move {
			match client.delete(&filename).await {
				Ok(()) => {
					self.uploads.update(|u| {
						u.finish(&filename);
					});
					self.docs.update(|docs| docs.retain(|d| d.filename != filename));
					self.selected.update(|s| s.retain(|f| *f != filename));
				}
				Err(e) => {
					error!("failed to delete {}: {}", filename, e);
					alert("Delete failed. Please try again.");
				}
			}
		});
	}

	pub fn cancel(self, client: ApiClient, filename: String) {
		let Some(task_id) = self.uploads.with_untracked(|u| u.task_id(&filename).map(str::to_string)) else {
			warn!("no task id found for {}", filename);
			return;
		};
		spawn_local(async move {
			match client.cancel(&task_id).await {
				Ok(()) => {
					self.uploads.update(|u| {
						u.finish(&filename);
					});
					info!("cancelled {}", filename);
				}
				Err(e) => error!("failed to cancel {}: {}", filename, e),
			}
		});
	}

	pub fn summarize(self, client: ApiClient, filename: String) {
		if self.summarizing.with_untracked(|s| s.contains(&filename)) {
			return;
		}
		self.summarizing.update(|s| s.push(filename.clone()));
		self.summary_errors.update(|e| {
			e.remove(&filename);
		});
		spawn_local(async move {
			match client.summarize(&filename).await {
				Ok(resp) => self.docs.update(|docs| {
					apply_summary(docs, &filename, resp.summary);
				}),
				Err(e) => {
					error!("failed to summarize {}: {}", filename, e);
					let message = e.user_message(&e.to_string());
					self.summary_errors.update(|errs| {
						errs.insert(filename.clone(), message);
					});
				}
			}
			self.summarizing.update(|s| s.retain(|f| *f != filename));
		});
	}

	pub fn mark_summary_revealed(self, filename: &str) {
		self.docs.update(|docs| mark_summary_revealed(docs, filename));
	}
}

impl Default for DocumentStore {
	fn default() -> Self {
		Self::new()
	}
}

/// Conversation shared by the chat page across navigation.
#[derive(Clone, Copy)]
pub struct ChatStore {
	pub conversation: RwSignal<Conversation>,
	pub pending: RwSignal<bool>,
}

impl ChatStore {
	pub fn new() -> Self {
		Self {
			conversation: RwSignal::new(Conversation::default()),
			pending: RwSignal::new(false),
		}
	}

	/// Sends `question` about `selected`; the outcome lands in the
	/// conversation as an answer or an error bubble.
	pub fn send(self, client: ApiClient, question: String, selected: Vec<String>) -> Result<(), String> {
		let Some(asked) = self.conversation.try_update(|c| c.ask(&question, &selected)) else {
			return Err("The conversation is no longer available.".to_string());
		};
		let request = asked.map_err(|e| e.user_message(&e.to_string()))?;

		self.pending.set(true);
		spawn_local(async move {
			match client.query(&request).await {
				Ok(resp) => self.conversation.update(|c| c.answer(resp)),
				Err(e) => {
					error!("chat query failed: {}", e);
					self.conversation.update(|c| c.fail(&e));
				}
			}
			self.pending.set(false);
		});
		Ok(())
	}
}

impl Default for ChatStore {
	fn default() -> Self {
		Self::new()
	}
}
