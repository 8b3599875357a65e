//! Document list logic: sorting, filtering, selection, upload validation and
//! the simulated processing progress.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::api::types::{Document, DocumentStatus};
use crate::error::{ApiError, Result};

/// File extensions the backend accepts for upload.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "docx"];

/// Value for the file input's `accept` attribute.
pub const ACCEPT_ATTR: &str = ".pdf,.txt,.docx";

/// Assumed processing time behind the progress estimate.
const EXPECTED_PROCESSING_MS: f64 = 5.0 * 60.0 * 1000.0;
/// The estimate never passes this until the backend reports completion.
const PROGRESS_CAP: f64 = 90.0;
const FAST_START_MS: f64 = 5000.0;
const FAST_START_PERCENT: f64 = 10.0;

impl DocumentStatus {
	/// Select, view and delete are offered only for finished documents.
	pub fn allows_actions(&self) -> bool {
		matches!(self, DocumentStatus::Completed)
	}

	pub fn label(&self) -> &'static str {
		match self {
			DocumentStatus::Processing => "processing",
			DocumentStatus::Completed => "completed",
			DocumentStatus::Failed => "failed",
			DocumentStatus::Other => "unknown",
		}
	}
}

pub fn processing_count(docs: &[Document]) -> usize {
	docs.iter().filter(|d| d.status == DocumentStatus::Processing).count()
}

/// Sort orders offered by the list header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
	NameAsc,
	NameDesc,
	#[default]
	DateDesc,
	DateAsc,
	SizeDesc,
	SizeAsc,
	None,
}

impl SortKey {
	pub const ALL: [SortKey; 6] = [
		SortKey::NameAsc,
		SortKey::NameDesc,
		SortKey::DateDesc,
		SortKey::DateAsc,
		SortKey::SizeDesc,
		SortKey::SizeAsc,
	];

	pub fn value(&self) -> &'static str {
		match self {
			SortKey::NameAsc => "name-asc",
			SortKey::NameDesc => "name-desc",
			SortKey::DateDesc => "date-desc",
			SortKey::DateAsc => "date-asc",
			SortKey::SizeDesc => "size-desc",
			SortKey::SizeAsc => "size-asc",
			SortKey::None => "none",
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			SortKey::NameAsc => "Name (A-Z)",
			SortKey::NameDesc => "Name (Z-A)",
			SortKey::DateDesc => "Newest First",
			SortKey::DateAsc => "Oldest First",
			SortKey::SizeDesc => "Largest First",
			SortKey::SizeAsc => "Smallest First",
			SortKey::None => "Unsorted",
		}
	}

	/// Inverse of [`SortKey::value`]; unknown values leave the list unsorted.
	pub fn parse(value: &str) -> Self {
		SortKey::ALL
			.into_iter()
			.find(|k| k.value() == value)
			.unwrap_or(SortKey::None)
	}
}

fn date_key(doc: &Document) -> &str {
	doc.uploaded_at
		.as_deref()
		.or(doc.completed_at.as_deref())
		.unwrap_or("0")
}

fn name_cmp(a: &Document, b: &Document) -> Ordering {
	a.filename
		.to_lowercase()
		.cmp(&b.filename.to_lowercase())
		.then_with(|| a.filename.cmp(&b.filename))
}

/// Returns a sorted copy of `docs`.
pub fn sort_documents(docs: &[Document], key: SortKey) -> Vec<Document> {
	let mut sorted = docs.to_vec();
	match key {
		SortKey::NameAsc => sorted.sort_by(name_cmp),
		SortKey::NameDesc => sorted.sort_by(|a, b| name_cmp(b, a)),
		SortKey::DateDesc => sorted.sort_by(|a, b| date_key(b).cmp(date_key(a))),
		SortKey::DateAsc => sorted.sort_by(|a, b| date_key(a).cmp(date_key(b))),
		SortKey::SizeDesc => sorted.sort_by(|a, b| b.size.cmp(&a.size)),
		SortKey::SizeAsc => sorted.sort_by_key(|d| d.size),
		SortKey::None => {}
	}
	sorted
}

/// Status filter tabs above the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
	#[default]
	All,
	Completed,
	Processing,
	Failed,
}

impl StatusFilter {
	pub const ALL: [StatusFilter; 4] = [
		StatusFilter::All,
		StatusFilter::Completed,
		StatusFilter::Processing,
		StatusFilter::Failed,
	];

	pub fn label(&self) -> &'static str {
		match self {
			StatusFilter::All => "All Documents",
			StatusFilter::Completed => "Completed",
			StatusFilter::Processing => "Processing",
			StatusFilter::Failed => "Failed",
		}
	}

	pub fn matches(&self, doc: &Document) -> bool {
		match self {
			StatusFilter::All => true,
			StatusFilter::Completed => doc.status == DocumentStatus::Completed,
			StatusFilter::Processing => doc.status == DocumentStatus::Processing,
			StatusFilter::Failed => doc.status == DocumentStatus::Failed,
		}
	}

	pub fn count(&self, docs: &[Document]) -> usize {
		docs.iter().filter(|d| self.matches(d)).count()
	}
}

/// Rejects files the backend would refuse, based on the extension.
pub fn validate_upload(name: &str) -> Result<()> {
	match extension(name) {
		Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
		_ => Err(ApiError::Validation(format!(
			"Unsupported file type: {name}. Upload PDF, TXT or DOCX files."
		))),
	}
}

fn extension(name: &str) -> Option<String> {
	name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// How the "View" panel shows a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preview {
	/// Rendered inline by the browser (PDF, plain text).
	Inline,
	/// Word documents: download link only.
	DownloadOnly,
	Unavailable,
}

impl Preview {
	pub fn for_file(name: &str) -> Self {
		match extension(name).as_deref() {
			Some("pdf" | "txt") => Preview::Inline,
			Some("docx" | "doc") => Preview::DownloadOnly,
			_ => Preview::Unavailable,
		}
	}
}

/// Selected documents in list order, for the summaries view.
pub fn selected_documents(docs: &[Document], selected: &[String]) -> Vec<Document> {
	docs.iter()
		.filter(|d| selected.contains(&d.filename))
		.cloned()
		.collect()
}

/// Filenames of every completed document.
pub fn select_all_completed(docs: &[Document]) -> Vec<String> {
	docs.iter()
		.filter(|d| d.status.allows_actions())
		.map(|d| d.filename.clone())
		.collect()
}

/// Adds `filename` to the selection, or removes it when already present.
pub fn toggle_selection(selected: &mut Vec<String>, filename: &str) {
	if let Some(pos) = selected.iter().position(|s| s == filename) {
		selected.remove(pos);
	} else {
		selected.push(filename.to_string());
	}
}

/// Estimated completion percentage for a document `elapsed_ms` after its
/// upload started. Not derived from backend progress.
pub fn simulated_progress(status: &DocumentStatus, elapsed_ms: f64) -> u8 {
	match status {
		DocumentStatus::Completed => 100,
		DocumentStatus::Processing => {
			let elapsed = elapsed_ms.max(0.0);
			let mut percent = elapsed / EXPECTED_PROCESSING_MS * PROGRESS_CAP;
			if elapsed < FAST_START_MS {
				percent = percent.max(FAST_START_PERCENT);
			}
			percent.round().min(PROGRESS_CAP) as u8
		}
		_ => 0,
	}
}

/// Keeps the summary reveal flag of documents whose summary did not change
/// across a list refresh.
pub fn merge_revealed(previous: &[Document], mut fresh: Vec<Document>) -> Vec<Document> {
	for doc in &mut fresh {
		if let Some(old) = previous.iter().find(|d| d.filename == doc.filename) {
			if old.summary.is_some() && old.summary == doc.summary {
				doc.summary_revealed = old.summary_revealed;
			}
		}
	}
	fresh
}

/// `12.3 KB` style size shown under each filename.
pub fn format_size(bytes: u64) -> String {
	format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// In-flight uploads: filename to background task id, plus the time each
/// upload started for the progress estimate.
#[derive(Clone, Debug, Default)]
pub struct UploadTracker {
	tasks: BTreeMap<String, String>,
	started: BTreeMap<String, f64>,
}

impl UploadTracker {
	pub fn track(&mut self, filename: &str, task_id: &str, now_ms: f64) {
		self.tasks.insert(filename.to_string(), task_id.to_string());
		self.started.insert(filename.to_string(), now_ms);
	}

	/// Starts the progress clock for a document seen processing without a
	/// tracked upload (for example after a page reload).
	pub fn observe(&mut self, filename: &str, now_ms: f64) {
		self.started.entry(filename.to_string()).or_insert(now_ms);
	}

	/// Resyncs the progress clocks with a fresh document list: documents seen
	/// processing start a clock, and clocks for anything else are dropped
	/// unless an upload task is still tracked for it.
	pub fn sync(&mut self, docs: &[Document], now_ms: f64) {
		for doc in docs.iter().filter(|d| d.status == DocumentStatus::Processing) {
			self.observe(&doc.filename, now_ms);
		}
		let tasks = &self.tasks;
		self.started.retain(|name, _| {
			tasks.contains_key(name)
				|| docs
					.iter()
					.any(|d| d.filename == *name && d.status == DocumentStatus::Processing)
		});
	}

	/// Stops tracking `filename` and returns its task id.
	pub fn finish(&mut self, filename: &str) -> Option<String> {
		self.started.remove(filename);
		self.tasks.remove(filename)
	}

	pub fn task_id(&self, filename: &str) -> Option<&str> {
		self.tasks.get(filename).map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}

	/// Snapshot of `(filename, task_id)` pairs to poll.
	pub fn pending(&self) -> Vec<(String, String)> {
		self.tasks
			.iter()
			.map(|(f, t)| (f.clone(), t.clone()))
			.collect()
	}

	pub fn filenames(&self) -> Vec<String> {
		self.tasks.keys().cloned().collect()
	}

	/// Milliseconds since `filename` started processing, if tracked.
	pub fn elapsed(&self, filename: &str, now_ms: f64) -> Option<f64> {
		self.started.get(filename).map(|start| now_ms - start)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn doc(filename: &str, status: DocumentStatus) -> Document {
		Document {
			filename: filename.to_string(),
			status,
			size: 0,
			uploaded_at: None,
			summary: None,
			completed_at: None,
			kind: None,
			summary_revealed: false,
		}
	}

	#[test]
	fn preview_by_extension() {
		assert_eq!(Preview::for_file("lease.PDF"), Preview::Inline);
		assert_eq!(Preview::for_file("notes.txt"), Preview::Inline);
		assert_eq!(Preview::for_file("memo.docx"), Preview::DownloadOnly);
		assert_eq!(Preview::for_file("old.doc"), Preview::DownloadOnly);
		assert_eq!(Preview::for_file("archive.zip"), Preview::Unavailable);
		assert_eq!(Preview::for_file("README"), Preview::Unavailable);
	}

	#[test]
	fn selected_documents_keep_list_order() {
		let docs = vec![
			doc("a.pdf", DocumentStatus::Completed),
			doc("b.pdf", DocumentStatus::Completed),
			doc("c.pdf", DocumentStatus::Completed),
		];
		let selected = vec!["c.pdf".to_string(), "a.pdf".to_string(), "gone.pdf".to_string()];
		let names: Vec<String> = selected_documents(&docs, &selected)
			.into_iter()
			.map(|d| d.filename)
			.collect();
		assert_eq!(names, ["a.pdf", "c.pdf"]);
		assert!(selected_documents(&docs, &[]).is_empty());
	}

	#[test]
	fn reupload_restarts_progress_clock() {
		let mut uploads = UploadTracker::default();
		uploads.observe("lease.pdf", 0.0);
		uploads.track("lease.pdf", "t2", 600_000.0);
		let elapsed = uploads.elapsed("lease.pdf", 600_000.0);
		assert_eq!(elapsed, Some(0.0));
		assert_eq!(simulated_progress(&DocumentStatus::Processing, elapsed.unwrap_or(0.0)), 10);
	}

	#[test]
	fn sync_drops_clocks_of_settled_documents() {
		let mut uploads = UploadTracker::default();
		uploads.observe("old.pdf", 0.0);
		uploads.track("fresh.pdf", "t1", 0.0);
		uploads.sync(
			&[
				doc("old.pdf", DocumentStatus::Completed),
				doc("scan.pdf", DocumentStatus::Processing),
			],
			1_000.0,
		);
		assert_eq!(uploads.elapsed("old.pdf", 2_000.0), None);
		assert_eq!(uploads.elapsed("scan.pdf", 2_000.0), Some(1_000.0));
		// tracked uploads keep their clock before the list shows them
		assert_eq!(uploads.elapsed("fresh.pdf", 2_000.0), Some(2_000.0));

		uploads.finish("scan.pdf");
		uploads.sync(&[], 3_000.0);
		assert_eq!(uploads.elapsed("scan.pdf", 3_000.0), None);
		assert_eq!(uploads.elapsed("fresh.pdf", 3_000.0), Some(3_000.0));
	}

	#[test]
	fn processing_badge_and_actions() {
		let docs = vec![
			doc("scan.pdf", DocumentStatus::Processing),
			doc("lease.pdf", DocumentStatus::Completed),
		];
		assert_eq!(processing_count(&docs), 1);
		let actionable: Vec<&str> = docs
			.iter()
			.filter(|d| d.status.allows_actions())
			.map(|d| d.filename.as_str())
			.collect();
		assert_eq!(actionable, vec!["lease.pdf"]);
		assert!(!DocumentStatus::Failed.allows_actions());
	}

	#[test]
	fn sorts_by_date_with_fallbacks() {
		let mut a = doc("a.pdf", DocumentStatus::Completed);
		a.uploaded_at = Some("2024-03-01T10:00:00".into());
		let mut b = doc("b.pdf", DocumentStatus::Completed);
		b.completed_at = Some("2024-05-01T10:00:00".into());
		let c = doc("c.pdf", DocumentStatus::Processing);
		let docs = vec![a, b, c];

		let names = |v: Vec<Document>| v.into_iter().map(|d| d.filename).collect::<Vec<_>>();
		assert_eq!(names(sort_documents(&docs, SortKey::DateDesc)), ["b.pdf", "a.pdf", "c.pdf"]);
		assert_eq!(names(sort_documents(&docs, SortKey::DateAsc)), ["c.pdf", "a.pdf", "b.pdf"]);
		assert_eq!(names(sort_documents(&docs, SortKey::None)), ["a.pdf", "b.pdf", "c.pdf"]);
	}

	#[test]
	fn sorts_by_name_and_size() {
		let mut big = doc("beta.txt", DocumentStatus::Completed);
		big.size = 4096;
		let mut small = doc("Alpha.txt", DocumentStatus::Completed);
		small.size = 10;
		let docs = vec![big, small];
		assert_eq!(sort_documents(&docs, SortKey::NameAsc)[0].filename, "Alpha.txt");
		assert_eq!(sort_documents(&docs, SortKey::NameDesc)[0].filename, "beta.txt");
		assert_eq!(sort_documents(&docs, SortKey::SizeAsc)[0].size, 10);
		assert_eq!(sort_documents(&docs, SortKey::SizeDesc)[0].size, 4096);
	}

	#[test]
	fn sort_key_values_round_trip() {
		for key in SortKey::ALL {
			assert_eq!(SortKey::parse(key.value()), key);
		}
		assert_eq!(SortKey::parse("bogus"), SortKey::None);
	}

	#[test]
	fn upload_extension_filter() {
		assert!(validate_upload("brief.PDF").is_ok());
		assert!(validate_upload("notes.txt").is_ok());
		assert!(validate_upload("memo.docx").is_ok());
		assert!(matches!(validate_upload("photo.png"), Err(ApiError::Validation(_))));
		assert!(validate_upload("README").is_err());
	}

	#[test]
	fn selection_helpers() {
		let docs = vec![
			doc("a.pdf", DocumentStatus::Completed),
			doc("b.pdf", DocumentStatus::Processing),
			doc("c.pdf", DocumentStatus::Completed),
		];
		assert_eq!(select_all_completed(&docs), vec!["a.pdf", "c.pdf"]);

		let mut selected = vec!["a.pdf".to_string()];
		toggle_selection(&mut selected, "c.pdf");
		toggle_selection(&mut selected, "a.pdf");
		assert_eq!(selected, vec!["c.pdf"]);
	}

	#[test]
	fn status_filter_counts() {
		let docs = vec![
			doc("a.pdf", DocumentStatus::Completed),
			doc("b.pdf", DocumentStatus::Failed),
			doc("c.pdf", DocumentStatus::Completed),
		];
		assert_eq!(StatusFilter::All.count(&docs), 3);
		assert_eq!(StatusFilter::Completed.count(&docs), 2);
		assert_eq!(StatusFilter::Processing.count(&docs), 0);
	}

	#[test]
	fn progress_estimate() {
		let processing = DocumentStatus::Processing;
		assert_eq!(simulated_progress(&processing, 0.0), 10);
		assert_eq!(simulated_progress(&processing, 4_999.0), 10);
		assert_eq!(simulated_progress(&processing, 150_000.0), 45);
		assert_eq!(simulated_progress(&processing, 10_000_000.0), 90);
		assert_eq!(simulated_progress(&DocumentStatus::Completed, 1.0), 100);
		assert_eq!(simulated_progress(&DocumentStatus::Failed, 1.0), 0);
	}

	#[test]
	fn refresh_keeps_reveal_flag_for_same_summary() {
		let mut seen = doc("a.pdf", DocumentStatus::Completed);
		seen.summary = Some("Short.".into());
		seen.summary_revealed = true;
		let mut changed = doc("b.pdf", DocumentStatus::Completed);
		changed.summary = Some("Old.".into());
		changed.summary_revealed = true;

		let mut fresh_a = doc("a.pdf", DocumentStatus::Completed);
		fresh_a.summary = Some("Short.".into());
		let mut fresh_b = doc("b.pdf", DocumentStatus::Completed);
		fresh_b.summary = Some("New.".into());

		let merged = merge_revealed(&[seen, changed], vec![fresh_a, fresh_b]);
		assert!(merged[0].summary_revealed);
		assert!(!merged[1].summary_revealed);
	}

	#[test]
	fn observed_documents_get_a_clock() {
		let mut tracker = UploadTracker::default();
		tracker.observe("scan.pdf", 2_000.0);
		tracker.observe("scan.pdf", 9_000.0);
		assert_eq!(tracker.elapsed("scan.pdf", 3_000.0), Some(1_000.0));
		assert!(tracker.is_empty());
	}

	#[test]
	fn tracker_keeps_first_start_time() {
		let mut tracker = UploadTracker::default();
		tracker.track("a.pdf", "t1", 1_000.0);
		tracker.track("a.pdf", "t2", 5_000.0);
		assert_eq!(tracker.task_id("a.pdf"), Some("t2"));
		assert_eq!(tracker.elapsed("a.pdf", 6_000.0), Some(5_000.0));
		assert_eq!(tracker.pending(), vec![("a.pdf".to_string(), "t2".to_string())]);
		assert_eq!(tracker.finish("a.pdf"), Some("t2".to_string()));
		assert!(tracker.is_empty());
		assert_eq!(format_size(2048), "2.0 KB");
	}
}
