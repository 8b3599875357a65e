//! Relevance ranking for the document filter box and node lookup for the
//! graph search box.

use crate::api::types::Document;
use crate::components::force_graph::GraphNode;

/// Anything with a name the filter box can rank.
pub trait Searchable {
	fn search_key(&self) -> &str;
}

impl Searchable for Document {
	fn search_key(&self) -> &str {
		&self.filename
	}
}

impl Searchable for &str {
	fn search_key(&self) -> &str {
		self
	}
}

impl Searchable for String {
	fn search_key(&self) -> &str {
		self
	}
}

fn is_name_separator(c: char) -> bool {
	c.is_whitespace() || matches!(c, '_' | '.' | '-')
}

/// Sum of `max(0, 10 - gap)` over consecutive in-order character matches of
/// `word` in `text`. Zero unless every character of `word` is found.
fn proximity(text: &[char], word: &str) -> f64 {
	let mut last: Option<usize> = None;
	let mut score = 0.0;
	for c in word.chars() {
		let from = last.map_or(0, |l| l + 1);
		let Some(offset) = text.get(from..).and_then(|rest| rest.iter().position(|t| *t == c)) else {
			return 0.0;
		};
		let index = from + offset;
		if let Some(l) = last {
			score += (10.0 - (index - l) as f64).max(0.0);
		}
		last = Some(index);
	}
	score
}

/// Relevance of `name` for an already lowercased, trimmed `term`.
pub fn score(name: &str, term: &str) -> f64 {
	let name = name.to_lowercase();
	let chars: Vec<char> = name.chars().collect();
	let mut score = 0.0;

	if name == term {
		score += 1000.0;
	}
	if name.starts_with(term) {
		score += 500.0;
	}
	if name.contains(term) {
		score += 200.0;
	}

	let name_words: Vec<&str> = name.split(is_name_separator).filter(|w| !w.is_empty()).collect();
	for word in term.split_whitespace() {
		for (index, name_word) in name_words.iter().enumerate() {
			if name_word.starts_with(word) {
				score += 100.0 - index as f64 * 10.0;
			}
		}
		if name.contains(word) {
			score += 50.0;
		}
		score += proximity(&chars, word) * 10.0;
	}

	score - chars.len() as f64 * 0.1
}

/// Filters `items` to those scoring above zero for `query`, best first.
/// A blank query returns every item in input order. Equal scores keep their
/// input order.
pub fn rank<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
	let term = query.trim().to_lowercase();
	if term.is_empty() {
		return items.iter().collect();
	}

	let mut scored: Vec<(f64, &T)> = items
		.iter()
		.map(|item| (score(item.search_key(), &term), item))
		.filter(|(s, _)| *s > 0.0)
		.collect();
	scored.sort_by(|a, b| b.0.total_cmp(&a.0));
	scored.into_iter().map(|(_, item)| item).collect()
}

/// A run of text inside a search result, marked when it matched the query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
	pub text: String,
	pub matched: bool,
}

impl Segment {
	fn plain(text: &str) -> Self {
		Self { text: text.to_string(), matched: false }
	}

	fn mark(text: &str) -> Self {
		Self { text: text.to_string(), matched: true }
	}
}

/// Byte range of the first case-insensitive occurrence of `needle` in `text`.
fn find_ignore_case(text: &str, needle: &str, skip: &[(usize, usize)]) -> Option<(usize, usize)> {
	let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
	if needle.is_empty() {
		return None;
	}
	let positions: Vec<(usize, char)> = text.char_indices().collect();
	'outer: for start in 0..positions.len() {
		let mut i = start;
		for n in &needle {
			let Some((_, c)) = positions.get(i) else {
				continue 'outer;
			};
			if !c.to_lowercase().eq(std::iter::once(*n)) {
				continue 'outer;
			}
			i += 1;
		}
		let begin = positions[start].0;
		let end = positions.get(i).map_or(text.len(), |(b, _)| *b);
		if skip.iter().any(|(s, e)| begin < *e && end > *s) {
			continue;
		}
		return Some((begin, end));
	}
	None
}

/// Splits `text` into plain and matched runs: the whole query when it occurs,
/// otherwise the first occurrence of each query word.
pub fn highlight_match(text: &str, query: &str) -> Vec<Segment> {
	let query = query.trim();
	if query.is_empty() {
		return vec![Segment::plain(text)];
	}

	let mut ranges: Vec<(usize, usize)> = Vec::new();
	if let Some(range) = find_ignore_case(text, query, &[]) {
		ranges.push(range);
	} else {
		for word in query.split_whitespace() {
			if let Some(range) = find_ignore_case(text, word, &ranges) {
				ranges.push(range);
			}
		}
	}
	ranges.sort_unstable();

	let mut segments = Vec::new();
	let mut cursor = 0;
	for (start, end) in ranges {
		if start > cursor {
			segments.push(Segment::plain(&text[cursor..start]));
		}
		segments.push(Segment::mark(&text[start..end]));
		cursor = end;
	}
	if cursor < text.len() {
		segments.push(Segment::plain(&text[cursor..]));
	}
	segments
}

/// First node whose id contains `term`, ignoring case.
pub fn find_node<'a>(nodes: &'a [GraphNode], term: &str) -> Option<&'a GraphNode> {
	let term = term.trim().to_lowercase();
	if term.is_empty() {
		return None;
	}
	nodes.iter().find(|n| n.id.to_lowercase().contains(&term))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::NodeGroup;

	const FILES: [&str; 3] = ["financial_report.csv", "contract_agreement.pdf", "notes.txt"];

	#[test]
	fn blank_query_keeps_everything_in_order() {
		let docs = ["b.pdf", "a.pdf", "c.txt"];
		assert_eq!(rank(&docs, ""), docs.iter().collect::<Vec<_>>());
		assert_eq!(rank(&docs, "   ").len(), 3);
	}

	#[test]
	fn report_query_prefers_financial_report() {
		let ranked = rank(&FILES, "report");
		assert_eq!(ranked.first().copied(), Some(&"financial_report.csv"));
		assert!(!ranked.contains(&&"notes.txt"));
		assert!(!ranked.contains(&&"contract_agreement.pdf"));
	}

	#[test]
	fn exact_filename_ranks_first() {
		let docs = ["quarterly_report.pdf", "report.pdf.bak", "report.pdf"];
		let ranked = rank(&docs, "Report.PDF");
		assert_eq!(ranked[0], &"report.pdf");
		assert!(score("report.pdf", "report.pdf") >= 1000.0);
	}

	#[test]
	fn unmatched_characters_score_nothing() {
		let text: Vec<char> = "notes.txt".chars().collect();
		assert_eq!(proximity(&text, "xyz"), 0.0);
		assert!(rank(&["notes.txt"], "xyz").is_empty());
	}

	#[test]
	fn proximity_rewards_tight_clusters() {
		let tight: Vec<char> = "abc".chars().collect();
		let loose: Vec<char> = "a....b....c".chars().collect();
		assert_eq!(proximity(&tight, "abc"), 18.0);
		assert_eq!(proximity(&loose, "abc"), 10.0);
	}

	#[test]
	fn earlier_name_words_score_higher() {
		let first = score("draft_notes.txt", "draft");
		let later = score("notes_draft.txt", "draft");
		assert!(first > later);
	}

	#[test]
	fn ties_keep_input_order() {
		let docs = vec!["plan_a.txt".to_string(), "plan_b.txt".to_string()];
		let ranked = rank(&docs, "plan");
		assert_eq!(ranked, vec![&docs[0], &docs[1]]);
	}

	#[test]
	fn ranks_documents_by_filename() {
		let docs: Vec<Document> = serde_json::from_str(
			r#"[{"filename":"notes.txt","status":"completed"},{"filename":"lease.pdf","status":"completed"}]"#,
		)
		.expect("documents");
		let ranked = rank(&docs, "lease");
		assert_eq!(ranked.len(), 1);
		assert_eq!(ranked[0].filename, "lease.pdf");
	}

	#[test]
	fn highlights_whole_phrase() {
		let segments = highlight_match("Financial_Report.csv", "report");
		assert_eq!(
			segments,
			vec![
				Segment::plain("Financial_"),
				Segment::mark("Report"),
				Segment::plain(".csv"),
			]
		);
	}

	#[test]
	fn highlights_each_word_when_phrase_missing() {
		let segments = highlight_match("lease agreement 2024", "2024 lease");
		assert_eq!(
			segments,
			vec![
				Segment::mark("lease"),
				Segment::plain(" agreement "),
				Segment::mark("2024"),
			]
		);
		assert_eq!(highlight_match("abc", " "), vec![Segment::plain("abc")]);
	}

	#[test]
	fn finds_node_by_partial_name() {
		let nodes = vec![
			GraphNode::new("Acme Corp", NodeGroup::Organization),
			GraphNode::new("Jane Doe", NodeGroup::Person),
		];
		assert_eq!(find_node(&nodes, "doe").map(|n| n.id.as_str()), Some("Jane Doe"));
		assert!(find_node(&nodes, "zzz").is_none());
		assert!(find_node(&nodes, "").is_none());
	}
}
