//! Hover highlight state.
//!
//! The state lives in a shared cell read directly by the painter every frame.
//! It is never routed through a reactive signal: the canvas repaints on its own
//! clock, so a hover only has to mutate the cell.

use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use super::types::{GraphLink, GraphNode, Which};

/// Hovered node, its neighbors (including itself) and incident links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightState {
	pub hovered_id: Option<String>,
	pub neighbor_ids: HashSet<String>,
	/// Indices into the link list.
	pub highlight_links: HashSet<usize>,
}

impl HighlightState {
	pub fn is_active(&self) -> bool {
		self.hovered_id.is_some()
	}

	pub fn is_hovered(&self, id: &str) -> bool {
		self.hovered_id.as_deref() == Some(id)
	}

	pub fn is_neighbor(&self, id: &str) -> bool {
		self.hovered_id.is_some() && self.neighbor_ids.contains(id)
	}
}

/// Writer side of the highlight cell. Clones share the same cell.
#[derive(Clone, Debug, Default)]
pub struct HighlightTracker {
	cell: Rc<RefCell<HighlightState>>,
}

impl HighlightTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> Ref<'_, HighlightState> {
		self.cell.borrow()
	}

	/// Recomputes the highlight for `node` with one pass over `links`;
	/// `None` clears it.
	pub fn on_hover(&self, node: Option<&GraphNode>, links: &[GraphLink]) {
		let mut state = self.cell.borrow_mut();
		let Some(node) = node else {
			*state = HighlightState::default();
			return;
		};
		if state.is_hovered(&node.id) {
			return;
		}

		let mut neighbor_ids = HashSet::new();
		let mut highlight_links = HashSet::new();
		for (i, link) in links.iter().enumerate() {
			let (source, target) = (link.endpoint_id(Which::Source), link.endpoint_id(Which::Target));
			if source == node.id {
				neighbor_ids.insert(target.to_string());
				highlight_links.insert(i);
			}
			if target == node.id {
				neighbor_ids.insert(source.to_string());
				highlight_links.insert(i);
			}
		}
		neighbor_ids.insert(node.id.clone());

		state.hovered_id = Some(node.id.clone());
		state.neighbor_ids = neighbor_ids;
		state.highlight_links = highlight_links;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::NodeGroup;

	fn graph() -> (Vec<GraphNode>, Vec<GraphLink>) {
		let nodes = vec![
			GraphNode::new("Acme Corp", NodeGroup::Organization),
			GraphNode::new("Jane Doe", NodeGroup::Person),
			GraphNode::new("Contract 7", NodeGroup::Document),
		];
		let links = vec![
			GraphLink::new("Jane Doe", "Acme Corp", Some("EMPLOYED_BY")),
			GraphLink::new("Contract 7", "Acme Corp", Some("REVISES")),
		];
		(nodes, links)
	}

	#[test]
	fn hover_collects_neighbors_and_links() {
		let (nodes, links) = graph();
		let tracker = HighlightTracker::new();
		tracker.on_hover(Some(&nodes[1]), &links);

		let state = tracker.state();
		assert_eq!(state.hovered_id.as_deref(), Some("Jane Doe"));
		let expected: HashSet<String> = ["Jane Doe", "Acme Corp"].iter().map(|s| s.to_string()).collect();
		assert_eq!(state.neighbor_ids, expected);
		assert_eq!(state.highlight_links, HashSet::from([0]));
		assert!(state.is_neighbor("Acme Corp"));
		assert!(!state.is_neighbor("Contract 7"));
	}

	#[test]
	fn repeated_hover_is_idempotent() {
		let (nodes, links) = graph();
		let tracker = HighlightTracker::new();
		tracker.on_hover(Some(&nodes[0]), &links);
		let once = tracker.state().clone();
		tracker.on_hover(Some(&nodes[0]), &links);
		assert_eq!(*tracker.state(), once);
		assert_eq!(once.highlight_links, HashSet::from([0, 1]));
		assert_eq!(once.neighbor_ids.len(), 3);
	}

	#[test]
	fn clear_and_switch() {
		let (nodes, links) = graph();
		let tracker = HighlightTracker::new();
		let reader = tracker.clone();
		tracker.on_hover(Some(&nodes[2]), &links);
		assert!(reader.state().is_active());
		tracker.on_hover(Some(&nodes[1]), &links);
		assert!(!reader.state().neighbor_ids.contains("Contract 7"));
		tracker.on_hover(None, &links);
		assert_eq!(*reader.state(), HighlightState::default());
	}

	#[test]
	fn self_loop_counts_once() {
		let node = GraphNode::new("loop", NodeGroup::Entity);
		let links = vec![GraphLink::new("loop", "loop", None)];
		let tracker = HighlightTracker::new();
		tracker.on_hover(Some(&node), &links);
		assert_eq!(tracker.state().neighbor_ids.len(), 1);
		assert_eq!(tracker.state().highlight_links.len(), 1);
	}
}
