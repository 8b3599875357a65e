//! Graph payload loading: degree/size derivation and change suppression.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use log::{error, info};

use super::tier::{TierConfig, select_tier};
use super::types::{GraphData, Which};
use crate::api::ApiClient;
use crate::api::types::GraphPayload;
use crate::error::Result;

/// Render-size weight for a node with `connections` incident edges.
pub fn node_val(connections: u32) -> f64 {
	((connections as f64 + 1.0).log2() * 4.0).max(2.0)
}

/// Fills `connections` and `val` on every node. A node's server `degree` is
/// used when present; otherwise link endpoint occurrences are counted.
pub fn prepare(data: &mut GraphData) {
	let mut degrees: HashMap<&str, u32> = HashMap::new();
	for link in &data.links {
		*degrees.entry(link.endpoint_id(Which::Source)).or_default() += 1;
		*degrees.entry(link.endpoint_id(Which::Target)).or_default() += 1;
	}
	let counted: Vec<u32> = data
		.nodes
		.iter()
		.map(|node| {
			node.degree
				.unwrap_or_else(|| degrees.get(node.id.as_str()).copied().unwrap_or(0))
		})
		.collect();

	for (node, degree) in data.nodes.iter_mut().zip(counted) {
		node.connections = degree.max(1);
		node.val = node_val(node.connections);
	}
}

/// Holds the current graph and replaces it only when the payload shape changes.
pub struct GraphLoader {
	data: Arc<GraphData>,
	tier: TierConfig,
	total: usize,
	prev_hash: Option<String>,
}

impl Default for GraphLoader {
	fn default() -> Self {
		Self {
			data: Arc::new(GraphData::default()),
			tier: select_tier(0),
			total: 0,
			prev_hash: None,
		}
	}
}

impl GraphLoader {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn data(&self) -> Arc<GraphData> {
		self.data.clone()
	}

	pub fn tier(&self) -> TierConfig {
		self.tier
	}

	pub fn total(&self) -> usize {
		self.total
	}

	/// Forgets the last hash so the next payload always replaces the graph.
	pub fn reset(&mut self) {
		self.prev_hash = None;
	}

	/// Prepares `payload` and stores it unless `"{nodes}:{links}"` matches the
	/// previous load. Returns whether the stored graph was replaced.
	pub fn apply(&mut self, payload: GraphPayload) -> bool {
		let hash = format!("{}:{}", payload.nodes.len(), payload.links.len());
		if self.prev_hash.as_deref() == Some(hash.as_str()) {
			return false;
		}

		let mut data = GraphData {
			nodes: payload.nodes,
			links: payload.links,
		};
		prepare(&mut data);

		self.tier = select_tier(data.nodes.len());
		self.total = if payload.total > 0 {
			payload.total
		} else {
			data.nodes.len()
		};
		info!(
			"graph loaded: {} nodes, {} links, tier {:?}",
			data.nodes.len(),
			data.links.len(),
			self.tier.tier
		);
		self.data = Arc::new(data);
		self.prev_hash = Some(hash);
		true
	}
}

impl GraphLoader {
	/// Takes the outcome of a graph fetch. A failure is logged and leaves the
	/// current graph, tier and total in place.
	pub fn accept(&mut self, fetched: Result<GraphPayload>) -> bool {
		match fetched {
			Ok(payload) => self.apply(payload),
			Err(e) => {
				error!("failed to fetch graph: {}", e);
				false
			}
		}
	}
}

/// Fetches `/graph?limit=N` into `loader`. Returns whether the graph was replaced.
pub async fn load(client: &ApiClient, loader: &RefCell<GraphLoader>, limit: usize) -> bool {
	let fetched = client.graph(limit).await;
	loader.borrow_mut().accept(fetched)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::tier::Tier;
	use crate::error::ApiError;
	use crate::components::force_graph::types::{GraphLink, GraphNode, NodeGroup};

	fn payload() -> GraphPayload {
		GraphPayload {
			nodes: vec![
				GraphNode::new("Acme Corp", NodeGroup::Organization),
				GraphNode::new("Jane Doe", NodeGroup::Person),
			],
			links: vec![GraphLink::new("Jane Doe", "Acme Corp", Some("EMPLOYED_BY"))],
			total: 0,
		}
	}

	#[test]
	fn single_link_gives_one_connection_each() {
		let mut loader = GraphLoader::new();
		assert!(loader.apply(payload()));
		let data = loader.data();
		for node in &data.nodes {
			assert_eq!(node.connections, 1);
			assert_eq!(node.val, 4.0);
		}
		assert_eq!(loader.total(), 2);
		assert_eq!(loader.tier().tier, Tier::Small);
	}

	#[test]
	fn computed_degree_counts_endpoints() {
		let nodes = ["a", "b", "c", "d"]
			.iter()
			.map(|id| GraphNode::new(*id, NodeGroup::Entity))
			.collect();
		let links = vec![
			GraphLink::new("a", "b", None),
			GraphLink::new("a", "c", None),
			GraphLink::new("c", "a", None),
		];
		let mut data = GraphData { nodes, links };
		prepare(&mut data);

		let connections: Vec<u32> = data.nodes.iter().map(|n| n.connections).collect();
		assert_eq!(connections, vec![3, 1, 2, 1]);
		for node in &data.nodes {
			let expected = ((node.connections as f64 + 1.0).log2() * 4.0).max(2.0);
			assert_eq!(node.val, expected);
		}
		// isolated node still gets the minimum
		assert_eq!(data.nodes[3].val, 4.0);
	}

	#[test]
	fn server_degree_wins() {
		let mut node = GraphNode::new("hub", NodeGroup::Statute);
		node.degree = Some(15);
		let mut zero = GraphNode::new("zero", NodeGroup::Date);
		zero.degree = Some(0);
		let mut data = GraphData {
			nodes: vec![node, zero],
			links: vec![GraphLink::new("hub", "zero", None)],
		};
		prepare(&mut data);
		assert_eq!(data.nodes[0].connections, 15);
		assert_eq!(data.nodes[0].val, 16.0);
		assert_eq!(data.nodes[1].connections, 1);
	}

	#[test]
	fn unchanged_shape_keeps_reference() {
		let mut loader = GraphLoader::new();
		assert!(loader.apply(payload()));
		let first = loader.data();
		assert!(!loader.apply(payload()));
		assert!(Arc::ptr_eq(&first, &loader.data()));

		loader.reset();
		assert!(loader.apply(payload()));
		assert!(!Arc::ptr_eq(&first, &loader.data()));
	}

	#[test]
	fn failed_fetch_keeps_previous_graph() {
		let mut loader = GraphLoader::new();
		let mut p = payload();
		p.total = 12;
		assert!(loader.accept(Ok(p)));
		let (first, tier) = (loader.data(), loader.tier());

		let failed = Err(ApiError::Status {
			status: 503,
			detail: None,
		});
		assert!(!loader.accept(failed));
		assert!(Arc::ptr_eq(&first, &loader.data()));
		assert_eq!(loader.tier(), tier);
		assert_eq!(loader.total(), 12);

		// a failure after reset does not wipe the graph either
		loader.reset();
		assert!(!loader.accept(Err(ApiError::Transport("offline".into()))));
		assert!(Arc::ptr_eq(&first, &loader.data()));
	}

	#[test]
	fn server_total_is_kept() {
		let mut loader = GraphLoader::new();
		let mut p = payload();
		p.total = 40;
		loader.apply(p);
		assert_eq!(loader.total(), 40);
	}
}
