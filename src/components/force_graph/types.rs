//! Graph data structures consumed by the loader, tracker and painter.

use serde::{Deserialize, Serialize};

/// Entity category assigned by the extraction backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum NodeGroup {
	Person,
	Organization,
	Statute,
	Date,
	Document,
	#[default]
	#[serde(other)]
	Entity,
}

impl NodeGroup {
	pub fn as_str(&self) -> &'static str {
		match self {
			NodeGroup::Person => "Person",
			NodeGroup::Organization => "Organization",
			NodeGroup::Statute => "Statute",
			NodeGroup::Date => "Date",
			NodeGroup::Document => "Document",
			NodeGroup::Entity => "Entity",
		}
	}
}

fn nan() -> f64 {
	f64::NAN
}

/// An extracted entity.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GraphNode {
	/// Entity name, unique within a payload.
	pub id: String,
	#[serde(default)]
	pub group: NodeGroup,
	/// Degree computed by the server, when it sends one.
	#[serde(default)]
	pub degree: Option<u32>,
	/// Incident edge count, at least 1.
	#[serde(default, skip_serializing)]
	pub connections: u32,
	/// Render-size weight derived from `connections`.
	#[serde(default, skip_serializing)]
	pub val: f64,
	/// Simulation position; NaN until the first layout pass.
	#[serde(default = "nan", skip_serializing)]
	pub x: f64,
	#[serde(default = "nan", skip_serializing)]
	pub y: f64,
}

impl GraphNode {
	pub fn new(id: impl Into<String>, group: NodeGroup) -> Self {
		Self {
			id: id.into(),
			group,
			degree: None,
			connections: 0,
			val: 0.0,
			x: f64::NAN,
			y: f64::NAN,
		}
	}

	pub fn has_position(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// A link endpoint after the simulation has resolved it to a node.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NodeRef {
	pub id: String,
	#[serde(default = "nan")]
	pub x: f64,
	#[serde(default = "nan")]
	pub y: f64,
}

/// Either a bare node id (as sent by the server) or a resolved reference.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LinkEnd {
	Id(String),
	Node(NodeRef),
}

impl LinkEnd {
	pub fn id(&self) -> &str {
		match self {
			LinkEnd::Id(id) => id,
			LinkEnd::Node(node) => &node.id,
		}
	}

	/// Coordinates, only once resolved and finite.
	pub fn position(&self) -> Option<(f64, f64)> {
		match self {
			LinkEnd::Node(node) if node.x.is_finite() && node.y.is_finite() => Some((node.x, node.y)),
			_ => None,
		}
	}
}

impl From<&str> for LinkEnd {
	fn from(id: &str) -> Self {
		LinkEnd::Id(id.to_string())
	}
}

/// Which end of a link to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Which {
	Source,
	Target,
}

/// A directed relation between two entities.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GraphLink {
	pub source: LinkEnd,
	pub target: LinkEnd,
	/// Relation type, e.g. `CONTRADICTS`.
	#[serde(default)]
	pub label: Option<String>,
}

impl GraphLink {
	pub fn new(source: &str, target: &str, label: Option<&str>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			label: label.map(str::to_string),
		}
	}

	pub fn endpoint_id(&self, which: Which) -> &str {
		match which {
			Which::Source => self.source.id(),
			Which::Target => self.target.id(),
		}
	}

	pub fn source_id(&self) -> &str {
		self.endpoint_id(Which::Source)
	}

	pub fn target_id(&self) -> &str {
		self.endpoint_id(Which::Target)
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
