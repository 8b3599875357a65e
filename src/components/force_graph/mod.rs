//! Canvas knowledge-graph explorer built on the `force_graph` simulation.

mod colors;
mod component;
mod highlight;
mod loader;
mod paint;
mod render;
mod state;
mod surface;
mod tier;
mod types;

pub use colors::group_color;
pub use component::{ForceGraphCanvas, GraphHandle};
pub use highlight::HighlightTracker;
pub use loader::{GraphLoader, load};
pub use state::HoverInfo;
pub use tier::{Tier, TierConfig, select_tier};
pub use types::{GraphData, GraphLink, GraphNode, NodeGroup};
