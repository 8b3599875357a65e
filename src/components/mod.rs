pub mod chat;
pub mod dashboard;
pub mod documents;
pub mod force_graph;
pub mod search;
pub mod shortcuts;
pub mod store;
