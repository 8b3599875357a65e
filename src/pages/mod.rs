pub mod chat;
pub mod dashboard;
pub mod documents;
pub mod graph;
pub mod not_found;
pub mod summaries;
