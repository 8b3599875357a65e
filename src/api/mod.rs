//! Backend REST client and its wire types.

mod client;
pub mod types;

pub use client::{ApiClient, decode};
