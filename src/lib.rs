//! CauseMap - historical event graphs
//!
//! Synthetic event datasets with heuristic connections, plus the queries a
//! visualization front end needs: filtering, neighborhoods, timelines, map
//! placement, tag clouds and bounded event trees.

pub mod categories;
pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod loader;
pub mod server;
pub mod tags;
pub mod tree;
pub mod types;

pub use categories::CategoryRegistry;
pub use error::{CauseMapError, Result};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
