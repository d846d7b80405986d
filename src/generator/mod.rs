//! Synthetic dataset generation
//!
//! Provides:
//! - Event generation from the category registry
//! - Heuristic connection derivation with pair de-duplication
//! - A dataset factory producing a fresh `{nodes, links}` snapshot

mod connections;
mod events;

pub use connections::*;
pub use events::*;

use rand::Rng;

use crate::categories::CategoryRegistry;
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::types::GraphData;

impl GraphData {
    /// Generate a new snapshot of events and their connections
    ///
    /// Each call produces an independent snapshot; nothing is cached between
    /// calls, so changing the count means calling this again.
    pub fn generate<R: Rng + ?Sized>(
        registry: &CategoryRegistry,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let connections = ConnectionGenerator::new(config.connections.clone())?;
        let nodes = EventGenerator::new(registry).generate(config.event_count, rng)?;
        let links = connections.generate(&nodes, rng);
        Ok(GraphData { nodes, links })
    }
}
