//! Heuristic connection generation between events
//!
//! For every event a random number of candidate targets is drawn. A candidate
//! becomes a connection when the pair is not yet connected and the events share
//! a category, lie within the time window, or a residual coin flip succeeds.
//! Existing pairs are indexed by an order-independent key, so the dedup check
//! is O(1) per candidate.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CauseMapError, Result};
use crate::types::{pair_key, Connection, ConnectionId, ConnectionType, Event, EventId};

/// Tunables for connection generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Minimum number of candidate draws per event
    pub min_candidates: usize,
    /// Maximum number of candidate draws per event (inclusive)
    pub max_candidates: usize,
    /// Year difference strictly below which two events count as close in time
    pub time_window: i32,
    /// A residual draw above this value connects otherwise unrelated events
    pub residual_threshold: f64,
    /// Strength of same-category connections
    pub category_strength: f32,
    /// Strength of all other connections
    pub temporal_strength: f32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            min_candidates: 2,
            max_candidates: 6,
            time_window: 20,
            residual_threshold: 0.6,
            category_strength: 0.8,
            temporal_strength: 0.4,
        }
    }
}

impl ConnectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_candidates > self.max_candidates {
            return Err(CauseMapError::Config(format!(
                "min_candidates ({}) exceeds max_candidates ({})",
                self.min_candidates, self.max_candidates
            )));
        }
        if !self.residual_threshold.is_finite() {
            return Err(CauseMapError::Config(
                "residual_threshold must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Derives connections for a snapshot of events
#[derive(Debug, Clone)]
pub struct ConnectionGenerator {
    config: ConnectionConfig,
}

impl Default for ConnectionGenerator {
    fn default() -> Self {
        Self {
            config: ConnectionConfig::default(),
        }
    }
}

impl ConnectionGenerator {
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Generate connections; fewer than two events yield none
    pub fn generate<R: Rng + ?Sized>(&self, events: &[Event], rng: &mut R) -> Vec<Connection> {
        let mut connections = Vec::new();
        if events.len() < 2 {
            return connections;
        }

        let mut linked: HashSet<(EventId, EventId)> = HashSet::new();
        let mut next_id: ConnectionId = 1;

        for (index, event) in events.iter().enumerate() {
            let draws = rng.gen_range(self.config.min_candidates..=self.config.max_candidates);

            for _ in 0..draws {
                let target_index = rng.gen_range(0..events.len());
                if target_index == index {
                    continue;
                }
                let target = &events[target_index];
                // Duplicate ids in loaded snapshots would otherwise form self loops
                if target.id == event.id {
                    continue;
                }

                let key = pair_key(event.id, target.id);
                if linked.contains(&key) {
                    continue;
                }

                let same_category = event.category == target.category;
                let time_proximity = match (event.year(), target.year()) {
                    (Some(a), Some(b)) => (a - b).abs() < self.config.time_window,
                    _ => false,
                };

                if same_category
                    || time_proximity
                    || rng.gen::<f64>() > self.config.residual_threshold
                {
                    linked.insert(key);
                    connections.push(Connection {
                        id: next_id,
                        source: event.id,
                        target: target.id,
                        strength: if same_category {
                            self.config.category_strength
                        } else {
                            self.config.temporal_strength
                        },
                        kind: if same_category {
                            ConnectionType::Category
                        } else {
                            ConnectionType::Temporal
                        },
                    });
                    next_id += 1;
                }
            }
        }

        tracing::info!(
            "Generated {} connections for {} events",
            connections.len(),
            events.len()
        );
        connections
    }
}
