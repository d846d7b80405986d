//! Configuration for dataset generation and the HTTP endpoint

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::generator::ConnectionConfig;

/// Default number of events for in-process generation
pub const DEFAULT_EVENT_COUNT: usize = 500;

/// Default number of events served by the network endpoint
pub const DEFAULT_SERVER_EVENT_COUNT: usize = 2000;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration for one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of events to generate
    pub event_count: usize,
    /// Seed for reproducible datasets (None = fresh entropy)
    pub seed: Option<u64>,
    /// Connection heuristic tunables
    pub connections: ConnectionConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            event_count: DEFAULT_EVENT_COUNT,
            seed: None,
            connections: ConnectionConfig::default(),
        }
    }
}

impl GenerationConfig {
    pub fn with_count(mut self, event_count: usize) -> Self {
        self.event_count = event_count;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Random source for this run: seeded when a seed is set
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Configuration for the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Generation settings for each `/api/events` request
    pub generation: GenerationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            generation: GenerationConfig::default().with_count(DEFAULT_SERVER_EVENT_COUNT),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let generation = GenerationConfig::default();
        assert_eq!(generation.event_count, 500);
        assert!(generation.seed.is_none());

        let server = ServerConfig::default();
        assert_eq!(server.generation.event_count, 2000);
        assert_eq!(server.addr().port(), DEFAULT_PORT);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = GenerationConfig::default().with_seed(Some(5));
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"event_count": 10, "seed": 3}"#).unwrap();
        assert_eq!(config.event_count, 10);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.connections.time_window, 20);
    }
}
