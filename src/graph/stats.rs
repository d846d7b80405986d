//! Graph statistics and metrics

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::categories::CategoryRegistry;
use crate::types::{EventId, GraphData};

/// Number of hub nodes reported in [`GraphStats`]
pub const HUB_COUNT: usize = 10;

/// Event count for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub key: String,
    pub name: String,
    pub count: usize,
}

/// Graph statistics and metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    /// Total number of events
    pub node_count: usize,
    /// Total number of connections
    pub edge_count: usize,
    /// Average degree (connections per event)
    pub avg_degree: f32,
    /// Connections / possible undirected pairs
    pub density: f32,
    /// Number of connected components
    pub component_count: usize,
    /// Size of largest component
    pub largest_component_size: usize,
    /// Events per registry category, in registry order
    pub nodes_by_category: Vec<CategoryCount>,
    /// Events whose category is not in the registry
    pub uncategorized_count: usize,
    /// Connections by type tag
    pub edges_by_type: HashMap<String, usize>,
    /// Most connected events (top 10 by degree)
    pub hub_nodes: Vec<(EventId, usize)>,
    /// Events without connections
    pub isolated_count: usize,
}

impl GraphData {
    /// Calculate graph statistics
    pub fn stats(&self, registry: &CategoryRegistry) -> GraphStats {
        let node_count = self.nodes.len();
        let edge_count = self.links.len();

        let mut degree: HashMap<EventId, usize> = HashMap::new();
        for node in &self.nodes {
            degree.insert(node.id, 0);
        }
        for link in &self.links {
            *degree.entry(link.source).or_insert(0) += 1;
            *degree.entry(link.target).or_insert(0) += 1;
        }

        let avg_degree = if node_count > 0 {
            degree.values().sum::<usize>() as f32 / node_count as f32
        } else {
            0.0
        };

        let density = if node_count > 1 {
            edge_count as f32 / (node_count * (node_count - 1) / 2) as f32
        } else {
            0.0
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for node in &self.nodes {
            *counts.entry(node.category.as_str()).or_insert(0) += 1;
        }
        let nodes_by_category: Vec<CategoryCount> = registry
            .categories()
            .iter()
            .map(|c| CategoryCount {
                key: c.key.clone(),
                name: c.name.clone(),
                count: counts.get(c.key.as_str()).copied().unwrap_or(0),
            })
            .collect();
        let uncategorized_count = self
            .nodes
            .iter()
            .filter(|n| !registry.contains(&n.category))
            .count();

        let mut edges_by_type: HashMap<String, usize> = HashMap::new();
        for link in &self.links {
            *edges_by_type
                .entry(link.kind.as_str().to_string())
                .or_insert(0) += 1;
        }

        // Ties broken by id so the report is stable
        let mut degree_list: Vec<(EventId, usize)> =
            degree.iter().map(|(&k, &v)| (k, v)).collect();
        degree_list.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let hub_nodes: Vec<(EventId, usize)> = degree_list.into_iter().take(HUB_COUNT).collect();

        let isolated_count = self
            .nodes
            .iter()
            .filter(|n| degree.get(&n.id).copied().unwrap_or(0) == 0)
            .count();

        let components = self.connected_components();
        let component_count = components.len();
        let largest_component_size = components.iter().map(|c| c.len()).max().unwrap_or(0);

        GraphStats {
            node_count,
            edge_count,
            avg_degree,
            density,
            component_count,
            largest_component_size,
            nodes_by_category,
            uncategorized_count,
            edges_by_type,
            hub_nodes,
            isolated_count,
        }
    }

    /// Connected components (links treated as undirected), found with BFS
    pub fn connected_components(&self) -> Vec<Vec<EventId>> {
        let mut adj: HashMap<EventId, Vec<EventId>> = HashMap::new();
        for node in &self.nodes {
            adj.entry(node.id).or_default();
        }
        for link in &self.links {
            if let Some(list) = adj.get_mut(&link.source) {
                list.push(link.target);
            }
            if let Some(list) = adj.get_mut(&link.target) {
                list.push(link.source);
            }
        }

        let mut visited: HashSet<EventId> = HashSet::new();
        let mut components = Vec::new();

        for node in &self.nodes {
            let start = node.id;
            if !visited.insert(start) {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                component.push(current);
                if let Some(neighbors) = adj.get(&current) {
                    for &neighbor in neighbors {
                        if visited.insert(neighbor) {
                            queue.push_back(neighbor);
                        }
                    }
                }
            }

            components.push(component);
        }

        components
    }
}
