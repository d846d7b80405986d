//! Bounded hierarchy of related events
//!
//! Roots are the most important events; each node's children are its most
//! important directly connected events. The connection graph may contain
//! cycles, so the depth bound is what terminates recursion, and an event can
//! appear under several parents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Connection, Event, EventId};

/// Label of the synthetic root
pub const TREE_ROOT_NAME: &str = "Historical events";

/// Tree shape limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Number of top-level events
    pub root_count: usize,
    /// Children kept per node
    pub max_children: usize,
    /// Deepest level that still gets children is `max_depth - 1`
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_count: 5,
            max_children: 3,
            max_depth: 3,
        }
    }
}

/// An event with its bounded list of related events
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<'a> {
    #[serde(flatten)]
    pub event: &'a Event,
    pub children: Vec<TreeNode<'a>>,
}

impl TreeNode<'_> {
    /// Levels below this node (a leaf has depth 0)
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(|c| c.size()).sum::<usize>()
    }
}

/// Synthetic root wrapping the top-level nodes
#[derive(Debug, Clone, Serialize)]
pub struct EventTree<'a> {
    pub name: String,
    pub children: Vec<TreeNode<'a>>,
}

/// Builds event trees from a snapshot
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    config: TreeConfig,
}

impl TreeBuilder {
    pub fn new(config: TreeConfig) -> Self {
        Self { config }
    }

    /// Build the tree, optionally restricted to one category
    ///
    /// Children are resolved only among the (category-filtered) events.
    pub fn build<'a>(
        &self,
        events: &'a [Event],
        links: &[Connection],
        category: Option<&str>,
    ) -> EventTree<'a> {
        let filtered: Vec<&'a Event> = events
            .iter()
            .filter(|e| category.map_or(true, |c| e.category == c))
            .collect();

        let mut by_id: HashMap<EventId, &'a Event> = HashMap::with_capacity(filtered.len());
        for &event in &filtered {
            by_id.entry(event.id).or_insert(event);
        }

        let mut adjacency: HashMap<EventId, Vec<EventId>> = HashMap::new();
        for link in links {
            adjacency.entry(link.source).or_default().push(link.target);
            if link.target != link.source {
                adjacency.entry(link.target).or_default().push(link.source);
            }
        }

        let mut roots = filtered;
        roots.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        roots.truncate(self.config.root_count);

        let children = roots
            .into_iter()
            .map(|event| self.build_node(event, 0, &by_id, &adjacency))
            .collect();

        EventTree {
            name: TREE_ROOT_NAME.to_string(),
            children,
        }
    }

    fn build_node<'a>(
        &self,
        event: &'a Event,
        depth: usize,
        by_id: &HashMap<EventId, &'a Event>,
        adjacency: &HashMap<EventId, Vec<EventId>>,
    ) -> TreeNode<'a> {
        if depth >= self.config.max_depth {
            return TreeNode {
                event,
                children: Vec::new(),
            };
        }

        let mut related: Vec<&'a Event> = adjacency
            .get(&event.id)
            .map(|ids| ids.iter().filter_map(|id| by_id.get(id).copied()).collect())
            .unwrap_or_default();
        related.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        related.truncate(self.config.max_children);

        TreeNode {
            event,
            children: related
                .into_iter()
                .map(|child| self.build_node(child, depth + 1, by_id, adjacency))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{make_event, make_link};

    fn chain(len: u64) -> (Vec<Event>, Vec<Connection>) {
        let events = (1..=len)
            .map(|id| make_event(id, 1950, "WARS", 100.0 - id as f32))
            .collect();
        let links = (1..len).map(|id| make_link(id, id, id + 1)).collect();
        (events, links)
    }

    fn assert_bounds(node: &TreeNode<'_>, depth: usize) {
        assert!(node.children.len() <= 3);
        assert!(depth <= 3);
        for child in &node.children {
            assert_bounds(child, depth + 1);
        }
    }

    #[test]
    fn test_roots_are_top_five_by_importance() {
        let events: Vec<Event> = (1..=8)
            .map(|id| make_event(id, 1950, "A", (id * 10) as f32))
            .collect();
        let tree = TreeBuilder::default().build(&events, &[], None);
        let roots: Vec<EventId> = tree.children.iter().map(|n| n.event.id).collect();
        assert_eq!(roots, vec![8, 7, 6, 5, 4]);
        assert_eq!(tree.name, TREE_ROOT_NAME);
    }

    #[test]
    fn test_depth_is_bounded_on_long_chain() {
        let (events, links) = chain(10);
        let tree = TreeBuilder::default().build(&events, &links, None);
        for root in &tree.children {
            assert!(root.depth() <= 3);
            assert_bounds(root, 0);
        }
        // Event 1 is the most important root; its only path walks the chain
        assert_eq!(tree.children[0].event.id, 1);
        assert_eq!(tree.children[0].depth(), 3);
    }

    #[test]
    fn test_cycles_terminate() {
        let events = vec![
            make_event(1, 1950, "A", 90.0),
            make_event(2, 1950, "A", 80.0),
        ];
        let links = vec![make_link(1, 1, 2)];
        let tree = TreeBuilder::default().build(&events, &links, None);
        let root = &tree.children[0];
        // 1 -> 2 -> 1 -> 2 until the depth bound stops it
        assert_eq!(root.depth(), 3);
        assert_eq!(root.size(), 4);
        assert_eq!(root.children[0].children[0].event.id, 1);
    }

    #[test]
    fn test_children_are_top_three_by_importance() {
        let mut events = vec![make_event(1, 1950, "A", 99.0)];
        let mut links = Vec::new();
        for id in 2..=6u64 {
            events.push(make_event(id, 1950, "A", 50.0 + id as f32));
            links.push(make_link(id, 1, id));
        }
        let tree = TreeBuilder::default().build(&events, &links, None);
        let root = &tree.children[0];
        let children: Vec<EventId> = root.children.iter().map(|n| n.event.id).collect();
        assert_eq!(children, vec![6, 5, 4]);
    }

    #[test]
    fn test_category_restricts_roots_and_children() {
        let events = vec![
            make_event(1, 1950, "WARS", 90.0),
            make_event(2, 1950, "ECONOMY", 99.0),
            make_event(3, 1950, "WARS", 70.0),
        ];
        let links = vec![make_link(1, 1, 2), make_link(2, 1, 3)];
        let tree = TreeBuilder::default().build(&events, &links, Some("WARS"));
        let roots: Vec<EventId> = tree.children.iter().map(|n| n.event.id).collect();
        assert_eq!(roots, vec![1, 3]);
        let children: Vec<EventId> = tree.children[0]
            .children
            .iter()
            .map(|n| n.event.id)
            .collect();
        assert_eq!(children, vec![3]);
    }

    #[test]
    fn test_empty_input() {
        let tree = TreeBuilder::default().build(&[], &[], None);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_serializes_flat_event_with_children() {
        let (events, links) = chain(2);
        let tree = TreeBuilder::default().build(&events, &links, None);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["name"], TREE_ROOT_NAME);
        assert_eq!(json["children"][0]["id"], 1);
        assert_eq!(json["children"][0]["children"][0]["id"], 2);
    }
}
