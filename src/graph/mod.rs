//! Event graph queries
//!
//! Provides:
//! - Category, text, year-range and importance filtering
//! - Induced neighborhood of a selected event
//! - Graph statistics and metrics
//! - Timeline and geographic views
//!
//! Every query is a pure function of the snapshot and the filter state; the
//! underlying node and link vectors are never mutated.

mod stats;
mod views;

pub use stats::*;
pub use views::*;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::types::{Event, EventId, GraphData};

/// Sentinel accepted wherever a category selection is parsed
pub const ALL_CATEGORIES: &str = "ALL";

/// Importance above which an event counts as important
pub const IMPORTANT_THRESHOLD: f32 = 80.0;

/// Width of the "recent" quick filter in years
pub const RECENT_YEARS: i32 = 10;

// =============================================================================
// Category selection
// =============================================================================

/// Active set of category keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySelection {
    /// No category filtering
    #[default]
    All,
    /// Only events whose category key is in the set
    Only(BTreeSet<String>),
}

impl CategorySelection {
    pub fn only<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CategorySelection::Only(keys.into_iter().map(Into::into).collect())
    }

    /// Parse "ALL" or a comma-separated list of keys
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return CategorySelection::All;
        }
        Self::only(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty()),
        )
    }

    pub fn is_all(&self) -> bool {
        matches!(self, CategorySelection::All)
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Only(keys) => keys.contains(category),
        }
    }

    /// Switch one category on or off
    ///
    /// Toggling while everything is selected deselects `key` from `universe`.
    pub fn toggle<'a, I>(&mut self, key: &str, universe: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.is_all() {
            *self = Self::only(universe.into_iter().filter(|k| *k != key));
            return;
        }
        if let CategorySelection::Only(keys) = self {
            if !keys.remove(key) {
                keys.insert(key.to_string());
            }
        }
    }
}

// =============================================================================
// Year ranges
// =============================================================================

/// Inclusive range of years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Period::All.range()
    }
}

/// Named shorthand for common year ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Wwi,
    Wwii,
    ColdWar,
    Modern,
    All,
}

impl Period {
    pub const VARIANTS: [Period; 5] = [
        Period::Wwi,
        Period::Wwii,
        Period::ColdWar,
        Period::Modern,
        Period::All,
    ];

    pub fn range(&self) -> YearRange {
        match self {
            Period::Wwi => YearRange::new(1914, 1918),
            Period::Wwii => YearRange::new(1939, 1945),
            Period::ColdWar => YearRange::new(1947, 1991),
            Period::Modern => YearRange::new(1991, 2024),
            Period::All => YearRange::new(1900, 2024),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Wwi => "WWI",
            Period::Wwii => "WWII",
            Period::ColdWar => "Cold War",
            Period::Modern => "Modern",
            Period::All => "All",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "wwi" | "ww1" => Ok(Period::Wwi),
            "wwii" | "ww2" => Ok(Period::Wwii),
            "coldwar" => Ok(Period::ColdWar),
            "modern" => Ok(Period::Modern),
            "all" => Ok(Period::All),
            _ => Err(format!("Unknown period: {}", s)),
        }
    }
}

// =============================================================================
// Graph filtering
// =============================================================================

/// Filter state applied to a snapshot; all predicates are combined with AND
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphFilter {
    /// Active categories
    pub categories: CategorySelection,
    /// Case-insensitive substring of the event name
    pub search: Option<String>,
    /// Inclusive year bounds
    pub years: Option<YearRange>,
    /// Events must be strictly more important than this
    pub min_importance: Option<f32>,
}

impl GraphFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: CategorySelection) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_year_range(mut self, range: YearRange) -> Self {
        self.years = Some(range);
        self
    }

    pub fn with_period(self, period: Period) -> Self {
        self.with_year_range(period.range())
    }

    /// Set the lower bound, keeping the current upper bound
    pub fn with_start_year(mut self, start: i32) -> Self {
        let mut range = self.years.unwrap_or_default();
        range.start = start;
        self.years = Some(range);
        self
    }

    /// Set the upper bound, keeping the current lower bound
    pub fn with_end_year(mut self, end: i32) -> Self {
        let mut range = self.years.unwrap_or_default();
        range.end = end;
        self.years = Some(range);
        self
    }

    pub fn with_min_importance(mut self, min: f32) -> Self {
        self.min_importance = Some(min);
        self
    }

    /// Only events with importance above 80
    pub fn important(self) -> Self {
        self.with_min_importance(IMPORTANT_THRESHOLD)
    }

    /// Only events from the last ten years before `current_year`
    pub fn recent(self, current_year: i32) -> Self {
        self.with_year_range(YearRange::new(current_year - RECENT_YEARS, current_year))
    }

    /// `recent` relative to the wall clock
    pub fn recent_from_now(self) -> Self {
        self.recent(chrono::Utc::now().year())
    }

    /// True if the event passes every active predicate
    pub fn matches(&self, event: &Event) -> bool {
        if !self.categories.matches(&event.category) {
            return false;
        }

        if let Some(ref search) = self.search {
            if !search.is_empty()
                && !event
                    .name
                    .to_lowercase()
                    .contains(&search.to_lowercase())
            {
                return false;
            }
        }

        if let Some(range) = self.years {
            match event.year() {
                Some(year) if range.contains(year) => {}
                _ => return false,
            }
        }

        if let Some(min) = self.min_importance {
            if event.importance <= min {
                return false;
            }
        }

        true
    }

    /// Events passing the filter, in snapshot order
    pub fn apply<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter().filter(|e| self.matches(e)).collect()
    }
}

impl GraphData {
    /// Apply a filter to create a subgraph
    ///
    /// A link survives only when both of its endpoints pass the filter.
    pub fn filter(&self, filter: &GraphFilter) -> GraphData {
        let nodes: Vec<Event> = self
            .nodes
            .iter()
            .filter(|n| filter.matches(n))
            .cloned()
            .collect();

        let valid_ids: HashSet<EventId> = nodes.iter().map(|n| n.id).collect();

        let links = self
            .links
            .iter()
            .filter(|l| valid_ids.contains(&l.source) && valid_ids.contains(&l.target))
            .cloned()
            .collect();

        let result = GraphData { nodes, links };
        tracing::debug!(
            "Filter kept {}/{} nodes and {}/{} links",
            result.nodes.len(),
            self.nodes.len(),
            result.links.len(),
            self.links.len()
        );
        result
    }

    /// The selected event, its direct neighbors, and the links incident to it
    ///
    /// Links among the neighbors themselves are not included. An unknown id
    /// yields an empty graph.
    pub fn neighborhood(&self, center: EventId) -> GraphData {
        if self.event(center).is_none() {
            return GraphData::default();
        }

        let links: Vec<_> = self
            .links
            .iter()
            .filter(|l| l.touches(center))
            .cloned()
            .collect();

        let mut ids: HashSet<EventId> = links.iter().filter_map(|l| l.other(center)).collect();
        ids.insert(center);

        let nodes = self
            .nodes
            .iter()
            .filter(|n| ids.contains(&n.id))
            .cloned()
            .collect();

        GraphData { nodes, links }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{Connection, ConnectionType};

    pub(crate) fn make_event(id: EventId, year: i32, category: &str, importance: f32) -> Event {
        Event {
            id,
            name: format!("Event {} ({})", id, year),
            date: year.to_string(),
            category: category.to_string(),
            subcategory: None,
            color: "#fff".to_string(),
            importance,
            description: String::new(),
            causes: Vec::new(),
            effects: Vec::new(),
            sources: Vec::new(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    pub(crate) fn make_link(id: u64, source: EventId, target: EventId) -> Connection {
        Connection {
            id,
            source,
            target,
            strength: 0.4,
            kind: ConnectionType::Temporal,
        }
    }

    fn sample_graph() -> GraphData {
        GraphData {
            nodes: vec![
                make_event(1, 1914, "WARS", 95.0),
                make_event(2, 1941, "WARS", 70.0),
                make_event(3, 1944, "ECONOMY", 85.0),
                make_event(4, 1990, "TECHNOLOGY", 60.0),
                make_event(5, 2020, "HEALTH", 99.0),
            ],
            links: vec![
                make_link(1, 1, 2),
                make_link(2, 2, 3),
                make_link(3, 3, 4),
                make_link(4, 5, 2),
                make_link(5, 4, 5),
            ],
        }
    }

    fn ids(data: &GraphData) -> Vec<EventId> {
        data.nodes.iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_category_filter() {
        let graph = sample_graph();
        let filter = GraphFilter::new().with_categories(CategorySelection::only(["WARS"]));
        let result = graph.filter(&filter);
        assert_eq!(ids(&result), vec![1, 2]);
        assert_eq!(result.links.len(), 1);
    }

    #[test]
    fn test_category_filter_idempotent() {
        let graph = sample_graph();
        let filter =
            GraphFilter::new().with_categories(CategorySelection::only(["WARS", "ECONOMY"]));
        let once = graph.filter(&filter);
        let twice = once.filter(&filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_all_sentinel_disables_category_filter() {
        let graph = sample_graph();
        let filter = GraphFilter::new().with_categories(CategorySelection::parse("ALL"));
        assert_eq!(graph.filter(&filter), graph);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let graph = sample_graph();
        let result = graph.filter(&GraphFilter::new().with_search("eVeNt 3"));
        assert_eq!(ids(&result), vec![3]);

        let empty = graph.filter(&GraphFilter::new().with_search(""));
        assert_eq!(empty.nodes.len(), 5);
    }

    #[test]
    fn test_year_range_inclusive() {
        let graph = sample_graph();
        let result = graph.filter(&GraphFilter::new().with_period(Period::Wwii));
        assert_eq!(ids(&result), vec![2, 3]);
        for node in &result.nodes {
            let year = node.year().unwrap();
            assert!((1939..=1945).contains(&year));
        }

        let edge = graph.filter(&GraphFilter::new().with_year_range(YearRange::new(1914, 1914)));
        assert_eq!(ids(&edge), vec![1]);
    }

    #[test]
    fn test_year_bounds_edit_independently() {
        let filter = GraphFilter::new().with_start_year(1950);
        assert_eq!(filter.years, Some(YearRange::new(1950, 2024)));
        let filter = filter.with_end_year(1960);
        assert_eq!(filter.years, Some(YearRange::new(1950, 1960)));
    }

    #[test]
    fn test_unknown_year_fails_range() {
        let mut graph = sample_graph();
        graph.nodes[0].date = "unknown".to_string();
        let result = graph.filter(&GraphFilter::new().with_period(Period::All));
        assert!(!ids(&result).contains(&1));
    }

    #[test]
    fn test_combined_filters() {
        let graph = sample_graph();
        let filter = GraphFilter::new()
            .with_categories(CategorySelection::only(["WARS", "ECONOMY"]))
            .with_period(Period::Wwii)
            .with_search("event");
        let result = graph.filter(&filter);
        assert_eq!(ids(&result), vec![2, 3]);
        assert_eq!(result.links.len(), 1);
        assert_eq!(result.links[0].id, 2);
    }

    #[test]
    fn test_links_require_both_endpoints() {
        let graph = sample_graph();
        let filter = GraphFilter::new().with_categories(CategorySelection::only(["WARS", "HEALTH"]));
        let result = graph.filter(&filter);
        let kept: HashSet<EventId> = ids(&result).into_iter().collect();
        for link in &result.links {
            assert!(kept.contains(&link.source) && kept.contains(&link.target));
        }
        assert_eq!(result.links.len(), 2);
    }

    #[test]
    fn test_quick_filters() {
        let graph = sample_graph();
        let important = graph.filter(&GraphFilter::new().important());
        assert_eq!(ids(&important), vec![1, 3, 5]);

        let recent = graph.filter(&GraphFilter::new().recent(2024));
        assert_eq!(ids(&recent), vec![5]);
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let graph = sample_graph();
        let before = graph.clone();
        let _ = graph.filter(&GraphFilter::new().important());
        assert_eq!(graph, before);
    }

    #[test]
    fn test_neighborhood() {
        let graph = sample_graph();
        let result = graph.neighborhood(2);
        assert_eq!(ids(&result), vec![1, 2, 3, 5]);
        assert_eq!(result.links.len(), 3);
        for link in &result.links {
            assert!(link.touches(2));
        }
    }

    #[test]
    fn test_neighborhood_excludes_neighbor_links() {
        let graph = sample_graph();
        let result = graph.neighborhood(4);
        assert_eq!(ids(&result), vec![3, 4, 5]);
        // 3-4 and 4-5 only; 2-3 and 5-2 are not incident to 4
        assert_eq!(result.links.len(), 2);
    }

    #[test]
    fn test_neighborhood_unknown_node() {
        let graph = sample_graph();
        assert!(graph.neighborhood(99).is_empty());
    }

    #[test]
    fn test_neighborhood_of_filtered_view() {
        let graph = sample_graph();
        let filtered = graph.filter(&GraphFilter::new().with_categories(CategorySelection::only([
            "WARS", "HEALTH",
        ])));
        let result = filtered.neighborhood(2);
        assert_eq!(ids(&result), vec![1, 2, 5]);
    }

    #[test]
    fn test_selection_toggle() {
        let universe = ["A", "B", "C"];
        let mut selection = CategorySelection::All;
        selection.toggle("B", universe);
        assert_eq!(selection, CategorySelection::only(["A", "C"]));
        selection.toggle("B", universe);
        assert_eq!(selection, CategorySelection::only(["A", "B", "C"]));
        selection.toggle("A", universe);
        assert!(!selection.matches("A"));
    }

    #[test]
    fn test_selection_parse() {
        assert!(CategorySelection::parse("all").is_all());
        assert!(CategorySelection::parse("").is_all());
        let selection = CategorySelection::parse("WARS, ECONOMY");
        assert!(selection.matches("WARS"));
        assert!(selection.matches("ECONOMY"));
        assert!(!selection.matches("HEALTH"));
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Cold War".parse::<Period>(), Ok(Period::ColdWar));
        assert_eq!("cold-war".parse::<Period>(), Ok(Period::ColdWar));
        assert_eq!("WWII".parse::<Period>(), Ok(Period::Wwii));
        assert!("Bronze Age".parse::<Period>().is_err());
        for period in Period::VARIANTS {
            assert_eq!(period.as_str().parse::<Period>(), Ok(period));
        }
    }
}
