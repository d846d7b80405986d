//! Tag cloud extraction from event text
//!
//! Event names and descriptions are split on whitespace, normalized to
//! lowercase word characters (Latin and Cyrillic), and accumulated into a
//! term index weighted by event importance. Only terms seen more than once
//! are kept, ranked by cumulative importance.
//!
//! Ranking is deterministic: ties on cumulative importance are broken by the
//! term in ascending order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Event;

/// Everything that is not a word character or a lowercase Cyrillic letter
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9A-Za-z_а-яё]").unwrap());

/// Configuration for tag aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Terms must be strictly longer than this (in characters)
    pub min_length: usize,
    /// Terms must be strictly shorter than this (in characters)
    pub max_length: usize,
    /// Terms must occur strictly more often than this
    pub min_count: usize,
    /// Maximum number of tags returned
    pub limit: usize,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 20,
            min_count: 1,
            limit: 100,
        }
    }
}

/// A ranked term with the events it came from
#[derive(Debug, Clone, Serialize)]
pub struct Tag<'a> {
    pub term: String,
    /// Occurrences across all names and descriptions
    pub count: usize,
    /// Sum of the importance of every occurrence
    pub importance: f64,
    /// Category of the last contributing event
    pub category: String,
    /// Contributing events, one entry per occurrence
    #[serde(serialize_with = "serialize_event_ids")]
    pub events: Vec<&'a Event>,
}

impl Tag<'_> {
    pub fn average_importance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.importance / self.count as f64
        }
    }
}

fn serialize_event_ids<S>(events: &[&Event], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(events.iter().map(|e| e.id))
}

/// Normalize a raw token: lowercase, keep only word characters
pub fn normalize_token(token: &str) -> String {
    NON_WORD.replace_all(&token.to_lowercase(), "").into_owned()
}

/// Builds ranked tag lists from events
#[derive(Debug, Clone, Default)]
pub struct TagAggregator {
    config: TagConfig,
}

impl TagAggregator {
    pub fn new(config: TagConfig) -> Self {
        Self { config }
    }

    /// Normalized tokens of an event's name followed by its description
    pub fn tokens(&self, event: &Event) -> Vec<String> {
        event
            .name
            .split_whitespace()
            .chain(event.description.split_whitespace())
            .map(normalize_token)
            .filter(|t| {
                let len = t.chars().count();
                len > self.config.min_length && len < self.config.max_length
            })
            .collect()
    }

    /// Rank terms across `events` by cumulative importance
    pub fn aggregate<'a, I>(&self, events: I) -> Vec<Tag<'a>>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut index: HashMap<String, Tag<'a>> = HashMap::new();

        for event in events {
            for token in self.tokens(event) {
                let tag = index.entry(token).or_insert_with_key(|term| Tag {
                    term: term.clone(),
                    count: 0,
                    importance: 0.0,
                    category: String::new(),
                    events: Vec::new(),
                });
                tag.count += 1;
                tag.importance += event.importance as f64;
                tag.category.clone_from(&event.category);
                tag.events.push(event);
            }
        }

        let mut tags: Vec<Tag<'a>> = index
            .into_values()
            .filter(|t| t.count > self.config.min_count)
            .collect();
        tags.sort_by(|a, b| {
            b.importance
                .total_cmp(&a.importance)
                .then_with(|| a.term.cmp(&b.term))
        });
        tags.truncate(self.config.limit);

        tracing::debug!("Aggregated {} tags", tags.len());
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryRegistry;
    use crate::generator::EventGenerator;
    use crate::graph::tests::make_event;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn described(id: u64, category: &str, importance: f32, text: &str) -> Event {
        let mut event = make_event(id, 1950, category, importance);
        event.name = String::new();
        event.description = text.to_string();
        event
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("Crashes,"), "crashes");
        assert_eq!(normalize_token("(1929)"), "1929");
        assert_eq!(normalize_token("Кризис!"), "кризис");
        assert_eq!(normalize_token("Ёлка"), "ёлка");
        assert_eq!(normalize_token("snake_case"), "snake_case");
        assert_eq!(normalize_token("café"), "caf");
    }

    #[test]
    fn test_length_bounds_are_exclusive() {
        let aggregator = TagAggregator::default();
        let event = described(
            1,
            "A",
            50.0,
            "war wars abcdefghijklmnopqrs abcdefghijklmnopqrst",
        );
        let tokens = aggregator.tokens(&event);
        // 3 chars dropped, 4 kept, 19 kept, 20 dropped
        assert_eq!(tokens, vec!["wars", "abcdefghijklmnopqrs"]);
    }

    #[test]
    fn test_single_occurrence_dropped() {
        let events = vec![
            described(1, "A", 90.0, "inflation crisis"),
            described(2, "B", 60.0, "inflation"),
        ];
        let tags = TagAggregator::default().aggregate(&events);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].term, "inflation");
        assert_eq!(tags[0].count, 2);
        assert_eq!(tags[0].importance, 150.0);
        assert_eq!(tags[0].average_importance(), 75.0);
        assert!(tags.iter().all(|t| t.term != "crisis"));
    }

    #[test]
    fn test_ranked_by_cumulative_importance() {
        let events = vec![
            described(1, "A", 60.0, "blockade blockade"),
            described(2, "B", 95.0, "summit"),
            described(3, "C", 90.0, "summit"),
            described(4, "D", 70.0, "treaty treaty treaty"),
        ];
        let tags = TagAggregator::default().aggregate(&events);
        let terms: Vec<&str> = tags.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["treaty", "summit", "blockade"]);
        assert_eq!(tags[1].importance, 185.0);
    }

    #[test]
    fn test_category_is_last_contributor() {
        let events = vec![
            described(1, "WARS", 60.0, "sanctions"),
            described(2, "ECONOMY", 60.0, "sanctions"),
        ];
        let tags = TagAggregator::default().aggregate(&events);
        assert_eq!(tags[0].category, "ECONOMY");
        let ids: Vec<u64> = tags[0].events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_ties_broken_by_term() {
        let events = vec![
            described(1, "A", 50.0, "zeta alpha"),
            described(2, "A", 50.0, "zeta alpha"),
        ];
        let tags = TagAggregator::default().aggregate(&events);
        assert_eq!(tags[0].term, "alpha");
        assert_eq!(tags[1].term, "zeta");
    }

    #[test]
    fn test_limit_respected() {
        let text: String = (0..150)
            .map(|i| format!("term{:03}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let events = vec![
            described(1, "A", 60.0, &text),
            described(2, "A", 60.0, &text),
        ];
        let tags = TagAggregator::default().aggregate(&events);
        assert_eq!(tags.len(), 100);
    }

    #[test]
    fn test_deterministic_on_generated_events() {
        let registry = CategoryRegistry::default();
        let mut rng = StdRng::seed_from_u64(12);
        let events = EventGenerator::new(&registry)
            .generate(300, &mut rng)
            .unwrap();
        let aggregator = TagAggregator::default();
        let first: Vec<(String, usize)> = aggregator
            .aggregate(&events)
            .into_iter()
            .map(|t| (t.term, t.count))
            .collect();
        let second: Vec<(String, usize)> = aggregator
            .aggregate(&events)
            .into_iter()
            .map(|t| (t.term, t.count))
            .collect();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        let events: Vec<Event> = Vec::new();
        let tags = TagAggregator::default().aggregate(&events);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_serializes_event_ids() {
        let events = vec![
            described(7, "A", 60.0, "famine"),
            described(8, "A", 60.0, "famine"),
        ];
        let tags = TagAggregator::default().aggregate(&events);
        let json = serde_json::to_value(&tags[0]).unwrap();
        assert_eq!(json["events"], serde_json::json!([7, 8]));
    }
}
