//! Event file loader
//!
//! Reads a JSON array of curated event records and turns it into a graph
//! snapshot. Links are derived from each record's `causes` list and always
//! point from the cause to the caused event.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::categories::CategoryRegistry;
use crate::error::{CauseMapError, Result};
use crate::types::{pair_key, Connection, ConnectionType, Event, EventId, GraphData};

/// Importance assigned to records that omit it or give zero
pub const DEFAULT_RECORD_IMPORTANCE: f32 = 3.0;

/// Strength of a link taken from a record's `causes`
pub const CAUSAL_STRENGTH: f32 = 1.0;

/// Record id as written in the file: a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// One record of an event file
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "group")]
    pub category: String,
    #[serde(default)]
    pub importance: Option<f32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub causes: Vec<RecordId>,
    #[serde(default)]
    pub effects: Vec<RecordId>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Numeric ids stay as they are; string ids are numbered after the largest
/// numeric id, in file order.
fn assign_ids(records: &[EventRecord]) -> Result<HashMap<RecordId, EventId>> {
    let mut ids = HashMap::with_capacity(records.len());
    let mut next = records
        .iter()
        .filter_map(|r| match r.id {
            RecordId::Num(n) => Some(n),
            RecordId::Text(_) => None,
        })
        .max()
        .unwrap_or(0)
        + 1;

    for record in records {
        let id = match record.id {
            RecordId::Num(n) => n,
            RecordId::Text(_) => {
                let id = next;
                next += 1;
                id
            }
        };
        if ids.insert(record.id.clone(), id).is_some() {
            return Err(CauseMapError::InvalidInput(format!(
                "Duplicate event id: {}",
                record.id
            )));
        }
    }
    Ok(ids)
}

/// Build a graph from event records
pub fn from_records(records: Vec<EventRecord>, registry: &CategoryRegistry) -> Result<GraphData> {
    let ids = assign_ids(&records)?;
    let resolve = |refs: &[RecordId]| -> Vec<EventId> {
        refs.iter().filter_map(|r| ids.get(r).copied()).collect()
    };

    let mut nodes = Vec::with_capacity(records.len());
    let mut links = Vec::new();
    let mut linked: HashSet<(EventId, EventId)> = HashSet::new();

    for record in records {
        let id = ids[&record.id];
        let causes = resolve(&record.causes);

        for &cause in &causes {
            if cause == id || !linked.insert(pair_key(cause, id)) {
                continue;
            }
            links.push(Connection {
                id: links.len() as u64 + 1,
                source: cause,
                target: id,
                strength: CAUSAL_STRENGTH,
                kind: ConnectionType::Causal,
            });
        }

        let color = record
            .color
            .unwrap_or_else(|| registry.color_for(&record.category).to_string());
        nodes.push(Event {
            id,
            name: record.name.unwrap_or_else(|| record.id.to_string()),
            date: record.date,
            category: record.category,
            subcategory: None,
            color,
            importance: record
                .importance
                .filter(|&i| i != 0.0)
                .unwrap_or(DEFAULT_RECORD_IMPORTANCE),
            description: record.description,
            causes,
            effects: resolve(&record.effects),
            sources: record.sources,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        });
    }

    Ok(GraphData::new(nodes, links))
}

/// Parse an event file's contents
pub fn parse_events(json: &str, registry: &CategoryRegistry) -> Result<GraphData> {
    let records: Vec<EventRecord> = serde_json::from_str(json)?;
    from_records(records, registry)
}

/// Load an event file from disk
pub fn load_events(path: &Path, registry: &CategoryRegistry) -> Result<GraphData> {
    let json = std::fs::read_to_string(path)?;
    let graph = parse_events(&json, registry)?;
    tracing::info!(
        "Loaded {} events and {} links from {}",
        graph.nodes.len(),
        graph.links.len(),
        path.display()
    );
    Ok(graph)
}

/// Load an event file, falling back to the built-in summary on any failure
pub fn load_or_fallback(path: &Path, registry: &CategoryRegistry) -> GraphData {
    match load_events(path, registry) {
        Ok(graph) => graph,
        Err(e) => {
            tracing::warn!(
                "Failed to load events from {}: {}; using built-in dataset",
                path.display(),
                e
            );
            fallback_dataset(registry)
        }
    }
}

const FALLBACK_EVENTS: &str = r#"[
  {"id": 1, "name": "Assassination of Archduke Franz Ferdinand", "date": "1914-06-28", "group": "POLITICS", "importance": 90,
   "description": "Heir to the Austro-Hungarian throne shot in Sarajevo"},
  {"id": 2, "name": "World War I", "date": "1914-07-28", "group": "WARS", "importance": 98,
   "description": "Global war centred in Europe", "causes": [1]},
  {"id": 3, "name": "Treaty of Versailles", "date": "1919-06-28", "group": "POLITICS", "importance": 85,
   "description": "Peace treaty ending the state of war with Germany", "causes": [2]},
  {"id": 4, "name": "Wall Street Crash", "date": "1929-10-24", "group": "ECONOMY", "importance": 92,
   "description": "Stock market collapse in New York"},
  {"id": 5, "name": "Great Depression", "date": "1930", "group": "ECONOMY", "importance": 90,
   "description": "Worldwide economic depression", "causes": [4]},
  {"id": 6, "name": "World War II", "date": "1939-09-01", "group": "WARS", "importance": 100,
   "description": "Global war between the Allies and the Axis powers", "causes": [3, 5]},
  {"id": 7, "name": "United Nations founded", "date": "1945-10-24", "group": "POLITICS", "importance": 88,
   "description": "Intergovernmental organisation for international cooperation", "causes": [6]},
  {"id": 8, "name": "Cold War", "date": "1947-03-12", "group": "POLITICS", "importance": 95,
   "description": "Geopolitical rivalry between the United States and the Soviet Union", "causes": [6]},
  {"id": 9, "name": "Sputnik 1", "date": "1957-10-04", "group": "TECHNOLOGY", "importance": 86,
   "description": "First artificial Earth satellite", "causes": [8]},
  {"id": 10, "name": "Fall of the Berlin Wall", "date": "1989-11-09", "group": "POLITICS", "importance": 93,
   "description": "Opening of the border between East and West Berlin", "causes": [8]}
]"#;

/// Small built-in dataset of landmark twentieth century events
pub fn fallback_dataset(registry: &CategoryRegistry) -> GraphData {
    parse_events(FALLBACK_EVENTS, registry).unwrap_or_default()
}
