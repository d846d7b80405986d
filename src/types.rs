//! Core types for CauseMap

use serde::{Deserialize, Serialize};

/// Unique identifier for an event
pub type EventId = u64;

/// Unique identifier for a connection
pub type ConnectionId = u64;

/// A historical event record, either generated or loaded from an event file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: EventId,
    /// Display name, e.g. "Market crashes (1929)"
    pub name: String,
    /// Date string; the year is its leading digits ("1939", "1939-09-01")
    pub date: String,
    /// Key of the category this event belongs to
    pub category: String,
    /// Key of the subcategory within `category`, absent for loaded events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Display color, inherited from the subcategory
    pub color: String,
    /// Importance score (0 - 100)
    pub importance: f32,
    /// Free text description
    #[serde(default)]
    pub description: String,
    /// Events that caused this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<EventId>,
    /// Events caused by this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EventId>,
    /// Source URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// Layout seed coordinates, cosmetic only
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Event {
    /// Year of the event, parsed from the leading digits of `date`
    pub fn year(&self) -> Option<i32> {
        parse_year(&self.date)
    }
}

/// Digits read from the start of a date string
const YEAR_DIGITS: usize = 4;

/// Parse the year from the leading digits of a date string, at most four
/// ("1939-09-01" -> 1939, "19390901" -> 1939)
pub fn parse_year(date: &str) -> Option<i32> {
    let trimmed = date.trim_start();
    let end = trimmed
        .char_indices()
        .take(YEAR_DIGITS)
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    trimmed[..end].parse().ok()
}

/// How a connection was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Both endpoints share a category
    Category,
    /// Endpoints are close in time (or joined by chance)
    Temporal,
    /// Explicit cause recorded in an event file
    Causal,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Category => "category",
            ConnectionType::Temporal => "temporal",
            ConnectionType::Causal => "causal",
        }
    }
}

impl std::str::FromStr for ConnectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" => Ok(ConnectionType::Category),
            "temporal" => Ok(ConnectionType::Temporal),
            "causal" => Ok(ConnectionType::Causal),
            _ => Err(format!("Unknown connection type: {}", s)),
        }
    }
}

/// An edge between two events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: EventId,
    pub target: EventId,
    pub strength: f32,
    #[serde(rename = "type")]
    pub kind: ConnectionType,
}

impl Connection {
    /// True if either endpoint is `id`
    pub fn touches(&self, id: EventId) -> bool {
        self.source == id || self.target == id
    }

    /// The endpoint opposite to `id`, if this connection touches it
    pub fn other(&self, id: EventId) -> Option<EventId> {
        if self.source == id {
            Some(self.target)
        } else if self.target == id {
            Some(self.source)
        } else {
            None
        }
    }

    /// Order-independent key of the endpoint pair
    pub fn pair_key(&self) -> (EventId, EventId) {
        pair_key(self.source, self.target)
    }
}

/// Order-independent key for an unordered pair of event ids
pub fn pair_key(a: EventId, b: EventId) -> (EventId, EventId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Node/link snapshot consumed by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<Event>,
    pub links: Vec<Connection>,
}

impl GraphData {
    pub fn new(nodes: Vec<Event>, links: Vec<Connection>) -> Self {
        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find an event by id
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.nodes.iter().find(|e| e.id == id)
    }
}
