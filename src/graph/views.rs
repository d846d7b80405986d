//! Timeline and geographic projections of events

use serde::{Deserialize, Serialize};

use crate::types::Event;

/// Events ordered by year, oldest first
///
/// The sort is stable, so events of the same year keep snapshot order.
/// Events without a parseable year go last.
pub fn timeline(events: &[Event]) -> Vec<&Event> {
    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by_key(|e| match e.year() {
        Some(year) => (0, year),
        None => (1, 0),
    });
    ordered
}

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// An event placed on the world map
#[derive(Debug, Clone, Serialize)]
pub struct GeoEvent<'a> {
    #[serde(flatten)]
    pub event: &'a Event,
    pub coordinates: GeoPoint,
}

/// 32-bit rolling string hash (h * 31 + unit over UTF-16 code units)
pub fn name_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32)
    })
}

/// Deterministic placeholder coordinates derived from the event name
///
/// Latitude lies in [-90, 90) and longitude in [-180, 180).
pub fn geo_point(event: &Event) -> GeoPoint {
    let hash = name_hash(&event.name);
    let lat = hash.rem_euclid(180) - 90;
    let lng = ((hash as i64).abs() % 360) - 180;
    GeoPoint {
        lat: lat as f64,
        lng: lng as f64,
    }
}

/// Place every event on the map
pub fn geo_events(events: &[Event]) -> Vec<GeoEvent<'_>> {
    events
        .iter()
        .map(|event| GeoEvent {
            event,
            coordinates: geo_point(event),
        })
        .collect()
}
