//! Synthetic event generation

use rand::Rng;

use crate::categories::CategoryRegistry;
use crate::error::{CauseMapError, Result};
use crate::types::{Event, EventId};

/// First year an event can fall in
pub const MIN_YEAR: i32 = 1900;
/// Exclusive upper bound of generated years
pub const MAX_YEAR_EXCLUSIVE: i32 = 2025;
/// Importance is drawn from [MIN_IMPORTANCE, MAX_IMPORTANCE_EXCLUSIVE)
pub const MIN_IMPORTANCE: u32 = 60;
pub const MAX_IMPORTANCE_EXCLUSIVE: u32 = 100;
/// Layout seed coordinates are drawn from [0, COORDINATE_RANGE) on each axis
pub const COORDINATE_RANGE: f32 = 1000.0;

/// Produces synthetic events from a category registry
pub struct EventGenerator<'a> {
    registry: &'a CategoryRegistry,
}

impl<'a> EventGenerator<'a> {
    pub fn new(registry: &'a CategoryRegistry) -> Self {
        Self { registry }
    }

    /// Generate `count` events with ids 1..=count
    ///
    /// Each event draws a subcategory uniformly from the flattened registry,
    /// a year in [1900, 2025) and an importance in [60, 100).
    pub fn generate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<Event>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let pool = self.registry.flatten();
        if pool.is_empty() {
            return Err(CauseMapError::Registry(
                "registry has no subcategories to draw events from".to_string(),
            ));
        }

        let mut events = Vec::with_capacity(count);
        for i in 0..count {
            let entry = pool[rng.gen_range(0..pool.len())];
            let year = rng.gen_range(MIN_YEAR..MAX_YEAR_EXCLUSIVE);
            let importance = rng.gen_range(MIN_IMPORTANCE..MAX_IMPORTANCE_EXCLUSIVE);
            let sub = entry.subcategory;
            let cat = entry.category;

            events.push(Event {
                id: (i + 1) as EventId,
                name: format!("{} ({})", sub.name, year),
                date: year.to_string(),
                category: cat.key.clone(),
                subcategory: Some(sub.key.clone()),
                color: sub.color.clone(),
                importance: importance as f32,
                description: format!(
                    "Event of category '{}' ({}) in {}",
                    sub.name, cat.name, year
                ),
                causes: Vec::new(),
                effects: Vec::new(),
                sources: Vec::new(),
                x: rng.gen_range(0.0..COORDINATE_RANGE),
                y: rng.gen_range(0.0..COORDINATE_RANGE),
                z: rng.gen_range(0.0..COORDINATE_RANGE),
            });
        }

        tracing::debug!("Generated {} events", events.len());
        Ok(events)
    }
}
