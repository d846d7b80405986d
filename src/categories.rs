//! Event category taxonomy
//!
//! The registry is built once and never mutated. Every category key is unique
//! within the registry and every subcategory key is unique within its category.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{CauseMapError, Result};

/// Color used for categories the registry does not know about
pub const UNKNOWN_COLOR: &str = "#bdbdbd";

/// Subcategory of an event category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub key: String,
    pub name: String,
    pub color: String,
}

/// Event category with its ordered subcategories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    pub fn subcategory(&self, key: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.key == key)
    }
}

/// A subcategory paired with its parent category
#[derive(Debug, Clone, Copy)]
pub struct FlatSubcategory<'a> {
    pub category: &'a Category,
    pub subcategory: &'a Subcategory,
}

/// Immutable registry of event categories
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl CategoryRegistry {
    /// Build a registry, rejecting duplicate category or subcategory keys
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        let mut index = HashMap::with_capacity(categories.len());
        for (i, category) in categories.iter().enumerate() {
            if index.insert(category.key.clone(), i).is_some() {
                return Err(CauseMapError::Registry(format!(
                    "duplicate category key: {}",
                    category.key
                )));
            }

            let mut seen = HashSet::new();
            for sub in &category.subcategories {
                if !seen.insert(sub.key.as_str()) {
                    return Err(CauseMapError::Registry(format!(
                        "duplicate subcategory key {} in category {}",
                        sub.key, category.key
                    )));
                }
            }
        }

        Ok(Self { categories, index })
    }

    /// Categories in registry order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category keys in registry order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.index.get(key).map(|&i| &self.categories[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn subcategory(&self, category: &str, subcategory: &str) -> Option<&Subcategory> {
        self.category(category)?.subcategory(subcategory)
    }

    /// Display color of a category, grey for unknown keys
    pub fn color_for(&self, key: &str) -> &str {
        self.category(key)
            .map(|c| c.color.as_str())
            .unwrap_or(UNKNOWN_COLOR)
    }

    /// All (subcategory, parent) pairs in registry order
    pub fn flatten(&self) -> Vec<FlatSubcategory<'_>> {
        self.categories
            .iter()
            .flat_map(|category| {
                category
                    .subcategories
                    .iter()
                    .map(move |subcategory| FlatSubcategory {
                        category,
                        subcategory,
                    })
            })
            .collect()
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        let categories = default_categories();
        let index = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key.clone(), i))
            .collect();
        Self { categories, index }
    }
}

impl<'de> Deserialize<'de> for CategoryRegistry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let categories = Vec::<Category>::deserialize(deserializer)?;
        CategoryRegistry::new(categories).map_err(serde::de::Error::custom)
    }
}

fn sub(key: &str, name: &str, color: &str) -> Subcategory {
    Subcategory {
        key: key.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    }
}

fn category(
    key: &str,
    name: &str,
    color: &str,
    icon: &str,
    subcategories: Vec<Subcategory>,
) -> Category {
    Category {
        key: key.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        icon: icon.to_string(),
        subcategories,
    }
}

/// The built-in taxonomy of historical event categories
pub fn default_categories() -> Vec<Category> {
    vec![
        category(
            "POLITICS",
            "Politics & Geopolitics",
            "#2563eb",
            "🏛️",
            vec![
                sub("GEOPOLITICAL_CONFLICTS", "Geopolitical conflicts", "#3b82f6"),
                sub("REVOLUTIONS", "Revolutions, coups", "#2563eb"),
                sub("TREATIES", "International treaties", "#1d4ed8"),
                sub(
                    "ASSASSINATIONS",
                    "Political assassinations & scandals",
                    "#60a5fa",
                ),
            ],
        ),
        category(
            "WARS",
            "Wars & Military Events",
            "#dc2626",
            "⚔️",
            vec![
                sub("WAR_START_END", "Start and end of wars", "#ef4444"),
                sub("INVASIONS", "Military invasions", "#dc2626"),
                sub("SANCTIONS", "Sanctions, blockades", "#b91c1c"),
                sub("PEACE_TALKS", "Peace negotiations", "#f87171"),
            ],
        ),
        category(
            "ECONOMY",
            "Economy & Finance",
            "#22c55e",
            "💰",
            vec![
                sub("CRISIS", "Crises, defaults", "#4ade80"),
                sub("INFLATION", "Inflation spikes", "#22c55e"),
                sub("MARKET_CRASH", "Market crashes", "#15803d"),
                sub("ENERGY", "Energy market (oil, gas)", "#bbf7d0"),
            ],
        ),
        category(
            "TECHNOLOGY",
            "Technology & Innovation",
            "#fde047",
            "💡",
            vec![
                sub("INVENTIONS", "Inventions & discoveries", "#facc15"),
                sub("PRODUCT_LAUNCH", "Product launches", "#fde047"),
                sub(
                    "BREAKTHROUGHS",
                    "Breakthroughs in AI, space, quantum tech",
                    "#ca8a04",
                ),
                sub(
                    "FAILURES",
                    "Failures & collapses (e.g. startup failures)",
                    "#fef9c3",
                ),
            ],
        ),
        category(
            "SOCIETY",
            "Society & Culture",
            "#f59e42",
            "👥",
            vec![
                sub("PROTESTS", "Mass protests", "#fbbf24"),
                sub("MIGRATION", "Migration waves", "#f59e42"),
                sub("CULTURAL_SHIFTS", "Cultural shifts", "#b45309"),
                sub(
                    "NEW_MOVEMENTS",
                    "New movements (feminism, environmentalism, etc.)",
                    "#fef3c7",
                ),
            ],
        ),
        category(
            "ECOLOGY",
            "Ecology & Disasters",
            "#a16207",
            "🌍",
            vec![
                sub(
                    "CLIMATE",
                    "Climate events (drought, flood, etc.)",
                    "#fbbf24",
                ),
                sub(
                    "TECH_DISASTERS",
                    "Accidents & man-made disasters",
                    "#a16207",
                ),
                sub(
                    "ECO_INITIATIVES",
                    "Global ecological initiatives",
                    "#fde68a",
                ),
            ],
        ),
        category(
            "HEALTH",
            "Health & Pandemics",
            "#a21caf",
            "🏥",
            vec![
                sub("DISEASES", "Emergence of diseases", "#e879f9"),
                sub(
                    "PANDEMICS",
                    "Pandemics (SARS, COVID-19, etc.)",
                    "#a21caf",
                ),
                sub("MED_DISCOVERIES", "Medical discoveries", "#701a75"),
                sub("HEALTHCARE_ISSUES", "Healthcare issues", "#f3e8ff"),
            ],
        ),
        category(
            "IDEOLOGY",
            "Ideologies & Philosophy",
            "#f3f4f6",
            "📚",
            vec![
                sub("NEW_CONCEPTS", "Emergence of new concepts", "#d1d5db"),
                sub(
                    "THEORIES",
                    "Spread of theories (neoliberalism, Marxism, etc.)",
                    "#f3f4f6",
                ),
                sub(
                    "INFLUENTIAL_BOOKS",
                    "Books/speeches that influenced mass thinking",
                    "#a3a3a3",
                ),
            ],
        ),
        category(
            "PROPAGANDA",
            "Manipulation & Propaganda",
            "#18181b",
            "📢",
            vec![
                sub("INFO_CAMPAIGNS", "Information campaigns", "#52525b"),
                sub("ELECTION_FRAUD", "Election fraud", "#18181b"),
                sub("CENSORSHIP", "Censorship, blockades", "#a1a1aa"),
                sub(
                    "MEDIA_EVENTS",
                    "Mass media events (scandals, leaks)",
                    "#d4d4d8",
                ),
            ],
        ),
    ]
}
