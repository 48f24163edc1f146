//! # Records
//!
//! The resolved creature entity plus the wire shapes it is parsed from.
//!
//! Wire fields that the record needs are non-optional in the wire structs,
//! so a missing or mistyped field fails deserialization and surfaces as a
//! parse error for that record only.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::error::RecordError;

/// Opaque reference to one record's detail resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One summary entry of the index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    #[serde(rename = "url")]
    pub locator: Locator,
}

impl IndexEntry {
    pub fn new(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator: Locator::new(locator),
        }
    }
}

/// One base stat of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub stat_name: String,
    pub base_value: i64,
}

/// A fully resolved creature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u32,
    pub name: String,
    pub sprite_url: String,
    /// Decimetres
    pub height_units: i64,
    /// Hectograms
    pub weight_units: i64,
    pub stats: Vec<Stat>,
    pub abilities: Vec<String>,
    /// Source order is kept for display
    pub types: Vec<String>,
}

impl Record {
    /// Parse a detail response body
    pub fn from_json(locator: &Locator, body: &[u8]) -> Result<Self, RecordError> {
        let wire: RecordWire = serde_json::from_slice(body)
            .map_err(|e| RecordError::parse(locator, e.to_string()))?;
        wire.into_record(locator)
    }

    /// Whether `tag` is one of this record's types (exact match)
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }

    /// Name with the first letter upper-cased and the rest lower-cased
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    pub fn height_meters(&self) -> f64 {
        self.height_units as f64 / 10.0
    }

    pub fn weight_kilograms(&self) -> f64 {
        self.weight_units as f64 / 10.0
    }

    /// `"hp: 45, attack: 49"`
    pub fn stats_summary(&self) -> String {
        self.stats
            .iter()
            .map(|s| format!("{}: {}", s.stat_name, s.base_value))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn abilities_summary(&self) -> String {
        self.abilities.join(", ")
    }
}

// === Wire shapes (detail endpoint) ===

#[derive(Debug, Deserialize)]
struct RecordWire {
    id: u32,
    name: String,
    sprites: SpritesWire,
    height: i64,
    weight: i64,
    stats: Vec<StatWire>,
    abilities: Vec<AbilityWire>,
    types: Vec<TypeWire>,
}

#[derive(Debug, Deserialize)]
struct SpritesWire {
    front_default: String,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct StatWire {
    base_stat: i64,
    stat: NamedRef,
}

#[derive(Debug, Deserialize)]
struct AbilityWire {
    ability: NamedRef,
}

#[derive(Debug, Deserialize)]
struct TypeWire {
    #[serde(rename = "type")]
    kind: NamedRef,
}

impl RecordWire {
    fn into_record(self, locator: &Locator) -> Result<Record, RecordError> {
        if self.id == 0 {
            return Err(RecordError::parse(locator, "id must be positive"));
        }
        if self.name.trim().is_empty() {
            return Err(RecordError::parse(locator, "name is empty"));
        }
        if self.types.is_empty() {
            return Err(RecordError::parse(locator, "types is empty"));
        }

        let mut seen = HashSet::new();
        for stat in &self.stats {
            if !seen.insert(stat.stat.name.as_str()) {
                return Err(RecordError::parse(
                    locator,
                    format!("duplicate stat `{}`", stat.stat.name),
                ));
            }
        }

        Ok(Record {
            id: self.id,
            name: self.name,
            sprite_url: self.sprites.front_default,
            height_units: self.height,
            weight_units: self.weight,
            stats: self
                .stats
                .into_iter()
                .map(|s| Stat {
                    stat_name: s.stat.name,
                    base_value: s.base_stat,
                })
                .collect(),
            abilities: self.abilities.into_iter().map(|a| a.ability.name).collect(),
            types: self.types.into_iter().map(|t| t.kind.name).collect(),
        })
    }
}
