//! # Type Filter
//!
//! Narrows a catalog to the records carrying one type tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::catalog::{Catalog, Record};

/// A known type tag and its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeTagInfo {
    pub tag: &'static str,
    pub label: &'static str,
}

/// The tags offered by the type picker, in picker order
pub const KNOWN_TYPES: &[TypeTagInfo] = &[
    TypeTagInfo { tag: "normal", label: "Normal" },
    TypeTagInfo { tag: "fire", label: "Fire" },
    TypeTagInfo { tag: "water", label: "Water" },
    TypeTagInfo { tag: "grass", label: "Grass" },
    TypeTagInfo { tag: "electric", label: "Electric" },
    TypeTagInfo { tag: "ice", label: "Ice" },
    TypeTagInfo { tag: "fighting", label: "Fighting" },
    TypeTagInfo { tag: "poison", label: "Poison" },
    TypeTagInfo { tag: "ground", label: "Ground" },
    TypeTagInfo { tag: "flying", label: "Flying" },
    TypeTagInfo { tag: "psychic", label: "Psychic" },
    TypeTagInfo { tag: "bug", label: "Bug" },
    TypeTagInfo { tag: "rock", label: "Rock" },
    TypeTagInfo { tag: "ghost", label: "Ghost" },
    TypeTagInfo { tag: "dragon", label: "Dragon" },
    TypeTagInfo { tag: "dark", label: "Dark" },
    TypeTagInfo { tag: "steel", label: "Steel" },
    TypeTagInfo { tag: "fairy", label: "Fairy" },
];

/// Wire value of the "all" selector
pub const ALL_SENTINEL: &str = "";

/// Active type selector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeFilter {
    /// No narrowing
    #[default]
    All,
    /// Records whose types contain this tag exactly
    Tag(String),
}

impl TypeFilter {
    /// `""` and `"all"` select everything; anything else is a tag.
    /// Surrounding whitespace is ignored, case is not.
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "" | "all" => Self::All,
            tag => Self::Tag(tag.to_string()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => record.has_type(tag),
        }
    }

    /// Picker label, or the raw tag for tags outside `KNOWN_TYPES`
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Tag(tag) => KNOWN_TYPES
                .iter()
                .find(|k| k.tag == tag.as_str())
                .map(|k| k.label)
                .unwrap_or(tag.as_str()),
        }
    }
}

impl From<String> for TypeFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TypeFilter> for String {
    fn from(value: TypeFilter) -> Self {
        match value {
            TypeFilter::All => ALL_SENTINEL.to_string(),
            TypeFilter::Tag(tag) => tag,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

/// Displayed subset of a catalog for `selector`
pub fn filter(catalog: &Catalog, selector: &TypeFilter) -> Vec<Arc<Record>> {
    filter_records(catalog.records(), selector)
}

/// Same as [`filter`], over any ordered slice of records
pub fn filter_records(records: &[Arc<Record>], selector: &TypeFilter) -> Vec<Arc<Record>> {
    records
        .iter()
        .filter(|r| selector.matches(r))
        .cloned()
        .collect()
}

/// Distinct tags present in the catalog, in first-seen order
pub fn available_types(catalog: &Catalog) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for record in catalog.iter() {
        for tag in &record.types {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::record;

    fn unova() -> Catalog {
        Catalog::from_records(vec![
            record(495, "snivy", &["grass"]),
            record(498, "tepig", &["fire"]),
            record(501, "oshawott", &["water"]),
            record(535, "tympole", &["water"]),
            record(536, "palpitoad", &["water", "ground"]),
            record(554, "darumaka", &["fire"]),
        ])
    }

    fn ids(records: &[Arc<Record>]) -> Vec<u32> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_all_returns_catalog_unchanged() {
        let catalog = unova();
        let all = filter(&catalog, &TypeFilter::All);
        assert_eq!(all, catalog.records().to_vec());
        assert_eq!(filter(&catalog, &TypeFilter::parse("")), all);
    }

    #[test]
    fn test_tag_keeps_matching_records_in_order() {
        let catalog = unova();
        let water = filter(&catalog, &TypeFilter::parse("water"));

        assert_eq!(ids(&water), vec![501, 535, 536]);
        assert!(water.iter().all(|r| r.has_type("water")));
    }

    #[test]
    fn test_secondary_type_matches() {
        let ground = filter(&unova(), &TypeFilter::parse("ground"));
        assert_eq!(ids(&ground), vec![536]);
    }

    #[test]
    fn test_unknown_tag_is_empty() {
        let catalog = unova();
        assert!(filter(&catalog, &TypeFilter::parse("dragon")).is_empty());
        assert!(filter(&catalog, &TypeFilter::parse("no-such-type")).is_empty());
        assert!(filter(&catalog, &TypeFilter::parse("Water")).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = unova();
        for tag in ["", "fire", "water", "ice"] {
            let selector = TypeFilter::parse(tag);
            let once = filter(&catalog, &selector);
            let twice = filter_records(&once, &selector);
            assert_eq!(once, twice, "tag {:?}", tag);
        }
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_records(Vec::new());
        assert!(filter(&catalog, &TypeFilter::All).is_empty());
        assert!(filter(&catalog, &TypeFilter::parse("fire")).is_empty());
    }

    #[test]
    fn test_parse_and_labels() {
        assert_eq!(TypeFilter::parse("  all "), TypeFilter::All);
        assert_eq!(TypeFilter::parse(" fire "), TypeFilter::Tag("fire".to_string()));
        assert_eq!(TypeFilter::parse("fire").label(), "Fire");
        assert_eq!(TypeFilter::parse("shadow").label(), "shadow");
        assert_eq!(TypeFilter::All.label(), "All");
        assert_eq!(KNOWN_TYPES.len(), 18);
    }

    #[test]
    fn test_filter_serialization() {
        assert_eq!(serde_json::to_string(&TypeFilter::All).unwrap(), "\"\"");
        let tag: TypeFilter = serde_json::from_str("\"water\"").unwrap();
        assert_eq!(tag, TypeFilter::Tag("water".to_string()));
    }

    #[test]
    fn test_available_types_first_seen_order() {
        assert_eq!(
            available_types(&unova()),
            vec!["grass", "fire", "water", "ground"]
        );
    }
}
