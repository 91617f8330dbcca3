//! Pack file format (`.bpc`, JSON)
//!
//! Current layout:
//! ```text
//! {"max_weight": 12, "max_volume": 40.0,
//!  "items": {"Термос": {"вес": 1000, "объем": 1.0}}}
//! ```
//! Older files hold only the bare items mapping; they load with the
//! caller's fallback budget.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::{normalize_name, validate_volume};
use crate::domain::{Budget, DomainError, Item};

/// File extension for pack files (without the dot).
pub const PACK_FILE_EXTENSION: &str = "bpc";

/// Suggested name for a fresh pack file.
pub const DEFAULT_FILE_NAME: &str = "Backpack_calculation.bpc";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected layout: {0}")]
    Layout(String),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

/// Which layout a document was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Budget plus items
    Current,
    /// Bare items mapping
    Legacy,
}

/// In-memory form of a pack file.
#[derive(Debug, Clone, PartialEq)]
pub struct PackDocument {
    pub budget: Budget,
    pub items: BTreeMap<String, Item>,
    pub format: DocumentFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredItem {
    #[serde(rename = "вес")]
    weight: u32,
    #[serde(rename = "объем")]
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct StoredDocument {
    max_weight: u32,
    max_volume: f64,
    #[serde(default)]
    items: BTreeMap<String, StoredItem>,
}

#[derive(Serialize)]
struct StoredDocumentRef<'a> {
    max_weight: u32,
    max_volume: f64,
    items: BTreeMap<&'a str, StoredItem>,
}

impl PackDocument {
    pub fn new(budget: Budget, items: BTreeMap<String, Item>) -> Self {
        Self {
            budget,
            items,
            format: DocumentFormat::Current,
        }
    }

    /// Parse a pack file. `fallback` is the budget used for legacy files.
    pub fn parse(content: &str, fallback: Budget) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let object = value
            .as_object()
            .ok_or_else(|| DocumentError::Layout("top level must be a JSON object".into()))?;

        if object.contains_key("max_weight") && object.contains_key("max_volume") {
            let stored: StoredDocument = serde_json::from_value(value)?;
            let budget = Budget::new(stored.max_weight, stored.max_volume)?;
            Ok(Self {
                budget,
                items: convert_items(stored.items)?,
                format: DocumentFormat::Current,
            })
        } else {
            let stored: BTreeMap<String, StoredItem> = serde_json::from_value(value)?;
            Ok(Self {
                budget: fallback,
                items: convert_items(stored)?,
                format: DocumentFormat::Legacy,
            })
        }
    }

    /// Serialize in the current layout, 4-space indented, non-ASCII kept verbatim.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        let stored = StoredDocumentRef {
            max_weight: self.budget.max_weight_kg,
            max_volume: self.budget.max_volume,
            items: self
                .items
                .iter()
                .map(|(name, item)| {
                    (
                        name.as_str(),
                        StoredItem {
                            weight: item.weight,
                            volume: item.volume,
                        },
                    )
                })
                .collect(),
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        stored.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| DocumentError::Layout(e.to_string()))
    }
}

fn convert_items(
    stored: BTreeMap<String, StoredItem>,
) -> Result<BTreeMap<String, Item>, DocumentError> {
    let mut items = BTreeMap::new();
    for (raw_name, stored_item) in stored {
        let name = normalize_name(&raw_name)?;
        validate_volume(&name, stored_item.volume)?;
        if items
            .insert(name.clone(), Item::new(stored_item.weight, stored_item.volume))
            .is_some()
        {
            return Err(DomainError::DuplicateName(name).into());
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_current_layout_when_parsing_then_reads_budget_and_items() {
        let json = r#"{"max_weight": 15, "max_volume": 50,
            "items": {"Термос": {"вес": 1000, "объем": 1.0}}}"#;
        let doc = PackDocument::parse(json, Budget::default()).unwrap();
        assert_eq!(doc.format, DocumentFormat::Current);
        assert_eq!(doc.budget, Budget::new(15, 50.0).unwrap());
        assert_eq!(doc.items.get("Термос"), Some(&Item::new(1000, 1.0)));
    }

    #[test]
    fn given_legacy_layout_when_parsing_then_uses_fallback_budget() {
        let json = r#"{"Компас": {"вес": 100, "объем": 0.1}}"#;
        let fallback = Budget::new(20, 60.0).unwrap();
        let doc = PackDocument::parse(json, fallback).unwrap();
        assert_eq!(doc.format, DocumentFormat::Legacy);
        assert_eq!(doc.budget, fallback);
        assert_eq!(doc.items.len(), 1);
    }

    #[test]
    fn given_only_one_budget_key_when_parsing_then_treated_as_legacy_and_fails() {
        // an items mapping cannot contain a bare number
        let json = r#"{"max_weight": 12, "Компас": {"вес": 100, "объем": 0.1}}"#;
        assert!(matches!(
            PackDocument::parse(json, Budget::default()),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn given_array_when_parsing_then_rejects_layout() {
        assert!(matches!(
            PackDocument::parse("[]", Budget::default()),
            Err(DocumentError::Layout(_))
        ));
    }

    #[test]
    fn given_names_colliding_after_trim_when_parsing_then_rejects() {
        let json = r#"{"a": {"вес": 1, "объем": 0}, " a ": {"вес": 2, "объем": 0}}"#;
        assert!(matches!(
            PackDocument::parse(json, Budget::default()),
            Err(DocumentError::Domain(DomainError::DuplicateName(_)))
        ));
    }

    #[test]
    fn given_document_when_serializing_then_uses_russian_keys_and_four_space_indent() {
        let mut items = BTreeMap::new();
        items.insert("Термос".to_string(), Item::new(1000, 1.5));
        let doc = PackDocument::new(Budget::default(), items);

        let json = doc.to_json().unwrap();

        assert!(json.contains("\n    \"max_weight\": 12"));
        assert!(json.contains("\"Термос\""));
        assert!(json.contains("\"вес\": 1000"));
        assert!(json.contains("\"объем\": 1.5"));
    }
}
