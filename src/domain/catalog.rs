//! Preset catalogs loaded from TOML data.
//!
//! Two shapes exist: the gear catalog (categories of items with weight and
//! volume) used to pick items into a pack, and the flat fit catalog used by
//! the greedy fitter. Both ship embedded and can be replaced by user files.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::fitter::FitCandidate;
use crate::domain::DomainError;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.toml");
const BUILTIN_FIT_CATALOG: &str = include_str!("../../data/fit_catalog.toml");

/// A preset item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    /// Weight in grams
    pub weight: u32,
    /// Volume in liters
    #[serde(default)]
    pub volume: f64,
}

/// A named group of preset items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

impl Category {
    pub fn item(&self, name: &str) -> Option<&CatalogItem> {
        let name = name.trim();
        self.items.iter().find(|i| i.name == name)
    }

    /// Candidates for the greedy fitter, in catalog order.
    pub fn fit_candidates(&self) -> Vec<FitCandidate> {
        self.items
            .iter()
            .map(|i| FitCandidate::new(i.name.clone(), u64::from(i.weight)))
            .collect()
    }
}

/// Ordered categories of preset items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "category", default)]
    categories: Vec<Category>,
}

impl Catalog {
    /// Parse and validate a catalog from TOML.
    pub fn from_toml(content: &str) -> Result<Self, DomainError> {
        let catalog: Catalog = toml::from_str(content).map_err(|e| DomainError::InvalidCatalog {
            message: e.to_string(),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category lookup, ignoring case and surrounding whitespace.
    pub fn category(&self, name: &str) -> Option<&Category> {
        let wanted = name.trim().to_lowercase();
        self.categories
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
    }

    pub fn find(&self, category: &str, item: &str) -> Option<&CatalogItem> {
        self.category(category).and_then(|c| c.item(item))
    }

    fn validate(&self) -> Result<(), DomainError> {
        let mut seen_categories = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(invalid("category with empty name".into()));
            }
            if !seen_categories.insert(category.name.to_lowercase()) {
                return Err(invalid(format!("duplicate category: {}", category.name)));
            }
            let mut seen_items = HashSet::new();
            for item in &category.items {
                if item.name.trim().is_empty() {
                    return Err(invalid(format!("empty item name in {}", category.name)));
                }
                if !seen_items.insert(item.name.as_str()) {
                    return Err(invalid(format!(
                        "duplicate item {} in {}",
                        item.name, category.name
                    )));
                }
                if !item.volume.is_finite() || item.volume < 0.0 {
                    return Err(invalid(format!(
                        "negative volume for {} in {}",
                        item.name, category.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Flat list of weighted items for the greedy fitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitCatalog {
    #[serde(default)]
    items: Vec<FitEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FitEntry {
    name: String,
    weight: u64,
}

impl FitCatalog {
    pub fn from_toml(content: &str) -> Result<Self, DomainError> {
        let catalog: FitCatalog =
            toml::from_str(content).map_err(|e| DomainError::InvalidCatalog {
                message: e.to_string(),
            })?;
        if let Some(entry) = catalog.items.iter().find(|e| e.name.trim().is_empty()) {
            return Err(invalid(format!(
                "empty item name (weight {} g)",
                entry.weight
            )));
        }
        Ok(catalog)
    }

    /// The trail kit shipped with the binary.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_toml(BUILTIN_FIT_CATALOG)
    }

    pub fn candidates(&self) -> Vec<FitCandidate> {
        self.items
            .iter()
            .map(|e| FitCandidate::new(e.name.clone(), e.weight))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn invalid(message: String) -> DomainError {
    DomainError::InvalidCatalog { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_builtin_catalog_when_loading_then_has_three_categories() {
        let catalog = Catalog::builtin().unwrap();
        let names: Vec<_> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Базовое снаряжение", "Одежда", "Электроника"]);
    }

    #[test]
    fn given_builtin_catalog_when_finding_then_returns_item() {
        let catalog = Catalog::builtin().unwrap();
        let item = catalog.find("электроника", "Повербанк").unwrap();
        assert_eq!(item.weight, 350);
        assert_eq!(item.volume, 0.4);
    }

    #[test]
    fn given_duplicate_item_when_parsing_then_rejects() {
        let toml = r#"
[[category]]
name = "x"
items = [{ name = "a", weight = 1, volume = 0.1 }, { name = "a", weight = 2 }]
"#;
        assert!(matches!(
            Catalog::from_toml(toml),
            Err(DomainError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn given_builtin_fit_catalog_when_loading_then_keeps_order() {
        let catalog = FitCatalog::builtin().unwrap();
        let candidates = catalog.candidates();
        assert_eq!(candidates.len(), 15);
        assert_eq!(candidates[0], FitCandidate::new("зажигалка", 20));
        assert_eq!(candidates[14], FitCandidate::new("карта", 5));
    }
}
