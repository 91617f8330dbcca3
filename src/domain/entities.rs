//! Domain entities: core data structures

use crate::domain::DomainError;

/// Grams per kilogram; budgets are kept in kg, items in g.
pub const GRAMS_PER_KG: u64 = 1000;

/// Tolerance for volume comparisons (liters).
///
/// Volumes are entered with one decimal, so summing them accumulates
/// binary rounding noise (0.1 + 0.2 > 0.3).
pub const VOLUME_EPSILON: f64 = 1e-9;

/// A packed item. The name is the key of the collection and lives there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    /// Weight in grams
    pub weight: u32,
    /// Volume in liters
    pub volume: f64,
}

impl Item {
    pub fn new(weight: u32, volume: f64) -> Self {
        Self { weight, volume }
    }
}

/// Maximum weight and volume a backpack session permits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    /// Weight limit in whole kilograms
    pub max_weight_kg: u32,
    /// Volume limit in liters
    pub max_volume: f64,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_weight_kg: 12,
            max_volume: 40.0,
        }
    }
}

impl Budget {
    /// Create a budget, rejecting negative or non-finite volumes.
    pub fn new(max_weight_kg: u32, max_volume: f64) -> Result<Self, DomainError> {
        if !max_volume.is_finite() || max_volume < 0.0 {
            return Err(DomainError::InvalidBudget {
                message: format!("max volume must be a non-negative number, got {max_volume}"),
            });
        }
        Ok(Self {
            max_weight_kg,
            max_volume,
        })
    }

    /// Weight limit in grams.
    pub fn max_weight_grams(&self) -> u64 {
        u64::from(self.max_weight_kg) * GRAMS_PER_KG
    }
}

/// Totals derived from the current collection and budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub total_weight: u64,
    pub total_volume: f64,
    pub count: usize,
    pub max_weight: u64,
    pub max_volume: f64,
    /// May be negative when over the limit
    pub remaining_weight: i64,
    /// May be negative when over the limit
    pub remaining_volume: f64,
    pub weight_over_limit: bool,
    pub volume_over_limit: bool,
}

impl Aggregate {
    /// Share of the weight budget in use, capped at 1.0. Zero budget reads as empty.
    pub fn weight_fill(&self) -> f64 {
        if self.max_weight == 0 {
            return 0.0;
        }
        (self.total_weight as f64 / self.max_weight as f64).min(1.0)
    }

    /// Share of the volume budget in use, capped at 1.0. Zero budget reads as empty.
    pub fn volume_fill(&self) -> f64 {
        if self.max_volume <= 0.0 {
            return 0.0;
        }
        (self.total_volume / self.max_volume).min(1.0)
    }

    /// True when either dimension is over its limit.
    pub fn any_over_limit(&self) -> bool {
        self.weight_over_limit || self.volume_over_limit
    }
}

/// Trim an item name; blank names are rejected.
pub fn normalize_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Reject negative or non-finite item volumes.
pub fn validate_volume(name: &str, volume: f64) -> Result<(), DomainError> {
    if !volume.is_finite() || volume < 0.0 {
        return Err(DomainError::InvalidVolume {
            name: name.to_string(),
            volume,
        });
    }
    Ok(())
}
