//! Greedy fitter: heaviest-first, single pass.
//!
//! An item that does not fit when it is considered is skipped for good, even
//! if lighter picks later leave room for it. This can strand capacity; it is
//! a heuristic, not a knapsack solver.

use tracing::debug;

/// A catalog entry offered to the fitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitCandidate {
    pub name: String,
    /// Weight in grams
    pub weight: u64,
}

impl FitCandidate {
    pub fn new(name: impl Into<String>, weight: u64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// An accepted item and the budget left right after taking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitPick {
    pub name: String,
    pub weight: u64,
    pub remaining_after: u64,
}

/// Result of a greedy fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitOutcome {
    /// Accepted items in acceptance order
    pub picks: Vec<FitPick>,
    /// Names of items that did not fit when considered
    pub skipped: Vec<String>,
    pub budget: u64,
    pub remaining: u64,
    /// Sum of all candidate weights
    pub catalog_weight: u64,
}

impl FitOutcome {
    pub fn count(&self) -> usize {
        self.picks.len()
    }

    pub fn packed_weight(&self) -> u64 {
        self.budget - self.remaining
    }

    pub fn names(&self) -> Vec<&str> {
        self.picks.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Fit candidates into `budget` grams, heaviest first.
///
/// Ties keep the catalog's relative order.
pub fn fit(catalog: &[FitCandidate], budget: u64) -> FitOutcome {
    let mut ordered: Vec<&FitCandidate> = catalog.iter().collect();
    // stable: equal weights keep catalog order
    ordered.sort_by(|a, b| b.weight.cmp(&a.weight));

    let mut remaining = budget;
    let mut picks = Vec::new();
    let mut skipped = Vec::new();

    for candidate in ordered {
        if candidate.weight <= remaining {
            remaining -= candidate.weight;
            debug!(
                "fit: take {} ({} g), {} g left",
                candidate.name, candidate.weight, remaining
            );
            picks.push(FitPick {
                name: candidate.name.clone(),
                weight: candidate.weight,
                remaining_after: remaining,
            });
        } else {
            debug!("fit: skip {} ({} g)", candidate.name, candidate.weight);
            skipped.push(candidate.name.clone());
        }
    }

    FitOutcome {
        picks,
        skipped,
        budget,
        remaining,
        catalog_weight: catalog.iter().map(|c| c.weight).sum(),
    }
}
