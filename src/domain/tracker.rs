//! Capacity tracker: the packed collection, its budget and derived totals.
//!
//! Every successful mutation recomputes the aggregate and hands it to the
//! registered observers. Failed mutations leave the collection untouched and
//! notify nobody.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, trace};

use crate::domain::entities::{normalize_name, validate_volume, VOLUME_EPSILON};
use crate::domain::{Aggregate, Budget, DomainError, Item};

/// Receives the fresh aggregate after each mutation of a tracker.
pub trait CapacityObserver {
    fn on_change(&mut self, aggregate: &Aggregate);
}

impl<F> CapacityObserver for F
where
    F: FnMut(&Aggregate),
{
    fn on_change(&mut self, aggregate: &Aggregate) {
        self(aggregate)
    }
}

/// Named items with a weight and volume budget.
#[derive(Default)]
pub struct CapacityTracker {
    items: BTreeMap<String, Item>,
    budget: Budget,
    aggregate: Option<Aggregate>,
    observers: Vec<Box<dyn CapacityObserver>>,
}

impl fmt::Debug for CapacityTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapacityTracker")
            .field("items", &self.items)
            .field("budget", &self.budget)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl CapacityTracker {
    pub fn new(budget: Budget) -> Self {
        let mut tracker = Self {
            items: BTreeMap::new(),
            budget,
            aggregate: None,
            observers: Vec::new(),
        };
        tracker.aggregate = Some(tracker.compute());
        tracker
    }

    /// Register an observer. It is called after every successful mutation.
    pub fn subscribe(&mut self, observer: impl CapacityObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Add an item under a unique, non-blank name.
    pub fn add(&mut self, name: &str, weight: u32, volume: f64) -> Result<(), DomainError> {
        let name = normalize_name(name)?;
        if self.items.contains_key(&name) {
            return Err(DomainError::DuplicateName(name));
        }
        validate_volume(&name, volume)?;

        debug!("add: {} ({} g, {} l)", name, weight, volume);
        self.items.insert(name, Item::new(weight, volume));
        self.changed();
        Ok(())
    }

    /// Remove an item by name and return it.
    pub fn remove(&mut self, name: &str) -> Result<Item, DomainError> {
        let key = name.trim();
        let item = self
            .items
            .remove(key)
            .ok_or_else(|| DomainError::NotFound(key.to_string()))?;

        debug!("remove: {}", key);
        self.changed();
        Ok(item)
    }

    /// Replace `old_name` with `new_name` carrying the new weight and volume.
    ///
    /// Either the whole edit applies or nothing changes.
    pub fn edit(
        &mut self,
        old_name: &str,
        new_name: &str,
        weight: u32,
        volume: f64,
    ) -> Result<(), DomainError> {
        let new_name = normalize_name(new_name)?;
        let old_name = old_name.trim();
        if !self.items.contains_key(old_name) {
            return Err(DomainError::NotFound(old_name.to_string()));
        }
        if new_name != old_name && self.items.contains_key(&new_name) {
            return Err(DomainError::DuplicateName(new_name));
        }
        validate_volume(&new_name, volume)?;

        debug!(
            "edit: {} -> {} ({} g, {} l)",
            old_name, new_name, weight, volume
        );
        self.items.remove(old_name);
        self.items.insert(new_name, Item::new(weight, volume));
        self.changed();
        Ok(())
    }

    /// Replace the budget.
    pub fn set_budget(&mut self, max_weight_kg: u32, max_volume: f64) -> Result<(), DomainError> {
        let budget = Budget::new(max_weight_kg, max_volume)?;
        debug!("set_budget: {} kg, {} l", max_weight_kg, max_volume);
        self.budget = budget;
        self.changed();
        Ok(())
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        debug!("clear: dropping {} items", self.items.len());
        self.items.clear();
        self.changed();
    }

    /// Swap in a complete state at once (used when loading a pack file).
    pub fn replace_all(&mut self, budget: Budget, items: BTreeMap<String, Item>) {
        debug!("replace_all: {} items", items.len());
        self.budget = budget;
        self.items = items;
        self.changed();
    }

    /// Current totals.
    pub fn aggregate(&self) -> Aggregate {
        self.aggregate.unwrap_or_else(|| self.compute())
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.get(name.trim())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name.trim())
    }

    /// Items ordered by name.
    pub fn items(&self) -> &BTreeMap<String, Item> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn changed(&mut self) {
        let aggregate = self.compute();
        self.aggregate = Some(aggregate);
        trace!("notify {} observers: {:?}", self.observers.len(), aggregate);
        for observer in self.observers.iter_mut() {
            observer.on_change(&aggregate);
        }
    }

    fn compute(&self) -> Aggregate {
        let total_weight: u64 = self.items.values().map(|i| u64::from(i.weight)).sum();
        let total_volume: f64 = self.items.values().map(|i| i.volume).sum();
        let max_weight = self.budget.max_weight_grams();
        let max_volume = self.budget.max_volume;

        Aggregate {
            total_weight,
            total_volume,
            count: self.items.len(),
            max_weight,
            max_volume,
            remaining_weight: max_weight as i64 - total_weight as i64,
            remaining_volume: max_volume - total_volume,
            weight_over_limit: total_weight > max_weight,
            volume_over_limit: total_volume - max_volume > VOLUME_EPSILON,
        }
    }
}
