//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod catalog;
pub mod entities;
pub mod error;
pub mod fitter;
pub mod tracker;

pub use catalog::{Catalog, CatalogItem, Category, FitCatalog};
pub use entities::*;
pub use error::DomainError;
pub use fitter::{fit, FitCandidate, FitOutcome, FitPick};
pub use tracker::{CapacityObserver, CapacityTracker};
