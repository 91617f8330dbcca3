//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod catalog;
mod session;

pub use catalog::{CatalogService, FitSource};
pub use session::{with_pack_extension, SessionService};
