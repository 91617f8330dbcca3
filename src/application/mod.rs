//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod document;
pub mod error;
pub mod error_ext;
pub mod report;
pub mod services;

pub use document::{DocumentFormat, PackDocument, DEFAULT_FILE_NAME, PACK_FILE_EXTENSION};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use report::Language;
