//! Catalog service
//!
//! Resolves which preset catalogs are in effect (embedded or user files) and
//! runs the greedy fitter against them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{fit, Catalog, FitCandidate, FitCatalog, FitOutcome, GRAMS_PER_KG};
use crate::infrastructure::traits::FileSystem;

/// Where the fitter takes its candidates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FitSource {
    /// A flat fit catalog; `None` means the embedded trail kit.
    TrailKit(Option<PathBuf>),
    /// One category of a gear catalog; `None` means the embedded catalog.
    Category {
        catalog: Option<PathBuf>,
        name: String,
    },
}

/// Service for loading catalogs and fitting items from them.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load the gear catalog from `path`, or the embedded one.
    pub fn load_catalog(&self, path: Option<&Path>) -> ApplicationResult<Catalog> {
        match path {
            Some(path) => {
                debug!("load_catalog: {}", path.display());
                let content = self
                    .fs
                    .read_to_string(path)
                    .with_path_context("read catalog", path)?;
                Ok(Catalog::from_toml(&content)?)
            }
            None => Ok(Catalog::builtin()?),
        }
    }

    /// Load the fit catalog from `path`, or the embedded trail kit.
    pub fn load_fit_catalog(&self, path: Option<&Path>) -> ApplicationResult<FitCatalog> {
        match path {
            Some(path) => {
                debug!("load_fit_catalog: {}", path.display());
                let content = self
                    .fs
                    .read_to_string(path)
                    .with_path_context("read fit catalog", path)?;
                Ok(FitCatalog::from_toml(&content)?)
            }
            None => Ok(FitCatalog::builtin()?),
        }
    }

    /// Candidates in catalog order for the given source.
    pub fn candidates(&self, source: &FitSource) -> ApplicationResult<Vec<FitCandidate>> {
        match source {
            FitSource::TrailKit(path) => Ok(self.load_fit_catalog(path.as_deref())?.candidates()),
            FitSource::Category { catalog, name } => {
                let catalog = self.load_catalog(catalog.as_deref())?;
                let category = catalog
                    .category(name)
                    .ok_or_else(|| ApplicationError::UnknownCategory(name.trim().to_string()))?;
                Ok(category.fit_candidates())
            }
        }
    }

    /// Greedy fit of `source` into a budget of whole kilograms.
    pub fn fit(&self, source: &FitSource, budget_kg: u32) -> ApplicationResult<FitOutcome> {
        let candidates = self.candidates(source)?;
        let budget = u64::from(budget_kg) * GRAMS_PER_KG;
        debug!("fit: {} candidates into {} g", candidates.len(), budget);
        Ok(fit(&candidates, budget))
    }
}
