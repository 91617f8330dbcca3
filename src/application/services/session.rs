//! Pack session service
//!
//! Owns the capacity tracker of one backpack and the file it is bound to.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::document::{DocumentFormat, PackDocument, PACK_FILE_EXTENSION};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Aggregate, Budget, CapacityObserver, CapacityTracker, Catalog, Item};
use crate::infrastructure::traits::FileSystem;

const TITLE: &str = "Backpack calculator";

/// A backpack being packed, optionally bound to a pack file.
pub struct SessionService {
    fs: Arc<dyn FileSystem>,
    tracker: CapacityTracker,
    current_file: Option<PathBuf>,
    /// Budget applied to legacy files that carry none
    fallback_budget: Budget,
}

impl SessionService {
    /// Start an empty, unsaved session.
    pub fn new(fs: Arc<dyn FileSystem>, budget: Budget) -> Self {
        let mut tracker = CapacityTracker::new(budget);
        tracker.subscribe(|agg: &Aggregate| {
            debug!(
                "pack changed: {} items, {} g / {} g, {:.1} l / {} l",
                agg.count, agg.total_weight, agg.max_weight, agg.total_volume, agg.max_volume
            );
        });
        Self {
            fs,
            tracker,
            current_file: None,
            fallback_budget: budget,
        }
    }

    /// Load a pack file, replacing the current state.
    ///
    /// On any failure the session is left exactly as it was.
    pub fn open(&mut self, path: &Path) -> ApplicationResult<DocumentFormat> {
        debug!("open: {}", path.display());
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read pack file", path)?;
        let document = PackDocument::parse(&content, self.fallback_budget).map_err(|e| {
            ApplicationError::InvalidDocument {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        if document.format == DocumentFormat::Legacy {
            warn!(
                "{} uses the legacy layout, budget defaults to {} kg / {} l",
                path.display(),
                document.budget.max_weight_kg,
                document.budget.max_volume
            );
        }

        self.tracker.replace_all(document.budget, document.items);
        self.current_file = Some(path.to_path_buf());
        Ok(document.format)
    }

    /// Write to the bound file.
    pub fn save(&mut self) -> ApplicationResult<PathBuf> {
        let path = self
            .current_file
            .clone()
            .ok_or(ApplicationError::NoCurrentFile)?;
        self.write_to(&path)?;
        Ok(path)
    }

    /// Write to `path` (with `.bpc` appended when missing) and bind to it.
    pub fn save_as(&mut self, path: &Path) -> ApplicationResult<PathBuf> {
        let path = with_pack_extension(path);
        self.write_to(&path)?;
        self.current_file = Some(path.clone());
        Ok(path)
    }

    fn write_to(&self, path: &Path) -> ApplicationResult<()> {
        debug!("save: {}", path.display());
        let json = self
            .document()
            .to_json()
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("serialize pack file {}", path.display()),
                source: Box::new(e),
            })?;
        self.fs
            .write(path, &json)
            .with_path_context("write pack file", path)
    }

    /// Snapshot of the session as a pack document.
    pub fn document(&self) -> PackDocument {
        PackDocument::new(self.tracker.budget(), self.tracker.items().clone())
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Window-style title: program name plus the bound file name.
    pub fn title(&self) -> String {
        match self.current_file.as_ref().and_then(|p| p.file_name()) {
            Some(name) => format!("{} - {}", TITLE, name.to_string_lossy()),
            None => TITLE.to_string(),
        }
    }

    pub fn subscribe(&mut self, observer: impl CapacityObserver + 'static) {
        self.tracker.subscribe(observer);
    }

    pub fn tracker(&self) -> &CapacityTracker {
        &self.tracker
    }

    pub fn aggregate(&self) -> Aggregate {
        self.tracker.aggregate()
    }

    pub fn add_item(&mut self, name: &str, weight: u32, volume: f64) -> ApplicationResult<()> {
        Ok(self.tracker.add(name, weight, volume)?)
    }

    /// Add a preset from the catalog.
    ///
    /// Returns `false` without touching the pack when an item of that name is
    /// already packed.
    pub fn add_preset(
        &mut self,
        catalog: &Catalog,
        category: &str,
        item: &str,
    ) -> ApplicationResult<bool> {
        let group = catalog
            .category(category)
            .ok_or_else(|| ApplicationError::UnknownCategory(category.trim().to_string()))?;
        let preset = group
            .item(item)
            .ok_or_else(|| ApplicationError::UnknownPreset {
                category: group.name.clone(),
                item: item.trim().to_string(),
            })?;

        if self.tracker.contains(&preset.name) {
            debug!("add_preset: {} already packed, skipping", preset.name);
            return Ok(false);
        }
        self.tracker.add(&preset.name, preset.weight, preset.volume)?;
        Ok(true)
    }

    pub fn edit_item(
        &mut self,
        old_name: &str,
        new_name: &str,
        weight: u32,
        volume: f64,
    ) -> ApplicationResult<()> {
        Ok(self.tracker.edit(old_name, new_name, weight, volume)?)
    }

    pub fn remove_item(&mut self, name: &str) -> ApplicationResult<Item> {
        Ok(self.tracker.remove(name)?)
    }

    pub fn clear(&mut self) {
        self.tracker.clear();
    }

    pub fn set_budget(&mut self, max_weight_kg: u32, max_volume: f64) -> ApplicationResult<()> {
        Ok(self.tracker.set_budget(max_weight_kg, max_volume)?)
    }
}

/// Append `.bpc` unless the file name already ends with it (any case).
pub fn with_pack_extension(path: &Path) -> PathBuf {
    let suffix = format!(".{PACK_FILE_EXTENSION}");
    let has_extension = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase().ends_with(&suffix))
        .unwrap_or(false);
    if has_extension {
        return path.to_path_buf();
    }
    let mut raw: OsString = path.as_os_str().to_os_string();
    raw.push(&suffix);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_path_without_extension_when_normalizing_then_appends_bpc() {
        assert_eq!(
            with_pack_extension(Path::new("trip")),
            PathBuf::from("trip.bpc")
        );
        assert_eq!(
            with_pack_extension(Path::new("trip.json")),
            PathBuf::from("trip.json.bpc")
        );
    }

    #[test]
    fn given_uppercase_extension_when_normalizing_then_keeps_path() {
        assert_eq!(
            with_pack_extension(Path::new("dir/TRIP.BPC")),
            PathBuf::from("dir/TRIP.BPC")
        );
    }
}
