//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io::{self, Write};
use std::path::Path;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace file contents. Either the new content lands completely or the
    /// previous file stays as it was.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        // temp file in the target directory so persist() is a same-device rename
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_existing_file_when_writing_then_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("trip.bpc");
        std::fs::write(&path, "old").unwrap();

        RealFileSystem.write(&path, "new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        // no stray temp files left behind
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn given_missing_directory_when_writing_then_fails_without_creating() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("trip.bpc");

        assert!(RealFileSystem.write(&path, "x").is_err());
        assert!(!RealFileSystem.exists(&path));
    }

    #[test]
    fn given_nested_path_when_ensuring_parent_then_creates_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("bpcalc.toml");

        RealFileSystem.ensure_parent(&path).unwrap();

        assert!(temp.path().join("a").join("b").is_dir());
    }
}
