//! Update catalog backed by a directory.
//!
//! Each update is a subdirectory whose name holds a `<digits>.<digits>`
//! version, e.g. `1.0` or `2.13`. Other entries are ignored.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use manifold_core::{
    application::{ApplicationError, ports::UpdateCatalog},
    error::ManifoldResult,
};

#[derive(Debug, Clone)]
pub struct DirectoryUpdateCatalog {
    dir: PathBuf,
}

impl DirectoryUpdateCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl UpdateCatalog for DirectoryUpdateCatalog {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn available(&self) -> ManifoldResult<Vec<String>> {
        let unavailable = |reason: String| ApplicationError::CatalogUnavailable {
            path: self.dir.clone(),
            reason,
        };

        if !self.dir.is_dir() {
            return Err(unavailable("not a directory".into()).into());
        }

        let mut updates = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| unavailable(e.to_string()))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if is_update_name(&name) {
                updates.push(name.into_owned());
            } else {
                debug!(entry = %name, "Ignoring non-update directory");
            }
        }

        updates.sort();
        debug!(count = updates.len(), "Update catalog scanned");
        Ok(updates)
    }
}

/// True when `name` contains digits, a dot, then digits.
pub fn is_update_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'.'
            && i > 0
            && bytes[i - 1].is_ascii_digit()
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
    })
}
