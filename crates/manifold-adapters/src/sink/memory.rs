//! In-memory sink for testing and dry runs.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use manifold_core::{
    application::{ApplicationError, ports::ArtifactSink},
    error::ManifoldResult,
};

/// In-memory sink. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    inner: Arc<RwLock<MemorySinkInner>>,
}

#[derive(Debug, Default)]
struct MemorySinkInner {
    files: BTreeMap<PathBuf, String>,
    executables: BTreeSet<PathBuf>,
}

impl MemorySink {
    /// Create a new empty memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: impl AsRef<Path>) -> bool {
        self.inner
            .read()
            .map(|inner| inner.executables.contains(path.as_ref()))
            .unwrap_or(false)
    }

    /// All written paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Total bytes written.
    pub fn total_bytes(&self) -> usize {
        self.inner
            .read()
            .map(|inner| inner.files.values().map(String::len).sum())
            .unwrap_or(0)
    }
}

impl ArtifactSink for MemorySink {
    fn write(&self, path: &Path, text: &str) -> ManifoldResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.files.insert(path.to_path_buf(), text.to_string());
        Ok(())
    }

    fn mark_executable(&self, path: &Path) -> ManifoldResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if !inner.files.contains_key(path) {
            return Err(ApplicationError::SinkError {
                path: path.to_path_buf(),
                reason: "file has not been written".into(),
            }
            .into());
        }
        inner.executables.insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }

    fn read(&self, path: &Path) -> ManifoldResult<String> {
        self.read_file(path).ok_or_else(|| {
            ApplicationError::ReadError {
                path: path.to_path_buf(),
                reason: "not found".into(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_contents() {
        let sink = MemorySink::new();
        let view = sink.clone();
        sink.write(Path::new("app"), "#!/bin/sh\n").unwrap();
        sink.mark_executable(Path::new("app")).unwrap();

        assert_eq!(view.read_file("app").as_deref(), Some("#!/bin/sh\n"));
        assert!(view.is_executable("app"));
        assert_eq!(view.total_bytes(), 10);
    }

    #[test]
    fn executable_requires_a_written_file() {
        let sink = MemorySink::new();
        assert!(sink.mark_executable(Path::new("app")).is_err());
    }

    #[test]
    fn list_is_sorted() {
        let sink = MemorySink::new();
        sink.write(Path::new("b"), "").unwrap();
        sink.write(Path::new("a"), "").unwrap();
        assert_eq!(sink.list_files(), [PathBuf::from("a"), PathBuf::from("b")]);
    }
}
