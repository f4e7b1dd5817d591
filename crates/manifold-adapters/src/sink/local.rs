//! Local filesystem sink using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use manifold_core::{
    application::{ApplicationError, ports::ArtifactSink},
    error::{ManifoldError, ManifoldResult},
};

/// Production sink writing under a project root.
#[derive(Debug, Clone)]
pub struct LocalSink {
    root: PathBuf,
}

impl LocalSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl ArtifactSink for LocalSink {
    fn write(&self, path: &Path, text: &str) -> ManifoldResult<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(|e| sink_error(&full, e))?;
        }
        std::fs::write(&full, text).map_err(|e| sink_error(&full, e))
    }

    fn mark_executable(&self, path: &Path) -> ManifoldResult<()> {
        let full = self.resolve(path);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&full)
                .map_err(|e| sink_error(&full, e))?
                .permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&full, perms).map_err(|e| sink_error(&full, e))?;
        }
        #[cfg(not(unix))]
        {
            let _ = full;
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn read(&self, path: &Path) -> ManifoldResult<String> {
        let full = self.resolve(path);
        std::fs::read_to_string(&full).map_err(|e| {
            ApplicationError::ReadError {
                path: full,
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn sink_error(path: &Path, e: io::Error) -> ManifoldError {
    ApplicationError::SinkError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_create_parent_directories() {
        let dir = TempDir::new().unwrap();
        let sink = LocalSink::new(dir.path());

        sink.write(Path::new("project/.env.local"), "A=1\n").unwrap();

        assert!(sink.exists(Path::new("project/.env.local")));
        assert_eq!(sink.read(Path::new("project/.env.local")).unwrap(), "A=1\n");
    }

    #[test]
    fn writes_replace_existing_files() {
        let dir = TempDir::new().unwrap();
        let sink = LocalSink::new(dir.path());
        sink.write(Path::new("README.md"), "old").unwrap();
        sink.write(Path::new("README.md"), "new").unwrap();
        assert_eq!(sink.read(Path::new("README.md")).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn mark_executable_sets_mode_755() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let sink = LocalSink::new(dir.path());
        sink.write(Path::new("app"), "#!/usr/bin/env bash\n").unwrap();
        sink.mark_executable(Path::new("app")).unwrap();

        let mode = std::fs::metadata(dir.path().join("app"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn io_failures_carry_the_path() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("docker"), "not a directory").unwrap();
        let sink = LocalSink::new(dir.path());

        let err = sink
            .write(Path::new("docker/create-database.sql"), "SELECT 1;")
            .unwrap_err();
        assert!(matches!(
            err,
            ManifoldError::Application(ApplicationError::SinkError { .. })
        ));
        assert!(err.to_string().contains("docker"));
    }

    #[test]
    fn reading_a_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let sink = LocalSink::new(dir.path());
        assert!(!sink.exists(Path::new("service-config.json")));
        assert!(sink.read(Path::new("service-config.json")).is_err());
    }
}
