//! Filesystem-based fragment loader.
//!
//! Reads every file under an override directory as a fragment, keyed by its
//! path relative to that directory with forward slashes. The directory may
//! carry an optional `fragments.toml` manifest.
//!
//! # Directory layout expected
//!
//! ```text
//! fragments/
//! ├── fragments.toml           ← manifest (optional)
//! ├── README.md                ← shadows the built-in README.md
//! ├── production/
//! │   └── dotenv               ← used for every site in production
//! └── spilnu/
//!     └── stage/
//!         └── dotenv           ← used for spilnu in stage only
//! ```
//!
//! # `fragments.toml` format
//!
//! ```toml
//! [fragments]
//! name    = "acme overrides"       # optional, logged when the overrides load
//! exclude = ["NOTES.md", "drafts"] # files or directories that are not fragments
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use manifold_core::{application::ApplicationError, error::ManifoldError};

/// Manifest file name; never loaded as a fragment.
pub const MANIFEST_FILE: &str = "fragments.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FragmentManifest {
    #[serde(default)]
    pub fragments: ManifestSection,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ManifestSection {
    pub name: Option<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Error)]
pub enum FragmentLoadError {
    #[error("fragment directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse '{path}': {source}")]
    Manifest {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl From<FragmentLoadError> for ManifoldError {
    fn from(err: FragmentLoadError) -> Self {
        let path = match &err {
            FragmentLoadError::MissingDirectory(path)
            | FragmentLoadError::Io { path, .. }
            | FragmentLoadError::Manifest { path, .. } => path.clone(),
            FragmentLoadError::Walk(e) => e.path().map(Path::to_path_buf).unwrap_or_default(),
        };
        ApplicationError::ReadError {
            path,
            reason: err.to_string(),
        }
        .into()
    }
}

/// Fragments read from one directory.
#[derive(Debug, Clone, Default)]
pub struct LoadedFragments {
    pub name: Option<String>,
    pub fragments: Vec<(String, String)>,
}

pub struct FilesystemFragmentLoader {
    dir: PathBuf,
}

impl FilesystemFragmentLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every fragment under the directory, sorted by path.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn load_all(&self) -> Result<LoadedFragments, FragmentLoadError> {
        if !self.dir.is_dir() {
            return Err(FragmentLoadError::MissingDirectory(self.dir.clone()));
        }

        let manifest = self.read_manifest()?;
        let mut fragments = Vec::new();

        for entry in WalkDir::new(&self.dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.dir) else {
                continue;
            };
            let key = normalize_path(&relative.to_string_lossy());
            if key == MANIFEST_FILE || is_excluded(&key, &manifest.fragments.exclude) {
                debug!(path = %key, "skipping");
                continue;
            }

            let text = fs::read_to_string(entry.path()).map_err(|source| FragmentLoadError::Io {
                path: entry.path().to_path_buf(),
                source,
            })?;
            fragments.push((key, text));
        }

        fragments.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(count = fragments.len(), "finished loading fragments");

        Ok(LoadedFragments {
            name: manifest.fragments.name,
            fragments,
        })
    }

    fn read_manifest(&self) -> Result<FragmentManifest, FragmentLoadError> {
        let path = self.dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(FragmentManifest::default());
        }
        let raw = fs::read_to_string(&path).map_err(|source| FragmentLoadError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| FragmentLoadError::Manifest { path, source })
    }
}

/// Forward slashes, no leading `./`.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches("./").to_string()
}

fn is_excluded(key: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|pattern| {
        let pattern = pattern.trim_end_matches('/');
        key == pattern || key.starts_with(&format!("{pattern}/"))
    })
}
