use crate::domain::{
    entities::common::{Permissions, RelativePath},
    error::DomainError,
};

/// One generated file, ready for the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: RelativePath,
    pub content: String,
    pub permissions: Permissions,
}

impl Artifact {
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Ordered output of one compilation.
///
/// Order is generation order. Destinations are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        path: RelativePath,
        content: String,
        permissions: Permissions,
    ) -> Result<(), DomainError> {
        if self.get(path.as_path()).is_some() {
            return Err(DomainError::DuplicatePath {
                path: path.to_string(),
            });
        }
        self.artifacts.push(Artifact {
            path,
            content,
            permissions,
        });
        Ok(())
    }

    pub fn get(&self, path: impl AsRef<std::path::Path>) -> Option<&Artifact> {
        let path = path.as_ref();
        self.artifacts.iter().find(|a| a.path.as_path() == path)
    }

    /// Content of the artifact at `path`.
    pub fn content(&self, path: impl AsRef<std::path::Path>) -> Option<&str> {
        self.get(path).map(|a| a.content.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.artifacts.iter().map(|a| &a.path)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.artifacts.iter().map(Artifact::size).sum()
    }
}

impl<'a> IntoIterator for &'a ArtifactSet {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}
