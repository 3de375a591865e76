//! Persistence of generated files under the output root.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Empty file name")]
    EmptyPath,

    #[error("Path escapes the output directory: {0}")]
    OutsideRoot(String),

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A generated file, as handed back by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub relative_path: String,
    pub content: String,
}

/// Writes artifacts below a fixed root directory.
///
/// Cheap to clone; holds no state besides the root path, so concurrent
/// writes to disjoint paths need no coordination. Two writes to the same
/// path race and the last one wins.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a model-supplied relative path against the root.
    ///
    /// Only plain relative paths are accepted: absolute paths, `..` and
    /// drive prefixes are rejected.
    pub fn resolve(&self, relative_path: &str) -> Result<PathBuf, PersistenceError> {
        let relative = Path::new(relative_path.trim());
        let mut resolved = self.root.clone();
        let mut segments = 0usize;

        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    segments += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(PersistenceError::OutsideRoot(relative_path.to_string()));
                }
            }
        }

        if segments == 0 {
            return Err(PersistenceError::EmptyPath);
        }
        Ok(resolved)
    }

    /// Write `content` to `relative_path`, creating parent directories and
    /// overwriting any existing file. Returns the absolute path written.
    pub async fn write(
        &self,
        relative_path: &str,
        content: &str,
    ) -> Result<PathBuf, PersistenceError> {
        let path = self.resolve(relative_path)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| PersistenceError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, content)
            .await
            .map_err(|source| PersistenceError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = content.len(), "Saved generated file");
        Ok(path)
    }

    pub async fn write_artifact(&self, artifact: &Artifact) -> Result<PathBuf, PersistenceError> {
        self.write(&artifact.relative_path, &artifact.content).await
    }
}
