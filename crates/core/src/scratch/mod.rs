//! Scratch storage for request-scoped temporary files.
//!
//! Every request gets its own subdirectory `<root>/<uuid>/`. Only that
//! subdirectory is removed when the request finishes; purging the whole root
//! is reserved for startup and shutdown, when no request is in flight.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors from scratch directory management.
#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("Failed to create scratch directory {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("Failed to remove scratch directory {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },
}

/// The shared scratch root.
#[derive(Debug, Clone)]
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deletes everything under the root and recreates it empty.
    pub async fn reset(&self) -> Result<(), ScratchError> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => debug!(root = %self.root.display(), "Purged scratch root"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(ScratchError::Remove {
                    path: self.root.clone(),
                    source,
                })
            }
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| ScratchError::Create {
                path: self.root.clone(),
                source,
            })
    }

    /// Creates a fresh, uniquely named directory for one request.
    pub async fn allocate(&self) -> Result<ScratchDir, ScratchError> {
        let id = Uuid::new_v4().to_string();
        let path = self.root.join(&id);

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| ScratchError::Create {
                path: path.clone(),
                source,
            })?;

        debug!(scratch = %path.display(), "Allocated scratch directory");

        Ok(ScratchDir {
            id,
            path,
            removed: false,
        })
    }
}

/// A request-owned scratch directory.
///
/// Removed by [`ScratchDir::remove`], or on drop if that never ran.
#[derive(Debug)]
pub struct ScratchDir {
    id: String,
    path: PathBuf,
    removed: bool,
}

impl ScratchDir {
    /// Unique identifier of this directory (also its name).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a fresh collision-free file stem for a file in this directory.
    pub fn unique_stem(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Path of a new uniquely named file ending in `suffix` (e.g. `_trimmed.mp3`).
    pub fn unique_file(&self, suffix: &str) -> PathBuf {
        self.path.join(format!("{}{}", self.unique_stem(), suffix))
    }

    /// Removes the directory and everything in it.
    pub async fn remove(mut self) -> Result<(), ScratchError> {
        self.removed = true;
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => {
                debug!(scratch = %self.path.display(), "Removed scratch directory");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ScratchError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(scratch = %self.path.display(), "Removed scratch directory on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(scratch = %self.path.display(), error = %e, "Failed to remove scratch directory"),
        }
    }
}
