//! Blog site layout
//!
//! A site is a base directory holding the three post directories. They are
//! the only durable state; everything else is rebuilt by scanning them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// Unpublished posts
pub const DRAFTS_DIR: &str = "_drafts";

/// Published posts, the source of truth after publication
pub const PUBLISHED_DIR: &str = "_published";

/// Staging directory read by the site generator
pub const STAGED_DIR: &str = "_posts";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("{0} is not a valid directory")]
    InvalidBaseDir(PathBuf),
}

/// A blog site rooted at a base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    root: PathBuf,
}

impl Site {
    /// Opens the site at `base_dir`, creating missing post directories.
    ///
    /// Returns the site and the directories that had to be created.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<(Self, Vec<PathBuf>)> {
        let base_dir = base_dir.as_ref();
        if !base_dir.is_dir() {
            return Err(SiteError::InvalidBaseDir(base_dir.to_path_buf()).into());
        }

        let root = base_dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve base directory: {}", base_dir.display()))?;
        let site = Self { root };

        let mut created = Vec::new();
        for dir in [site.staged_dir(), site.published_dir(), site.drafts_dir()] {
            if !dir.is_dir() {
                fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
                created.push(dir);
            }
        }

        Ok((site, created))
    }

    /// Returns the absolute base directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.root.join(DRAFTS_DIR)
    }

    pub fn published_dir(&self) -> PathBuf {
        self.root.join(PUBLISHED_DIR)
    }

    pub fn staged_dir(&self) -> PathBuf {
        self.root.join(STAGED_DIR)
    }
}
