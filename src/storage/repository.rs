//! Post repository
//!
//! Posts are rebuilt from the drafts and published directories on every
//! call. Files that cannot be parsed are reported back, never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Site;
use crate::domain::{Post, PostError};

/// Which source directories a scan covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    Drafts,
    Published,
}

impl Scope {
    fn includes_drafts(self) -> bool {
        matches!(self, Scope::All | Scope::Drafts)
    }

    fn includes_published(self) -> bool {
        matches!(self, Scope::All | Scope::Published)
    }
}

/// Result of scanning the source directories
#[derive(Debug, Default)]
pub struct Scan {
    /// Parsed posts, ascending by date
    pub posts: Vec<Post>,

    /// Entries that were skipped, with the reason
    pub skipped: Vec<PostError>,
}

/// Scans the directories selected by `scope`.
///
/// Drafts come before published posts prior to the (stable) date sort, so
/// a draft and a published post sharing a date keep that order.
pub fn scan(site: &Site, scope: Scope) -> Result<Scan> {
    let mut result = Scan::default();

    if scope.includes_drafts() {
        scan_dir(&site.drafts_dir(), true, &mut result)?;
    }
    if scope.includes_published() {
        scan_dir(&site.published_dir(), false, &mut result)?;
    }

    result.posts.sort_by(Post::by_date);
    Ok(result)
}

fn scan_dir(dir: &Path, draft: bool, result: &mut Scan) -> Result<()> {
    for path in list_dir(dir)? {
        match Post::parse(path, draft) {
            Ok(post) => result.posts.push(post),
            Err(err) => result.skipped.push(err),
        }
    }
    Ok(())
}

/// Lists the entries of `dir`, sorted by name so scans are deterministic
pub(crate) fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry.context("Failed to read directory entry")?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}
