//! # Storage Layer
//!
//! Everything that touches the filesystem layout of a blog.
//!
//! ## Layout
//!
//! | Directory | Contents | Owner |
//! |-----------|----------|-------|
//! | `_drafts/` | Unpublished posts | user |
//! | `_published/` | Published posts | user |
//! | `_posts/` | Staged copy read by the site generator | this tool |
//!
//! No other metadata is persisted: posts are rebuilt by [`scan`] on every
//! invocation.
//!
//! ## Key Types
//!
//! - [`Config`] - Resolved configuration (file + command-line overrides)
//! - [`Site`] - The base directory and its post directories
//! - [`Scan`] - Posts found by a scan, plus the files that were skipped

mod config;
mod site;
mod repository;

pub use config::{Config, ConfigError, FileConfig, Overrides, DEFAULT_EDITOR, DEFAULT_EXTENSION};
pub use site::{Site, SiteError, DRAFTS_DIR, PUBLISHED_DIR, STAGED_DIR};
pub use repository::{scan, Scan, Scope};
pub(crate) use repository::list_dir;
