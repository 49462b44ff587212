//! Blog CLI - A content manager for static-site blogs
//!
//! Posts move through three places: drafts, published posts, and the
//! staging directory handed to the site generator. This crate creates,
//! lists, edits, publishes and deletes posts, and keeps the staging
//! directory in sync with the two source directories.

pub mod domain;
pub mod storage;
pub mod workflow;
pub mod cli;

pub use domain::{Post, PostError};
pub use storage::{Config, Site};
