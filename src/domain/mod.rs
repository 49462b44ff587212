//! Domain models for the blog manager
//!
//! Contains the post model and the pure rules around it (file naming,
//! front-matter rewriting, title resolution) without any I/O concerns
//! beyond reading a single post file.

mod post;
mod slug;
mod frontmatter;
mod resolve;

pub use post::{parse_date, Post, PostError, DATE_FORMAT, DAY_FORMAT};
pub use slug::{make_filename, slugify};
pub use frontmatter::{render_template, rewrite_date};
pub use resolve::{resolve, Resolution, ResolveError};
