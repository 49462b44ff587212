//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `new` | Create a draft from the front-matter template and open it |
//! | `publish` | Move a draft to `_published/` with a new date |
//! | `ls` | List drafts and published posts by date |
//! | `edit` | Open a post (the most recent one by default) |
//! | `rm` | Delete a post after confirmation |
//! | `generate` | Rebuild `_posts/`, optionally keep it in sync |
//! | `upload` | Run the configured upload command |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod posts;
mod generate;

pub use app::{run, Cli, Commands, Context};
pub use output::{Output, OutputFormat};
