//! # Post Workflow
//!
//! The operations a user runs against a [`Site`](crate::storage::Site):
//! lifecycle transitions between the draft and published states, and the
//! staging synchronizer that feeds the site generator.
//!
//! ## State Machine
//!
//! ```text
//!   new ──► draft ──publish──► published
//!             │                   │
//!             └──────delete───────┴──► (gone)
//! ```
//!
//! Collaborators that reach outside the process (the editor, the user at a
//! terminal) sit behind the [`Editor`] and [`Prompt`] traits.

mod editor;
mod prompt;
mod lifecycle;
mod staging;
mod upload;

pub use editor::{Editor, ShellEditor};
pub use prompt::{Interactive, NonInteractive, Prompt};
pub use lifecycle::{
    create_draft, delete, edit, new_post, publish, publish_post, select, Deletion, LifecycleError,
    Published,
};
pub use staging::{CancelToken, Stager, SyncEvent, SyncReport, POLL_INTERVAL};
pub use upload::{upload, upload_command, SITE_PLACEHOLDER};
