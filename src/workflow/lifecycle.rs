//! Post lifecycle transitions
//!
//! A post lives in one of two source states, `draft` or `published`.
//! `publish` moves a draft forward (there is no way back) and `delete`
//! removes a post from either state. All transitions act on files; callers
//! rescan to observe the new state.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use thiserror::Error;

use super::editor::Editor;
use super::prompt::Prompt;
use crate::domain::{make_filename, render_template, resolve, rewrite_date, Post, Resolution, ResolveError};
use crate::storage::Site;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{0} already exists")]
    AlreadyExists(PathBuf),
}

/// Resolves `pattern` among `posts`, asking `prompt` to break ties
pub fn select<'a>(posts: &'a [Post], pattern: &str, prompt: &mut dyn Prompt) -> Result<&'a Post> {
    match resolve(pattern, posts)? {
        Resolution::Found(post) => Ok(post),
        Resolution::Ambiguous(candidates) => {
            let idx = prompt.choose(pattern, &candidates)?;
            candidates
                .get(idx)
                .copied()
                .ok_or_else(|| ResolveError::InvalidSelection(idx.to_string()).into())
        }
    }
}

/// Writes a new draft from the front-matter template.
///
/// Fails with `AlreadyExists` rather than overwriting.
pub fn create_draft(site: &Site, title: &str, date: NaiveDateTime, extension: &str) -> Result<PathBuf> {
    let path = site.drafts_dir().join(make_filename(title, date, extension));
    if path.exists() {
        return Err(LifecycleError::AlreadyExists(path).into());
    }

    fs::write(&path, render_template(title, date))
        .with_context(|| format!("Failed to write draft: {}", path.display()))?;
    Ok(path)
}

/// Creates a draft and opens it in the editor
pub fn new_post(
    site: &Site,
    title: &str,
    date: NaiveDateTime,
    extension: &str,
    editor: &dyn Editor,
) -> Result<PathBuf> {
    let path = create_draft(site, title, date, extension)?;
    editor.open(&path)?;
    Ok(path)
}

/// A completed publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub title: String,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Moves the draft matching `pattern` into the published directory.
///
/// Only drafts take part in matching. The new file name keeps the title and
/// extension but carries `date`, and the front-matter `date:` line is set
/// to `date`. The draft is removed once the published copy is written.
pub fn publish(
    site: &Site,
    posts: &[Post],
    pattern: &str,
    date: NaiveDateTime,
    prompt: &mut dyn Prompt,
) -> Result<Published> {
    let drafts: Vec<Post> = posts.iter().filter(|p| p.is_draft()).cloned().collect();
    let post = select(&drafts, pattern, prompt)?;
    publish_post(site, post, date)
}

/// Publishes an already-selected draft
pub fn publish_post(site: &Site, post: &Post, date: NaiveDateTime) -> Result<Published> {
    let target = site
        .published_dir()
        .join(make_filename(post.title(), date, &post.extension()));
    if target.exists() {
        return Err(LifecycleError::AlreadyExists(target).into());
    }

    let content = fs::read_to_string(post.path())
        .with_context(|| format!("Failed to read draft: {}", post.path().display()))?;
    fs::write(&target, rewrite_date(&content, date))
        .with_context(|| format!("Failed to write post: {}", target.display()))?;
    fs::remove_file(post.path())
        .with_context(|| format!("Failed to remove draft: {}", post.path().display()))?;

    Ok(Published {
        title: post.title().to_string(),
        from: post.path().to_path_buf(),
        to: target,
    })
}

/// Outcome of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    Deleted(Post),
    Kept(Post),
}

/// Removes the post matching `pattern` after confirmation.
///
/// `assume_yes` skips the confirmation question.
pub fn delete(posts: &[Post], pattern: &str, prompt: &mut dyn Prompt, assume_yes: bool) -> Result<Deletion> {
    let post = select(posts, pattern, prompt)?;

    if !assume_yes && !prompt.confirm(&format!("Really delete {}?", post.title()))? {
        return Ok(Deletion::Kept(post.clone()));
    }

    fs::remove_file(post.path())
        .with_context(|| format!("Failed to remove post: {}", post.path().display()))?;
    Ok(Deletion::Deleted(post.clone()))
}

/// Opens the post matching `pattern` (or the most recent one) in the editor
pub fn edit(posts: &[Post], pattern: &str, editor: &dyn Editor, prompt: &mut dyn Prompt) -> Result<Post> {
    let post = select(posts, pattern, prompt)?;
    editor.open(post.path())?;
    Ok(post.clone())
}
