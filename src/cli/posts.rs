//! Post CLI commands

use anyhow::Result;
use chrono::NaiveDateTime;

use super::app::Context;
use crate::domain::{Post, DAY_FORMAT};
use crate::storage::{scan, Scope};
use crate::workflow::{self, Deletion, ShellEditor};

/// Scans `scope`, warning about every file that had to be skipped
fn load_posts(ctx: &Context, scope: Scope) -> Result<Vec<Post>> {
    let scan = scan(&ctx.site, scope)?;
    for err in &scan.skipped {
        ctx.output.warn(&format!("{}, ignoring", err));
    }
    ctx.output
        .verbose_ctx("scan", &format!("{:?}: {} posts, {} skipped", scope, scan.posts.len(), scan.skipped.len()));
    Ok(scan.posts)
}

fn post_json(post: &Post) -> serde_json::Value {
    serde_json::json!({
        "title": post.title(),
        "date": post.date().format(crate::domain::DATE_FORMAT).to_string(),
        "draft": post.is_draft(),
        "path": post.path().display().to_string(),
    })
}

pub fn new(ctx: &Context, title: &str, date: NaiveDateTime) -> Result<()> {
    let editor = ShellEditor::new(ctx.config.editor.as_str());
    ctx.output
        .verbose_ctx("new", &format!("Creating '{}' with editor '{}'", title, ctx.config.editor));

    let path = workflow::new_post(&ctx.site, title, date, &ctx.config.extension, &editor)?;

    if ctx.output.is_json() {
        ctx.output.data(&serde_json::json!({
            "title": title,
            "path": path.display().to_string(),
        }));
    } else {
        ctx.output.success(&format!("Created a new draft: {}", path.display()));
    }

    Ok(())
}

pub fn publish(ctx: &Context, pattern: &str, date: NaiveDateTime) -> Result<()> {
    let posts = load_posts(ctx, Scope::Drafts)?;
    let mut prompt = ctx.prompt();

    let published = workflow::publish(&ctx.site, &posts, pattern, date, prompt.as_mut())?;

    if ctx.output.is_json() {
        ctx.output.data(&serde_json::json!({
            "title": published.title,
            "from": published.from.display().to_string(),
            "to": published.to.display().to_string(),
        }));
    } else {
        ctx.output
            .success(&format!("Publishing {} in {}", published.title, published.to.display()));
    }

    Ok(())
}

pub fn list(ctx: &Context, drafts_only: bool, published_only: bool) -> Result<()> {
    let scope = match (drafts_only, published_only) {
        (true, _) => Scope::Drafts,
        (_, true) => Scope::Published,
        _ => Scope::All,
    };
    let posts = load_posts(ctx, scope)?;

    if ctx.output.is_json() {
        let items: Vec<_> = posts.iter().map(post_json).collect();
        ctx.output.data(&items);
        return Ok(());
    }

    for post in &posts {
        let line = format!("{} {}", post.date().format(DAY_FORMAT), post.title());
        if post.is_draft() {
            ctx.output.highlight(&line);
        } else {
            ctx.output.info(&line);
        }
    }
    ctx.output.info(&format!("{} posts", posts.len()));

    Ok(())
}

pub fn edit(ctx: &Context, pattern: &str) -> Result<()> {
    let posts = load_posts(ctx, Scope::All)?;
    let editor = ShellEditor::new(ctx.config.editor.as_str());
    let mut prompt = ctx.prompt();

    let post = workflow::edit(&posts, pattern, &editor, prompt.as_mut())?;
    ctx.output.verbose_ctx("edit", &format!("Edited {}", post.path().display()));

    Ok(())
}

pub fn remove(ctx: &Context, pattern: &str, yes: bool) -> Result<()> {
    let posts = load_posts(ctx, Scope::All)?;
    let mut prompt = ctx.prompt();

    match workflow::delete(&posts, pattern, prompt.as_mut(), yes)? {
        Deletion::Deleted(post) => {
            if ctx.output.is_json() {
                ctx.output.data(&serde_json::json!({ "deleted": post_json(&post) }));
            } else {
                ctx.output.success(&format!("Deleted {}", post.title()));
            }
        }
        Deletion::Kept(post) => {
            if ctx.output.is_json() {
                ctx.output.data(&serde_json::json!({ "kept": post_json(&post) }));
            } else {
                ctx.output.info(&format!("Kept {}", post.title()));
            }
        }
    }

    Ok(())
}
