//! Staging and upload CLI commands

use std::time::{Duration, SystemTime};

use anyhow::Result;

use super::app::Context;
use crate::workflow::{self, CancelToken, Stager, SyncEvent};

pub fn generate(ctx: &Context, include_drafts: bool, auto: bool, interval: u64) -> Result<()> {
    let stager = Stager::new(&ctx.site, include_drafts);
    let started = SystemTime::now();

    let report = stager.rebuild()?;
    let staged = report.copied().count();
    ctx.output.verbose_ctx(
        "generate",
        &format!("Removed {} stale files, copied {}", report.removed().count(), staged),
    );

    if ctx.output.is_json() {
        ctx.output.data(&serde_json::json!({
            "staged": staged,
            "drafts": include_drafts,
            "dir": stager.staged_dir().display().to_string(),
        }));
    } else {
        ctx.output
            .success(&format!("Staged {} files in {}", staged, stager.staged_dir().display()));
    }

    if !auto {
        return Ok(());
    }

    ctx.output.info("Watching for changes (press Ctrl-C to stop)");

    // Nothing cancels this token: auto mode runs until the process is interrupted.
    let cancel = CancelToken::new();
    stager.watch(started, Duration::from_secs(interval), &cancel, |event| match event {
        SyncEvent::Updated(name) => ctx.output.success(&format!("Updating {}", name)),
        SyncEvent::Removed(name) => ctx.output.success(&format!("Removing {}", name)),
        SyncEvent::Failed { name, error } => {
            ctx.output.warn(&format!("Could not sync {}: {}", name, error))
        }
    })
}

pub fn upload(ctx: &Context) -> Result<()> {
    let template = ctx.config.require_upload_cmd()?;
    let site_dir = ctx.site.staged_dir();
    ctx.output
        .verbose_ctx("upload", &format!("Running '{}' for {}", template, site_dir.display()));

    workflow::upload(template, &site_dir)?;
    ctx.output.success(&format!("Uploaded {}", site_dir.display()));

    Ok(())
}
