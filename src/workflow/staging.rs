//! Staging synchronizer
//!
//! `_posts/` is a disposable mirror of the source directories that the site
//! generator reads. [`Stager::rebuild`] recreates it from scratch;
//! [`Stager::watch`] then polls the sources and re-stages whatever changed.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

use crate::storage::{list_dir, Site};

/// Default delay between two polls in auto mode
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Shared flag used to stop [`Stager::watch`] from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation and wakes any waiter
    pub fn cancel(&self) {
        let (flag, cvar) = &*self.inner;
        let mut cancelled = flag.lock().unwrap_or_else(|e| e.into_inner());
        *cancelled = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleeps for up to `timeout`; returns true if cancelled meanwhile
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, cvar) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(|e| e.into_inner());
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(|e| e.into_inner());
        *guard
    }
}

/// One change applied to the staging directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A source file was copied in
    Updated(String),
    /// A staged file without a source was removed
    Removed(String),
    /// A file could not be synchronized
    Failed { name: String, error: String },
}

/// Changes made by a rebuild or a poll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub events: Vec<SyncEvent>,
}

impl SyncReport {
    pub fn copied(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            SyncEvent::Updated(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            SyncEvent::Removed(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Keeps the staging directory in line with the source directories
#[derive(Debug, Clone)]
pub struct Stager {
    staged: PathBuf,
    sources: Vec<PathBuf>,
}

impl Stager {
    /// Stages published posts, plus drafts when `include_drafts` is set.
    ///
    /// Drafts are copied after published posts, so a draft wins over a
    /// published file with the same name.
    pub fn new(site: &Site, include_drafts: bool) -> Self {
        let mut sources = vec![site.published_dir()];
        if include_drafts {
            sources.push(site.drafts_dir());
        }
        Self {
            staged: site.staged_dir(),
            sources,
        }
    }

    pub fn staged_dir(&self) -> &Path {
        &self.staged
    }

    /// Regular files in `dir`
    fn files(dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(list_dir(dir)?.into_iter().filter(|p| p.is_file()).collect())
    }

    fn copy_in(&self, source: &Path) -> Result<String> {
        let name = file_name(source);
        let target = self.staged.join(&name);
        fs::copy(source, &target).with_context(|| {
            format!("Failed to copy {} to {}", source.display(), target.display())
        })?;
        Ok(name)
    }

    /// Empties the staging directory and copies every source file into it
    pub fn rebuild(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for path in Self::files(&self.staged)? {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove staged file: {}", path.display()))?;
            report.events.push(SyncEvent::Removed(file_name(&path)));
        }

        for dir in &self.sources {
            for path in Self::files(dir)? {
                let name = self.copy_in(&path)?;
                report.events.push(SyncEvent::Updated(name));
            }
        }

        Ok(report)
    }

    /// Copies source files modified strictly after `since`, then removes
    /// staged files whose source is gone.
    ///
    /// Sources are visited last to first so that, as in [`Stager::rebuild`],
    /// a draft shadows a published file with the same name. Per-file
    /// failures are recorded in the report and do not stop the poll.
    pub fn poll(&self, since: SystemTime) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let mut present = HashSet::new();

        for dir in self.sources.iter().rev() {
            for path in Self::files(dir)? {
                if !present.insert(file_name(&path)) {
                    continue;
                }

                let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
                    Ok(t) => t,
                    Err(e) => {
                        report.events.push(SyncEvent::Failed {
                            name: file_name(&path),
                            error: e.to_string(),
                        });
                        continue;
                    }
                };
                if modified <= since {
                    continue;
                }

                match self.copy_in(&path) {
                    Ok(name) => report.events.push(SyncEvent::Updated(name)),
                    Err(e) => report.events.push(SyncEvent::Failed {
                        name: file_name(&path),
                        error: format!("{:#}", e),
                    }),
                }
            }
        }

        for path in Self::files(&self.staged)? {
            let name = file_name(&path);
            if present.contains(&name) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => report.events.push(SyncEvent::Removed(name)),
                Err(e) => report.events.push(SyncEvent::Failed {
                    name,
                    error: e.to_string(),
                }),
            }
        }

        Ok(report)
    }

    /// Polls every `interval` until `cancel` fires.
    ///
    /// `since` is the instant the last full sync started. Each poll covers
    /// changes made after the previous poll began, so edits landing during a
    /// poll are picked up by the next one. A failing poll is reported through
    /// `on_event` and the loop carries on.
    pub fn watch(
        &self,
        since: SystemTime,
        interval: Duration,
        cancel: &CancelToken,
        mut on_event: impl FnMut(&SyncEvent),
    ) -> Result<()> {
        let mut since = since;

        while !cancel.wait_timeout(interval) {
            let started = SystemTime::now();
            match self.poll(since) {
                Ok(report) => report.events.iter().for_each(&mut on_event),
                Err(e) => on_event(&SyncEvent::Failed {
                    name: file_name(&self.staged),
                    error: format!("{:#}", e),
                }),
            }
            since = started;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::thread;
    use std::time::Instant;
    use tempfile::TempDir;

    fn site() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let (site, _) = Site::open(dir.path()).unwrap();
        (dir, site)
    }

    fn staged_files(site: &Site) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(site.staged_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn rebuild_replaces_staged_contents() {
        let (_dir, site) = site();
        fs::write(site.staged_dir().join("stale.md"), "old").unwrap();
        fs::write(site.published_dir().join("p.md"), "published").unwrap();
        fs::write(site.drafts_dir().join("d.md"), "draft").unwrap();

        let report = Stager::new(&site, true).rebuild().unwrap();

        assert_eq!(staged_files(&site), vec!["d.md", "p.md"]);
        assert_eq!(report.removed().collect::<Vec<_>>(), vec!["stale.md"]);
        assert_eq!(report.copied().count(), 2);
    }

    #[test]
    fn rebuild_without_drafts() {
        let (_dir, site) = site();
        fs::write(site.published_dir().join("p.md"), "published").unwrap();
        fs::write(site.drafts_dir().join("d.md"), "draft").unwrap();

        Stager::new(&site, false).rebuild().unwrap();
        assert_eq!(staged_files(&site), vec!["p.md"]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let (_dir, site) = site();
        fs::write(site.published_dir().join("p.md"), "published").unwrap();
        fs::write(site.drafts_dir().join("d.md"), "draft").unwrap();
        let stager = Stager::new(&site, true);

        stager.rebuild().unwrap();
        let first: Vec<_> = staged_files(&site)
            .into_iter()
            .map(|n| (n.clone(), fs::read(site.staged_dir().join(&n)).unwrap()))
            .collect();

        stager.rebuild().unwrap();
        let second: Vec<_> = staged_files(&site)
            .into_iter()
            .map(|n| (n.clone(), fs::read(site.staged_dir().join(&n)).unwrap()))
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn rebuild_leaves_subdirectories_alone() {
        let (_dir, site) = site();
        fs::create_dir(site.staged_dir().join("assets")).unwrap();
        fs::create_dir(site.published_dir().join("images")).unwrap();

        Stager::new(&site, true).rebuild().unwrap();
        assert_eq!(staged_files(&site), vec!["assets"]);
    }

    #[test]
    fn poll_copies_only_newer_files() {
        let (_dir, site) = site();
        let old = site.published_dir().join("old.md");
        let new = site.drafts_dir().join("new.md");
        fs::write(&old, "old").unwrap();
        fs::write(&new, "new").unwrap();

        let stager = Stager::new(&site, true);
        stager.rebuild().unwrap();
        fs::write(site.staged_dir().join("old.md"), "staged copy").unwrap();

        let checkpoint = SystemTime::now() - Duration::from_secs(60);
        set_mtime(&old, checkpoint - Duration::from_secs(60));
        fs::write(&new, "newer").unwrap();

        let report = stager.poll(checkpoint).unwrap();

        assert_eq!(report.copied().collect::<Vec<_>>(), vec!["new.md"]);
        assert_eq!(fs::read_to_string(site.staged_dir().join("new.md")).unwrap(), "newer");
        assert_eq!(fs::read_to_string(site.staged_dir().join("old.md")).unwrap(), "staged copy");
    }

    #[test]
    fn poll_keeps_draft_over_published_twin() {
        let (_dir, site) = site();
        let published = site.published_dir().join("x.md");
        fs::write(&published, "published").unwrap();
        fs::write(site.drafts_dir().join("x.md"), "draft").unwrap();

        let stager = Stager::new(&site, true);
        stager.rebuild().unwrap();
        assert_eq!(fs::read_to_string(site.staged_dir().join("x.md")).unwrap(), "draft");

        let checkpoint = SystemTime::now() - Duration::from_secs(60);
        set_mtime(&site.drafts_dir().join("x.md"), checkpoint - Duration::from_secs(60));
        fs::write(&published, "published v2").unwrap();

        let report = stager.poll(checkpoint).unwrap();

        assert!(report.is_empty());
        assert_eq!(fs::read_to_string(site.staged_dir().join("x.md")).unwrap(), "draft");
    }

    #[test]
    fn poll_stages_published_twin_when_drafts_excluded() {
        let (_dir, site) = site();
        fs::write(site.published_dir().join("x.md"), "published").unwrap();
        fs::write(site.drafts_dir().join("x.md"), "draft").unwrap();

        let report = Stager::new(&site, false).poll(SystemTime::UNIX_EPOCH).unwrap();

        assert_eq!(report.copied().collect::<Vec<_>>(), vec!["x.md"]);
        assert_eq!(fs::read_to_string(site.staged_dir().join("x.md")).unwrap(), "published");
    }

    #[test]
    fn poll_reports_failed_copy_and_carries_on() {
        let (_dir, site) = site();
        fs::write(site.published_dir().join("a.md"), "a").unwrap();
        fs::write(site.published_dir().join("b.md"), "b").unwrap();
        fs::create_dir(site.staged_dir().join("a.md")).unwrap();

        let report = Stager::new(&site, false).poll(SystemTime::UNIX_EPOCH).unwrap();

        assert!(matches!(
            report.events.as_slice(),
            [SyncEvent::Failed { name, .. }, SyncEvent::Updated(copied)]
                if name == "a.md" && copied == "b.md"
        ));
        assert_eq!(fs::read_to_string(site.staged_dir().join("b.md")).unwrap(), "b");
        assert!(site.staged_dir().join("a.md").is_dir());
    }

    #[test]
    fn poll_ignores_drafts_when_excluded() {
        let (_dir, site) = site();
        fs::write(site.drafts_dir().join("d.md"), "draft").unwrap();

        let report = Stager::new(&site, false)
            .poll(SystemTime::UNIX_EPOCH)
            .unwrap();

        assert!(report.is_empty());
        assert!(staged_files(&site).is_empty());
    }

    #[test]
    fn poll_propagates_deletions() {
        let (_dir, site) = site();
        let source = site.published_dir().join("gone.md");
        fs::write(&source, "soon gone").unwrap();

        let stager = Stager::new(&site, false);
        stager.rebuild().unwrap();
        fs::remove_file(&source).unwrap();

        let report = stager.poll(SystemTime::now()).unwrap();
        assert_eq!(report.removed().collect::<Vec<_>>(), vec!["gone.md"]);
        assert!(staged_files(&site).is_empty());
    }

    #[test]
    fn poll_with_nothing_changed() {
        let (_dir, site) = site();
        fs::write(site.published_dir().join("p.md"), "published").unwrap();
        let stager = Stager::new(&site, false);
        stager.rebuild().unwrap();

        let later = SystemTime::now() + Duration::from_secs(60);
        assert!(stager.poll(later).unwrap().is_empty());
    }

    #[test]
    fn cancel_token_wakes_waiter() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert!(!token.wait_timeout(Duration::from_millis(1)));

        let remote = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let start = Instant::now();
        assert!(token.wait_timeout(Duration::from_secs(30)));
        assert!(start.elapsed() < Duration::from_secs(10));
        handle.join().unwrap();
    }

    #[test]
    fn watch_stops_immediately_when_cancelled() {
        let (_dir, site) = site();
        let token = CancelToken::new();
        token.cancel();

        let mut events = Vec::new();
        Stager::new(&site, true)
            .watch(SystemTime::now(), Duration::from_secs(60), &token, |e| events.push(e.clone()))
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn watch_stages_new_files_until_cancelled() {
        let (_dir, site) = site();
        let stager = Stager::new(&site, true);
        let started = SystemTime::now();
        stager.rebuild().unwrap();

        let token = CancelToken::new();
        let remote = token.clone();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let watcher = thread::spawn(move || {
            stager.watch(started, Duration::from_millis(20), &remote, |e| {
                sink.lock().unwrap().push(e.clone());
            })
        });

        fs::write(site.drafts_dir().join("fresh.md"), "hello").unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        while !site.staged_dir().join("fresh.md").exists() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        token.cancel();
        watcher.join().unwrap().unwrap();

        assert_eq!(fs::read_to_string(site.staged_dir().join("fresh.md")).unwrap(), "hello");
        assert!(events
            .lock()
            .unwrap()
            .contains(&SyncEvent::Updated("fresh.md".to_string())));
    }

    #[test]
    fn watch_keeps_polling_after_a_failure() {
        let (_dir, site) = site();
        let stager = Stager::new(&site, false);
        let started = SystemTime::now() - Duration::from_secs(60);
        fs::write(site.published_dir().join("a.md"), "a").unwrap();
        fs::create_dir(site.staged_dir().join("a.md")).unwrap();

        let token = CancelToken::new();
        let remote = token.clone();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let watcher = thread::spawn(move || {
            stager.watch(started, Duration::from_millis(20), &remote, |e| {
                sink.lock().unwrap().push(e.clone());
            })
        });

        let failed = |events: &Arc<Mutex<Vec<SyncEvent>>>| {
            events
                .lock()
                .unwrap()
                .iter()
                .any(|e| matches!(e, SyncEvent::Failed { name, .. } if name == "a.md"))
        };
        let deadline = Instant::now() + Duration::from_secs(10);
        while !failed(&events) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(failed(&events));

        fs::write(site.published_dir().join("b.md"), "b").unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        while !site.staged_dir().join("b.md").exists() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        token.cancel();
        watcher.join().unwrap().unwrap();

        assert_eq!(fs::read_to_string(site.staged_dir().join("b.md")).unwrap(), "b");
        assert!(events
            .lock()
            .unwrap()
            .contains(&SyncEvent::Updated("b.md".to_string())));
    }
}
