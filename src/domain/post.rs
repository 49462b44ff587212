//! Post domain model
//!
//! A post is a text file with a small front-matter block. Only the title
//! and the date are extracted; everything else in the file is opaque.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Format used for `date:` lines and the `--date` flag
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format of the date prefix in post file names
pub const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum PostError {
    #[error("Could not open {0}")]
    NotFound(PathBuf),

    #[error("Could not find title in {0}")]
    MissingTitle(PathBuf),

    #[error("Could not find date in {0}")]
    MissingDate(PathBuf),
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^title: (.*?)\r?$").expect("valid title regex"))
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^date: (.*?)\r?$").expect("valid date regex"))
}

fn file_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})").expect("valid file date regex"))
}

/// Parses a `date:` value.
///
/// Accepts `YYYY-MM-DD HH:MM`, the same with seconds, or a bare day
/// (midnight).
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, DAY_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Drops one optional pair of surrounding double quotes; inner quotes stay
fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

/// Extracts the date from a `YYYY-MM-DD-...` file name
fn date_from_file_name(path: &Path) -> Option<NaiveDateTime> {
    let name = path.file_name()?.to_str()?;
    let day = file_date_re().captures(name)?.get(1)?.as_str();
    NaiveDate::parse_from_str(day, DAY_FORMAT)
        .ok()?
        .and_hms_opt(0, 0, 0)
}

/// A single blog post, as found on disk.
///
/// Values are immutable: lifecycle transitions act on the backing file and
/// the post is simply rescanned afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    path: PathBuf,
    title: String,
    date: NaiveDateTime,
    draft: bool,
}

impl Post {
    /// Reads and parses the post stored at `path`
    pub fn parse(path: impl Into<PathBuf>, draft: bool) -> Result<Self, PostError> {
        let path = path.into();
        if !path.is_file() {
            return Err(PostError::NotFound(path));
        }
        let bytes = fs::read(&path).map_err(|_| PostError::NotFound(path.clone()))?;
        let content = String::from_utf8_lossy(&bytes);
        Self::from_content(path, &content, draft)
    }

    /// Builds a post from already-loaded file content
    pub fn from_content(path: impl Into<PathBuf>, content: &str, draft: bool) -> Result<Self, PostError> {
        let path = path.into();

        let title = match title_re().captures(content).and_then(|c| c.get(1)) {
            Some(m) => unquote(m.as_str()).to_string(),
            None => return Err(PostError::MissingTitle(path)),
        };

        let date = date_re()
            .captures(content)
            .and_then(|c| c.get(1))
            .and_then(|m| parse_date(m.as_str()))
            .or_else(|| date_from_file_name(&path));

        match date {
            Some(date) => Ok(Self { path, title, date, draft }),
            None => Err(PostError::MissingDate(path)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    /// Returns true if the post was scanned from the drafts directory
    pub fn is_draft(&self) -> bool {
        self.draft
    }

    /// Returns the file extension including the leading dot, or an empty string
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Orders posts by date alone.
    ///
    /// Title and draft flag do not take part, so a stable sort keeps the
    /// incoming order of posts sharing a date.
    pub fn by_date(a: &Post, b: &Post) -> Ordering {
        a.date.cmp(&b.date)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date.format(DATE_FORMAT), self.title)?;
        if self.draft {
            write!(f, " DRAFT")?;
        }
        Ok(())
    }
}
