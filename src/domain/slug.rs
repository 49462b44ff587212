//! Slugs and canonical post file names

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::post::DAY_FORMAT;

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\W+").expect("valid slug regex"))
}

/// Turns a title into a lowercase, hyphen-separated slug.
///
/// Every run of non-word characters becomes a single hyphen; word
/// characters (letters, digits, underscore) are kept as-is.
pub fn slugify(title: &str) -> String {
    non_word_re()
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

/// Builds `<YYYY-MM-DD>-<slug><extension>`
pub fn make_filename(title: &str, date: NaiveDateTime, extension: &str) -> String {
    format!("{}-{}{}", date.format(DAY_FORMAT), slugify(title), extension)
}
