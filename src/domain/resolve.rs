//! Resolving a user-supplied title pattern to a post

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use super::post::Post;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No posts matching '{0}'")]
    NoMatch(String),

    #[error("'{pattern}' matches {} posts: {}", .candidates.len(), .candidates.join(", "))]
    AmbiguousMatch {
        pattern: String,
        candidates: Vec<String>,
    },

    #[error("Invalid selection '{0}'")]
    InvalidSelection(String),
}

/// Outcome of matching a pattern against a post collection
#[derive(Debug)]
pub enum Resolution<'a> {
    /// Exactly one post matched (or the pattern was empty)
    Found(&'a Post),
    /// Several posts matched; the caller must pick one
    Ambiguous(Vec<&'a Post>),
}

/// Compiles `pattern` as a case-insensitive regex, falling back to a
/// literal match when it is not valid regex syntax
fn matcher(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
        })
        .unwrap_or_else(|_| Regex::new("$^").expect("valid empty regex"))
}

/// Matches `pattern` against post titles.
///
/// `posts` must be sorted by date. An empty or whitespace-only pattern
/// selects the most recent post.
pub fn resolve<'a>(pattern: &str, posts: &'a [Post]) -> Result<Resolution<'a>, ResolveError> {
    if pattern.trim().is_empty() {
        return posts
            .iter()
            .max_by(|a, b| Post::by_date(a, b))
            .map(Resolution::Found)
            .ok_or_else(|| ResolveError::NoMatch(pattern.to_string()));
    }

    let re = matcher(pattern);
    let mut matches: Vec<&Post> = posts.iter().filter(|p| re.is_match(p.title())).collect();

    match matches.len() {
        0 => Err(ResolveError::NoMatch(pattern.to_string())),
        1 => Ok(Resolution::Found(matches.remove(0))),
        _ => Ok(Resolution::Ambiguous(matches)),
    }
}

impl<'a> Resolution<'a> {
    /// Returns the single post, or `AmbiguousMatch` listing the candidates
    pub fn into_single(self, pattern: &str) -> Result<&'a Post, ResolveError> {
        match self {
            Resolution::Found(post) => Ok(post),
            Resolution::Ambiguous(candidates) => Err(ResolveError::AmbiguousMatch {
                pattern: pattern.to_string(),
                candidates: candidates.iter().map(|p| p.title().to_string()).collect(),
            }),
        }
    }
}
