//! Line-oriented front-matter handling
//!
//! Not a YAML parser: new drafts get a fixed template,
//! and publishing rewrites a single `date:` line while copying every other
//! line byte for byte.

use chrono::NaiveDateTime;

use super::post::DATE_FORMAT;

const DELIMITER: &str = "---";

/// Renders the front matter written into a freshly created draft
pub fn render_template(title: &str, date: NaiveDateTime) -> String {
    format!(
        "{DELIMITER}\ntitle: \"{}\"\nlayout: post\ndate: {}\n{DELIMITER}\n\n",
        title,
        date.format(DATE_FORMAT)
    )
}

/// Position of the rewriter within the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the opening `---`
    BeforeFrontMatter,
    /// Between the delimiters, no `date:` line seen yet
    InFrontMatter,
    /// Date handled; remaining lines pass through
    Body,
}

/// Terminator for an emitted `date:` line, following the style of `line`
fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Sets the front-matter date of `content` to `date`.
///
/// The first `date:` line inside the front matter is replaced. If the front
/// matter has none, a `date:` line is inserted just before the closing
/// delimiter. Content without front matter is returned unchanged.
pub fn rewrite_date(content: &str, date: NaiveDateTime) -> String {
    let date_line = format!("date: {}", date.format(DATE_FORMAT));
    let mut out = String::with_capacity(content.len() + date_line.len() + 2);
    let mut state = State::BeforeFrontMatter;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        state = match state {
            State::BeforeFrontMatter => {
                out.push_str(line);
                if trimmed == DELIMITER {
                    State::InFrontMatter
                } else {
                    State::BeforeFrontMatter
                }
            }
            State::InFrontMatter if trimmed.starts_with("date:") => {
                out.push_str(&date_line);
                out.push_str(line_ending(line));
                State::Body
            }
            State::InFrontMatter if trimmed == DELIMITER => {
                out.push_str(&date_line);
                out.push_str(line_ending(line));
                out.push_str(line);
                State::Body
            }
            State::InFrontMatter => {
                out.push_str(line);
                State::InFrontMatter
            }
            State::Body => {
                out.push_str(line);
                State::Body
            }
        };
    }

    out
}
