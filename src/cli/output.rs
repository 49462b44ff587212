//! User-facing output
//!
//! Every line the CLI prints goes through [`Output`]. Text mode is meant for
//! terminals; JSON mode prints one JSON document per line on stdout, with
//! warnings as JSON objects on stderr. Interactive prompts write to stderr
//! so stdout stays parseable.

use serde::Serialize;
use serde_json::json;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Drafts are listed in green
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Renders messages and data in the selected format
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Reports a completed action
    pub fn success(&self, message: &str) {
        if self.is_json() {
            println!("{}", json!({ "success": true, "message": message }));
        } else {
            println!("{}", message);
        }
    }

    /// Progress or listing line; dropped in JSON mode
    pub fn info(&self, message: &str) {
        if !self.is_json() {
            println!("{}", message);
        }
    }

    /// Same as [`Output::info`], in green
    pub fn highlight(&self, message: &str) {
        if !self.is_json() {
            println!("{}{}{}", GREEN, message, RESET);
        }
    }

    /// Non-fatal problem, on stderr
    pub fn warn(&self, message: &str) {
        if self.is_json() {
            eprintln!("{}", json!({ "warning": message }));
        } else {
            eprintln!("warning: {}", message);
        }
    }

    /// Structured result, as one line of JSON
    pub fn data<T: Serialize>(&self, data: &T) {
        if let Ok(rendered) = serde_json::to_string(data) {
            println!("{}", rendered);
        }
    }

    /// Debug line, shown with `--verbose`
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Debug line tagged with the component it comes from
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
