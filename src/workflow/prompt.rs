//! User interaction for disambiguation and confirmation

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::domain::{Post, ResolveError};

/// Asks the user to settle choices the tool cannot make alone
pub trait Prompt {
    /// Picks one of several posts matching `pattern`; returns its index
    fn choose(&mut self, pattern: &str, candidates: &[&Post]) -> Result<usize>;

    /// Asks a yes/no question
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Prompts on a reader/writer pair, normally stdin/stdout
pub struct Interactive<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Interactive<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("Failed to read from input")?;
        Ok(line)
    }
}

impl<R: BufRead, W: Write> Prompt for Interactive<R, W> {
    fn choose(&mut self, _pattern: &str, candidates: &[&Post]) -> Result<usize> {
        for (idx, post) in candidates.iter().enumerate() {
            writeln!(self.output, "[{}]\t{}", idx, post.title())?;
        }
        writeln!(self.output, "Select the post")?;
        self.output.flush()?;

        let line = self.read_line()?;
        let answer = line.trim();
        match answer.parse::<usize>() {
            Ok(idx) if idx < candidates.len() => Ok(idx),
            _ => Err(ResolveError::InvalidSelection(answer.to_string()).into()),
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        writeln!(self.output, "{} [y/N]", question)?;
        self.output.flush()?;

        let line = self.read_line()?;
        Ok(line.trim_start().to_lowercase().starts_with('y'))
    }
}

/// Never blocks: ambiguity and confirmation become errors
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

impl Prompt for NonInteractive {
    fn choose(&mut self, pattern: &str, candidates: &[&Post]) -> Result<usize> {
        Err(ResolveError::AmbiguousMatch {
            pattern: pattern.to_string(),
            candidates: candidates.iter().map(|p| p.title().to_string()).collect(),
        }
        .into())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        anyhow::bail!("{} (confirmation required; pass --yes to skip it)", question)
    }
}
