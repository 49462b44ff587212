//! Main CLI application structure

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDateTime, Timelike};
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{generate, posts};
use crate::domain::parse_date;
use crate::storage::{Config, Overrides, Site};
use crate::workflow::{Interactive, NonInteractive, Prompt, POLL_INTERVAL};

#[derive(Parser)]
#[command(name = "blog")]
#[command(author, version, about = "Command-line tool for managing a static-site blog")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH", env = "BLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to your blog (default: .)
    #[arg(long, global = true, value_name = "PATH")]
    pub base_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Never wait for input; ambiguous titles become errors
    #[arg(long, global = true)]
    pub no_input: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new draft
    New {
        /// The new post's title
        #[arg(required = true)]
        title: Vec<String>,

        /// Command used to launch an editor for the post
        #[arg(long)]
        editor: Option<String>,

        /// Date and time for the post, "YEAR-MONTH-DAY HOUR:MINUTE" (default: now)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDateTime>,

        /// File extension (default: .md)
        #[arg(long)]
        extension: Option<String>,
    },

    /// Publish a draft
    Publish {
        /// A pattern matching the draft's title
        #[arg(required = true)]
        title: Vec<String>,

        /// Publication date, "YEAR-MONTH-DAY HOUR:MINUTE" (default: now)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDateTime>,
    },

    /// List posts
    Ls {
        /// Show only drafts
        #[arg(long, conflicts_with = "published")]
        drafts: bool,

        /// Show only published posts
        #[arg(long)]
        published: bool,
    },

    /// Edit a post
    Edit {
        /// A pattern matching the post's title; edits the most recent post if omitted
        title: Vec<String>,

        /// Command used to launch an editor for the post
        #[arg(long)]
        editor: Option<String>,
    },

    /// Delete a post
    Rm {
        /// A pattern matching the post's title
        #[arg(required = true)]
        title: Vec<String>,

        /// Delete without asking for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Stage posts for the site generator
    Generate {
        /// Only stage published posts
        #[arg(long)]
        published: bool,

        /// Wait for changes and re-stage them
        #[arg(long)]
        auto: bool,

        /// Seconds between two checks in auto mode
        #[arg(long, default_value_t = POLL_INTERVAL.as_secs(), value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
    },

    /// Upload the staged site with the configured command
    Upload {
        /// Upload command; "{site}" is replaced with the staging directory's absolute path
        #[arg(long, value_name = "CMD")]
        upload_cmd: Option<String>,
    },
}

impl Commands {
    /// Configuration values given on the command line
    fn overrides(&self, base_dir: Option<PathBuf>) -> Overrides {
        let mut overrides = Overrides {
            base_dir,
            ..Overrides::default()
        };

        match self {
            Commands::New { editor, extension, .. } => {
                overrides.editor = editor.clone();
                overrides.extension = extension.clone();
            }
            Commands::Edit { editor, .. } => overrides.editor = editor.clone(),
            Commands::Upload { upload_cmd } => overrides.upload_cmd = upload_cmd.clone(),
            _ => {}
        }

        overrides
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_date(value).ok_or_else(|| format!("expected \"YEAR-MONTH-DAY HOUR:MINUTE\", got '{}'", value))
}

/// Current local time, truncated to the minute
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Everything a command handler needs, resolved once at startup
pub struct Context {
    pub config: Config,
    pub site: Site,
    pub output: Output,
    pub no_input: bool,
}

impl Context {
    /// Returns the prompt matching the `--no-input` setting.
    ///
    /// Questions go to stderr, keeping stdout for results.
    pub fn prompt(&self) -> Box<dyn Prompt> {
        if self.no_input {
            Box::new(NonInteractive)
        } else {
            Box::new(Interactive::new(io::stdin().lock(), io::stderr()))
        }
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("Blog CLI starting");

    let overrides = cli.command.overrides(cli.base_dir.clone());
    let config = Config::load(cli.config.as_deref(), overrides)?;
    output.verbose_ctx(
        "config",
        &format!(
            "base_dir={}, editor={}, extension={}, upload_cmd={:?}",
            config.base_dir.display(),
            config.editor,
            config.extension,
            config.upload_cmd
        ),
    );

    let (site, created) = Site::open(&config.base_dir)?;
    for dir in created {
        output.info(&format!("Creating {}", dir.display()));
    }

    let ctx = Context {
        config,
        site,
        output,
        no_input: cli.no_input,
    };

    match cli.command {
        Commands::New { title, date, .. } => {
            posts::new(&ctx, &title.join(" "), date.unwrap_or_else(now))?
        }
        Commands::Publish { title, date } => {
            posts::publish(&ctx, &title.join(" "), date.unwrap_or_else(now))?
        }
        Commands::Ls { drafts, published } => posts::list(&ctx, drafts, published)?,
        Commands::Edit { title, .. } => posts::edit(&ctx, &title.join(" "))?,
        Commands::Rm { title, yes } => posts::remove(&ctx, &title.join(" "), yes)?,
        Commands::Generate { published, auto, interval } => {
            generate::generate(&ctx, !published, auto, interval)?
        }
        Commands::Upload { .. } => generate::upload(&ctx)?,
    }

    ctx.output.verbose("Command completed successfully");
    Ok(())
}
