//! Blog CLI - Manage drafts and posts for a static-site blog

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = blog_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
