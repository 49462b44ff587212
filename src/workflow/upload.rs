//! Pass-through to an external upload command

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

use crate::storage::ConfigError;

/// Placeholder replaced with the staging directory's absolute path
pub const SITE_PLACEHOLDER: &str = "{site}";

/// Builds the upload process from `template`.
///
/// The template is split on whitespace and `{site}` is substituted inside
/// each argument, so paths containing spaces stay a single argument.
pub fn upload_command(template: &str, site_dir: &Path) -> Result<Command, ConfigError> {
    let site = site_dir.to_string_lossy();
    let mut parts = template
        .split_whitespace()
        .map(|part| part.replace(SITE_PLACEHOLDER, &site));

    let program = parts
        .next()
        .ok_or_else(|| ConfigError::InvalidUploadCommand(template.to_string()))?;

    let mut cmd = Command::new(program);
    cmd.args(parts);
    Ok(cmd)
}

/// Runs the upload command with inherited stdio; a non-zero exit is an error
pub fn upload(template: &str, site_dir: &Path) -> Result<()> {
    let mut cmd = upload_command(template, site_dir)?;
    let status = cmd
        .status()
        .with_context(|| format!("Failed to run upload command '{}'", template))?;

    if !status.success() {
        anyhow::bail!("Upload command '{}' failed with {}", template, status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn substitutes_site_in_arguments() {
        let cmd = upload_command("rsync -av {site}/ host:/var/www", Path::new("/blog dir/_posts")).unwrap();

        assert_eq!(cmd.get_program(), "rsync");
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(
            args,
            vec![OsStr::new("-av"), OsStr::new("/blog dir/_posts/"), OsStr::new("host:/var/www")]
        );
    }

    #[test]
    fn empty_template_is_invalid() {
        let err = upload_command("  ", Path::new("/x")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUploadCommand(_)));
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_an_error() {
        assert!(upload("false {site}", Path::new("/x")).is_err());
        assert!(upload("true {site}", Path::new("/x")).is_ok());
    }
}
