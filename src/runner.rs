//! External build runner.

use std::path::Path;

use crate::detect::BuildProfile;
use crate::error::{Result, VorschauError};
use crate::platform;

/// Run the profile's build command in `root`, streaming its output to
/// the caller's stdio. Non-zero exit is a build failure.
pub fn run_build(profile: &BuildProfile, root: &Path) -> Result<()> {
    let mut parts = profile.build_command.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(VorschauError::Build("empty build command".to_string()));
    };
    let args: Vec<&str> = parts.collect();

    tracing::debug!("Running `{}` in {}", profile.build_command, root.display());
    let status = platform::npm_cmd(program)
        .args(&args)
        .current_dir(root)
        .status()
        .map_err(|e| {
            VorschauError::Build(format!("failed to run `{}`: {e}", profile.build_command))
        })?;

    if !status.success() {
        return Err(VorschauError::Build(format!(
            "`{}` exited with {status}",
            profile.build_command
        )));
    }

    Ok(())
}
