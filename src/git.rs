//! Shelled-out git operations.

use std::path::Path;
use std::process::Command;

use walkdir::WalkDir;

use crate::error::{Result, VorschauError};

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| VorschauError::Git(format!("git {}: {e}", args.join(" "))))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VorschauError::Git(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub fn ensure_available() -> Result<()> {
    Command::new("git")
        .arg("--version")
        .output()
        .map_err(|_| VorschauError::Git("git is not installed".to_string()))?;
    Ok(())
}

/// Short hash of HEAD in `dir`, if it is a repository with commits.
pub fn head_sha(dir: &Path) -> Option<String> {
    run_git(dir, &["rev-parse", "--short", "HEAD"]).ok()
}

/// Current branch name in `dir`. Yields "HEAD" when detached.
pub fn current_branch(dir: &Path) -> Option<String> {
    run_git(dir, &["rev-parse", "--abbrev-ref", "HEAD"]).ok()
}

/// Publish the built output as a single commit on `branch` of the
/// previews repository. The commit is prepared in a scratch repository,
/// so the output directory itself stays untouched.
pub fn publish_output(
    output_dir: &Path,
    repo_url: &str,
    branch: &str,
    message: &str,
) -> Result<()> {
    let stage = tempfile::tempdir()?;
    stage_tree(output_dir, stage.path())?;

    let dir = stage.path();
    run_git(dir, &["init"])?;
    run_git(dir, &["checkout", "-b", branch])?;
    run_git(dir, &["config", "user.name", "vorschau"])?;
    run_git(dir, &["config", "user.email", "vorschau@localhost"])?;
    run_git(dir, &["config", "commit.gpgsign", "false"])?;
    run_git(dir, &["add", "-A"])?;
    run_git(dir, &["commit", "-m", message])?;
    run_git(dir, &["push", "--force", repo_url, branch])?;

    Ok(())
}

/// Copy the output tree into the staging directory, skipping any .git
/// the build may have produced.
fn stage_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).into_iter().filter_map(|e| e.ok()) {
        let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
        if rel.as_os_str().is_empty() {
            continue;
        }
        if rel
            .components()
            .next()
            .is_some_and(|c| c.as_os_str() == ".git")
        {
            continue;
        }

        let dest = to.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}
