use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::config::VorschauConfig;
use crate::error::VorschauError;
use crate::hosting::{BranchInfo, HostingClient};
use crate::output::{self, human, CommandOutput, OutputFormat};

#[derive(Args)]
pub struct PruneArgs {
    /// Delete branches older than this many days (overrides vorschau.toml)
    #[arg(long)]
    pub max_age_days: Option<i64>,

    /// Show which branches would be deleted without deleting them
    #[arg(long)]
    pub dry_run: bool,

    /// API token for the hosting server
    #[arg(long, env = "VORSCHAU_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct PruneSummary {
    pub examined: usize,
    pub deleted: Vec<String>,
    pub kept: usize,
    pub dry_run: bool,
}

impl CommandOutput for PruneSummary {
    fn human_display(&self) -> String {
        if self.dry_run {
            format!(
                "Would delete {} of {} preview branches",
                self.deleted.len(),
                self.examined
            )
        } else {
            format!(
                "Deleted {} of {} preview branches ({} kept)",
                self.deleted.len(),
                self.examined,
                self.kept
            )
        }
    }
}

pub fn run(args: &PruneArgs, json: bool) -> anyhow::Result<()> {
    let root = std::env::current_dir()?;
    let config = VorschauConfig::load_from_root(&root)?;
    let hosting = config.hosting.as_ref().ok_or_else(|| {
        VorschauError::Hosting("no [hosting] section configured in vorschau.toml".into())
    })?;

    let max_age_days = args.max_age_days.unwrap_or(config.previews.retention_days);
    let client = HostingClient::new(hosting, args.token.as_deref())?;

    let branches = client.list_branches()?;
    let prefix = &config.previews.branch_prefix;
    let examined = branches.iter().filter(|b| b.name.starts_with(prefix)).count();
    let stale = stale_branches(&branches, prefix, max_age_days, Utc::now());

    let mut deleted = Vec::with_capacity(stale.len());
    for branch in &stale {
        if args.dry_run {
            human::info(&format!("Would delete {}", branch.name));
            deleted.push(branch.name.clone());
            continue;
        }
        match client.delete_branch(&branch.name) {
            Ok(()) => {
                human::info(&format!("Deleted {}", branch.name));
                deleted.push(branch.name.clone());
            }
            Err(e) => human::warning(&format!("Failed to delete {}: {e}", branch.name)),
        }
    }

    let summary = PruneSummary {
        examined,
        kept: examined - deleted.len(),
        deleted,
        dry_run: args.dry_run,
    };

    match OutputFormat::from_flag(json) {
        OutputFormat::Human => human::success(&summary.human_display()),
        OutputFormat::Json => output::print_output(&summary, OutputFormat::Json),
    }
    Ok(())
}

/// Preview branches whose last commit is strictly older than `max_age_days`.
/// Branches outside the prefix are never candidates.
fn stale_branches(
    branches: &[BranchInfo],
    prefix: &str,
    max_age_days: i64,
    now: DateTime<Utc>,
) -> Vec<BranchInfo> {
    branches
        .iter()
        .filter(|b| b.name.starts_with(prefix))
        .filter(|b| (now - b.committed_at).num_days() > max_age_days)
        .cloned()
        .collect()
}
