use chrono::Utc;
use clap::Args;
use serde::Serialize;

use crate::config::VorschauConfig;
use crate::error::VorschauError;
use crate::hosting::HostingClient;
use crate::output::{self, CommandOutput, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// API token for the hosting server
    #[arg(long, env = "VORSCHAU_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct BranchLine {
    pub name: String,
    pub sha: String,
    pub age_days: i64,
}

#[derive(Serialize)]
pub struct ListSummary {
    pub branches: Vec<BranchLine>,
}

impl CommandOutput for ListSummary {
    fn human_display(&self) -> String {
        if self.branches.is_empty() {
            return "No preview branches found".to_string();
        }
        self.branches
            .iter()
            .map(|b| format!("{}  {}  {}", b.name, short_sha(&b.sha), format_age(b.age_days)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn run(args: &ListArgs, json: bool) -> anyhow::Result<()> {
    let root = std::env::current_dir()?;
    let config = VorschauConfig::load_from_root(&root)?;
    let hosting = config.hosting.as_ref().ok_or_else(|| {
        VorschauError::Hosting("no [hosting] section configured in vorschau.toml".into())
    })?;

    let client = HostingClient::new(hosting, args.token.as_deref())?;
    let now = Utc::now();

    let branches: Vec<BranchLine> = client
        .list_branches()?
        .into_iter()
        .filter(|b| b.name.starts_with(&config.previews.branch_prefix))
        .map(|b| BranchLine {
            age_days: (now - b.committed_at).num_days(),
            name: b.name,
            sha: b.sha,
        })
        .collect();

    let summary = ListSummary { branches };
    output::print_output(&summary, OutputFormat::from_flag(json));
    Ok(())
}

fn short_sha(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

fn format_age(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "1 day old".to_string(),
        n => format!("{n} days old"),
    }
}
