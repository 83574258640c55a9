use std::fs;

use clap::Args;

use crate::config::{
    self, defaults, HostingSection, PreviewsSection, ProjectSection, VorschauConfig, CONFIG_FILE,
};
use crate::manifest::PackageManifest;
use crate::output::human;

#[derive(Args)]
pub struct InitArgs {
    /// Git URL of the repository preview branches are pushed to
    #[arg(long)]
    pub repo_url: Option<String>,

    /// Root URL of the hosting API (enables Pages updates)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Repository owner on the hosting server
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name on the hosting server
    #[arg(long)]
    pub repo: Option<String>,

    /// Public URL the Pages site is served from
    #[arg(long)]
    pub pages_url: Option<String>,

    /// Accept defaults instead of prompting
    #[arg(short, long)]
    pub yes: bool,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    let root = std::env::current_dir()?;
    let config_path = VorschauConfig::config_path(&root);
    if config_path.exists() {
        anyhow::bail!("{CONFIG_FILE} already exists in this directory");
    }

    let repo_url = match &args.repo_url {
        Some(url) => url.clone(),
        None if args.yes => anyhow::bail!("--repo-url is required with --yes"),
        None => dialoguer::Input::<String>::new()
            .with_prompt("Previews repository URL")
            .interact_text()?,
    };

    // Project name comes from package.json when one is present.
    let project_name = PackageManifest::load(&root).ok().and_then(|m| m.name);

    let hosting = build_hosting_section(args, &repo_url)?;

    let config = VorschauConfig {
        project: ProjectSection { name: project_name },
        previews: PreviewsSection {
            repo_url,
            branch_prefix: defaults::branch_prefix(),
            retention_days: defaults::retention_days(),
            base_path: None,
        },
        hosting,
    };

    let toml_str = toml::to_string_pretty(&config)?;
    fs::write(&config_path, toml_str)?;

    human::success(&format!("Created {CONFIG_FILE}"));
    human::info("Next steps:");
    println!("  vorschau detect");
    println!("  vorschau deploy --dry-run");

    Ok(())
}

fn build_hosting_section(
    args: &InitArgs,
    repo_url: &str,
) -> anyhow::Result<Option<HostingSection>> {
    let api_url = match &args.api_url {
        Some(url) => url.clone(),
        None if args.yes => return Ok(None),
        None => {
            let wanted = dialoguer::Confirm::new()
                .with_prompt("Configure a hosting API for Pages updates?")
                .default(false)
                .interact()?;
            if !wanted {
                return Ok(None);
            }
            dialoguer::Input::<String>::new()
                .with_prompt("Hosting API URL")
                .interact_text()?
        }
    };

    let (default_owner, default_repo) =
        config::parse_owner_repo(repo_url).unwrap_or((String::new(), String::new()));

    let owner = match &args.owner {
        Some(o) => o.clone(),
        None if args.yes => default_owner,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Repository owner")
            .default(default_owner)
            .interact_text()?,
    };
    let repo = match &args.repo {
        Some(r) => r.clone(),
        None if args.yes => default_repo,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Repository name")
            .default(default_repo)
            .interact_text()?,
    };
    if owner.is_empty() || repo.is_empty() {
        anyhow::bail!("hosting owner and repo could not be derived from the repo URL; pass --owner and --repo");
    }

    let pages_url = match &args.pages_url {
        Some(url) => Some(url.clone()),
        None if args.yes => None,
        None => {
            let entered = dialoguer::Input::<String>::new()
                .with_prompt("Pages URL (empty to skip)")
                .default(String::new())
                .allow_empty(true)
                .interact_text()?;
            if entered.is_empty() {
                None
            } else {
                Some(entered)
            }
        }
    };

    Ok(Some(HostingSection {
        api_url,
        owner,
        repo,
        pages_url,
        token: None,
    }))
}
