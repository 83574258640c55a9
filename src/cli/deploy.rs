use std::path::Path;
use std::time::Instant;

use clap::Args;
use serde::Serialize;
use walkdir::WalkDir;

use crate::branch;
use crate::config::{self, VorschauConfig};
use crate::detect::{self, BuildProfile, Framework};
use crate::error::{Result, VorschauError};
use crate::git;
use crate::hosting::HostingClient;
use crate::manifest::PackageManifest;
use crate::output::{self, human, CommandOutput, OutputFormat};
use crate::patch::ConfigPatcher;
use crate::runner;

#[derive(Args)]
pub struct DeployArgs {
    /// Preview branch name (defaults to one derived from the current branch)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Base path the preview is served under (overrides vorschau.toml)
    #[arg(long)]
    pub base_path: Option<String>,

    /// Show the deployment plan without building or publishing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip pointing the Pages site at the preview branch
    #[arg(long)]
    pub no_pages: bool,

    /// Leave patched config files in place after the build
    #[arg(long)]
    pub keep_config: bool,

    /// Commit message for the preview commit
    #[arg(short, long)]
    pub message: Option<String>,

    /// API token for the hosting server
    #[arg(long, env = "VORSCHAU_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct DeploySummary {
    pub project: String,
    pub framework: Framework,
    pub output_dir: String,
    pub branch: String,
    pub files_published: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub duration_ms: u64,
}

impl CommandOutput for DeploySummary {
    fn human_display(&self) -> String {
        let mut out = format!(
            "Deployed {} preview to {} ({} files, {}ms)",
            self.project, self.branch, self.files_published, self.duration_ms
        );
        if let Some(url) = &self.url {
            out.push_str(&format!("\n  {url}"));
        }
        out
    }
}

pub fn run(args: &DeployArgs, json: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let root = std::env::current_dir()?;

    let config = VorschauConfig::load_from_root(&root)?;
    let manifest = PackageManifest::load(&root)?;

    let project = project_name(&config, &manifest, &root);
    let profile = detect::detect_project(&root, &manifest);
    human::info(&format!(
        "Detected {} project (output: {})",
        profile.framework, profile.output_dir
    ));

    let source_ref = git::current_branch(&root).unwrap_or_else(|| "work".to_string());
    let branch = match &args.branch {
        Some(name) => name.clone(),
        None => branch::preview_branch(&config.previews.branch_prefix, &project, &source_ref),
    };
    let base_path = match &args.base_path {
        Some(raw) => config::normalize_base_path(raw),
        None => config.base_path(),
    };

    if args.dry_run {
        human::header("Deployment plan (dry run)");
        human::item(&format!("Framework:        {}", profile.framework));
        human::item(&format!("Build command:    {}", profile.build_command));
        human::item(&format!("Output directory: {}", profile.output_dir));
        human::item(&format!("Base path:        {}", display_base(&base_path)));
        human::item(&format!("Preview branch:   {branch}"));
        human::item(&format!("Previews repo:    {}", config.previews.repo_url));
        human::success("Dry run complete (no changes made)");
        return Ok(());
    }

    git::ensure_available()?;

    let mut patcher = ConfigPatcher::new(&root);
    build_with_patched_config(&mut patcher, &profile, &base_path, args.keep_config, &root)?;

    let output_dir = root.join(&profile.output_dir);
    let files = count_files(&output_dir);
    if files == 0 {
        return Err(VorschauError::Build(format!(
            "build produced no output in {}",
            profile.output_dir
        ))
        .into());
    }

    let message = match &args.message {
        Some(m) => m.clone(),
        None => {
            let sha = git::head_sha(&root).unwrap_or_else(|| "unknown".to_string());
            format!("Preview: {project} @ {sha}")
        }
    };

    human::info(&format!("Publishing {files} files to {branch}..."));
    git::publish_output(&output_dir, &config.previews.repo_url, &branch, &message)?;

    let mut url = None;
    if !args.no_pages {
        if let Some(hosting) = &config.hosting {
            let client = HostingClient::new(hosting, args.token.as_deref())?;
            client.set_pages_branch(&branch)?;
            human::info("Pages now serves this preview branch");
            url = hosting
                .pages_url
                .as_ref()
                .map(|base| format!("{}{}", base.trim_end_matches('/'), base_path));
        } else {
            human::info("No [hosting] section configured; skipping Pages update");
        }
    }

    let summary = DeploySummary {
        project,
        framework: profile.framework,
        output_dir: profile.output_dir.clone(),
        branch,
        files_published: files,
        url,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    match OutputFormat::from_flag(json) {
        OutputFormat::Human => human::success(&summary.human_display()),
        OutputFormat::Json => output::print_output(&summary, OutputFormat::Json),
    }

    Ok(())
}

/// Run the build with the project's config patched for `base_path`.
/// The patched files are restored whether the build succeeds or fails,
/// and a configure failure reverts whatever it had already written.
fn build_with_patched_config(
    patcher: &mut ConfigPatcher,
    profile: &BuildProfile,
    base_path: &str,
    keep_config: bool,
    root: &Path,
) -> Result<()> {
    if let Err(e) = patcher.configure(profile, base_path) {
        // A failed patch can leave a half-written file behind; the
        // records taken before the failure still revert it.
        if let Err(restore_err) = patcher.restore() {
            human::error(&restore_err.to_string());
        }
        return Err(e);
    }

    human::info(&format!("Running `{}`...", profile.build_command));
    let build_result = runner::run_build(profile, root);

    if keep_config {
        human::warning(
            "Leaving patched config in place (--keep-config); restore it from version control",
        );
    } else if let Err(e) = patcher.restore() {
        if build_result.is_ok() {
            return Err(e);
        }
        // The build error is the primary failure; still surface the
        // restore problem so the user knows the tree is dirty.
        human::error(&e.to_string());
    }
    build_result
}

fn project_name(config: &VorschauConfig, manifest: &PackageManifest, root: &Path) -> String {
    if let Some(name) = &config.project.name {
        return name.clone();
    }
    if let Some(name) = &manifest.name {
        if !name.is_empty() {
            return name.clone();
        }
    }
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string())
}

fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count()
}

fn display_base(base_path: &str) -> &str {
    if base_path.is_empty() {
        "/"
    } else {
        base_path
    }
}
