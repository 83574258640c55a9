use std::path::PathBuf;

use clap::Args;

use crate::detect;
use crate::manifest::PackageManifest;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct DetectArgs {
    /// Project directory to inspect (defaults to the current directory)
    pub path: Option<String>,
}

pub fn run(args: &DetectArgs, json: bool) -> anyhow::Result<()> {
    let root = match &args.path {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };

    let manifest = PackageManifest::load(&root)?;
    let profile = detect::detect_project(&root, &manifest);

    output::print_output(&profile, OutputFormat::from_flag(json));
    Ok(())
}
