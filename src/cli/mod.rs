pub mod deploy;
pub mod detect;
pub mod init;
pub mod list;
pub mod prune;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vorschau",
    about = "Deploy front-end build previews to branch-based static hosting",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long, global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a vorschau.toml for this project
    Init(init::InitArgs),

    /// Show the detected framework and build profile
    Detect(detect::DetectArgs),

    /// Build the project and publish it as a preview branch
    Deploy(deploy::DeployArgs),

    /// List preview branches on the hosting server
    List(list::ListArgs),

    /// Delete preview branches past the retention window
    Prune(prune::PruneArgs),
}
