use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vorschau::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Change working directory if --dir is specified
    if let Some(ref dir) = cli.dir {
        std::env::set_current_dir(dir)?;
    }

    match &cli.command {
        Command::Init(args) => vorschau::cli::init::run(args)?,
        Command::Detect(args) => vorschau::cli::detect::run(args, cli.json)?,
        Command::Deploy(args) => vorschau::cli::deploy::run(args, cli.json)?,
        Command::List(args) => vorschau::cli::list::run(args, cli.json)?,
        Command::Prune(args) => vorschau::cli::prune::run(args, cli.json)?,
    }

    Ok(())
}
