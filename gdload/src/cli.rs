use anyhow::Result;
use clap::{Parser, Subcommand};
use gdload_lib::config::Config;
use std::path::PathBuf;

use crate::commands::{bundles::BundlesCommand, load::LoadCommand};

#[derive(Parser)]
#[command(name = "gdload")]
#[command(about = "Download a Godot data bundle and launch the engine with it")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[derive(clap::Args, Clone)]
pub struct GlobalArgs {
    /// Use a different location for gdload's data, where gdload.toml and bundles are kept
    #[arg(long, global = true)]
    pub datadir: Option<PathBuf>,

    /// Directory to download bundles into (overrides gdload.toml)
    #[arg(long, global = true)]
    pub bundle_dir: Option<PathBuf>,

    /// Engine executable to launch (overrides gdload.toml)
    #[arg(long, global = true)]
    pub engine: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::setup(self.datadir.as_deref())?;
        if let Some(bundle_dir) = &self.bundle_dir {
            config = config.with_bundle_dir(bundle_dir)?;
        }
        if let Some(engine) = &self.engine {
            config = config.with_engine_executable(engine);
        }
        config.ensure_bundle_dir()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a bundle and start the engine with it
    Load(LoadCommand),

    /// Manage downloaded bundles
    Bundles(BundlesCommand),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Load(cmd) => cmd.run(self.global_args).await,
            Commands::Bundles(cmd) => cmd.run(self.global_args).await,
        }
    }
}
