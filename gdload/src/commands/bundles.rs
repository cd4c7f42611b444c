use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::Result;
use clap::{Args, Subcommand};
use indicatif::HumanBytes;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct BundlesCommand {
    #[command(subcommand)]
    pub action: Option<BundlesAction>,
}

#[derive(Subcommand)]
pub enum BundlesAction {
    /// List downloaded bundles
    #[command(alias = "ls")]
    List,
    /// Delete all downloaded bundles
    Clear,
}

impl BundlesCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = global_args.config()?;

        match self.action {
            Some(BundlesAction::Clear) => {
                let removed = clear_bundles(&config.bundle_dir)?;
                if removed.is_empty() {
                    ui::success("No bundles to delete");
                } else {
                    ui::success(&format!("Deleted {} bundle(s)", removed.len()));
                }
            }
            Some(BundlesAction::List) | None => {
                ui::info(&format!("Bundle directory: {}", config.bundle_dir.display()));
                let bundles = list_bundles(&config.bundle_dir)?;
                if bundles.is_empty() {
                    ui::info("No bundles downloaded yet");
                    ui::tip("Run `gdload load <URL> --md5 <CHECKSUM>` to fetch one.");
                }
                for (path, size) in bundles {
                    let name = path.file_name().unwrap_or_default().to_string_lossy();
                    ui::info(&format!("  {name} ({})", HumanBytes(size)));
                }
            }
        }

        Ok(())
    }
}

/// Files in `bundle_dir` with their sizes, sorted by name.
fn list_bundles(bundle_dir: &Path) -> Result<Vec<(PathBuf, u64)>> {
    let mut bundles = Vec::new();

    if !bundle_dir.exists() {
        return Ok(bundles);
    }

    for entry in fs::read_dir(bundle_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            let size = entry.metadata()?.len();
            bundles.push((path, size));
        }
    }

    bundles.sort();
    Ok(bundles)
}

fn clear_bundles(bundle_dir: &Path) -> Result<Vec<PathBuf>> {
    let bundles = list_bundles(bundle_dir)?;
    let mut removed = Vec::with_capacity(bundles.len());
    for (path, _) in bundles {
        fs::remove_file(&path)?;
        removed.push(path);
    }
    Ok(removed)
}
