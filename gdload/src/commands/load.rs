use crate::cli::GlobalArgs;
use crate::ui;
use anyhow::{Context, Result};
use clap::Args;
use gdload_lib::download_client::HttpDownloadClient;
use gdload_lib::error::LoadError;
use gdload_lib::launcher::{EngineLauncher, GodotLauncher, LaunchOptions, LaunchParameters};
use gdload_lib::loader::LoadQueue;
use gdload_lib::request::DownloadRequest;
use std::path::PathBuf;

#[derive(Args)]
pub struct LoadCommand {
    /// URL of the data bundle (e.g., http://host:8080/main.1.com.godot.game.obb)
    pub url: String,

    /// Checksum handed to the engine together with the bundle. It is not verified.
    #[arg(long, default_value = "")]
    pub md5: String,

    /// Download only and print the engine command line instead of starting the engine
    #[arg(long)]
    pub no_launch: bool,
}

impl LoadCommand {
    pub async fn run(self, global_args: GlobalArgs) -> Result<()> {
        let config = global_args.config()?;
        let request = DownloadRequest::new(&self.url, &config.bundle_dir, &self.md5)?;
        let client = HttpDownloadClient::new(&config)?;

        if self.md5.is_empty() {
            ui::warning("No --md5 given, the engine will receive an empty checksum.");
        }
        ui::info(&format!(
            "Loading {} into {}",
            request.source_url,
            config.bundle_dir.display()
        ));

        let params = if self.no_launch {
            let launcher = PrintLauncher {
                executable: config.engine_executable.clone(),
                options: config.launch_options.clone(),
            };
            load(request, client, launcher).await?
        } else {
            let launcher =
                GodotLauncher::new(config.engine_executable.clone(), config.launch_options.clone());
            load(request, client, launcher).await?
        };

        ui::success(&format!("Bundle ready: {}", params.uri));
        if self.no_launch {
            ui::tip("Drop --no-launch to start the engine right away.");
        } else {
            ui::success(&format!(
                "Started {}",
                config.engine_executable.display()
            ));
        }

        Ok(())
    }
}

async fn load<L: EngineLauncher + 'static>(
    request: DownloadRequest,
    client: HttpDownloadClient,
    launcher: L,
) -> Result<LaunchParameters> {
    let url = request.source_url.clone();
    let queue = LoadQueue::spawn(client, launcher);
    let outcome = queue.load(request).await;
    queue.shutdown().await;
    outcome.context(format!("Failed to load {url}"))
}

/// Shows the engine invocation instead of running it.
struct PrintLauncher {
    executable: PathBuf,
    options: LaunchOptions,
}

impl EngineLauncher for PrintLauncher {
    fn launch(&self, params: LaunchParameters) -> Result<(), LoadError> {
        ui::info(&format!(
            "{} {}",
            self.executable.display(),
            params.command_line(&self.options).join(" ")
        ));
        Ok(())
    }
}
