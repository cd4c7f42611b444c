mod cli;
mod commands;
mod ui;

use clap::Parser;
use cli::Cli;
use gdload_lib::logging::initialize_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    initialize_logging(cli.global_args.verbose);
    if let Err(e) = cli.run().await {
        ui::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
