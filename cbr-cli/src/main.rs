//! CBR CLI - command line tool for the Cầu Bây river water-quality model.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "cbr-cli",
    version,
    about = "Cầu Bây river water-quality toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: cbr_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cbr_cmd::run(cli.command).await
}
