use anyhow::Result;
use clap::Parser;
use netspend::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    netspend::logging::init(cli.verbose);
    cli.run().await
}
