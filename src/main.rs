use anyhow::Context;
use clap::Parser;
use sima_processor::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    run(cli).await.context("sima-processor failed")
}
