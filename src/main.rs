use clap::Parser;
use climate_summarizer::cli::{run, Cli};
use climate_summarizer::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
