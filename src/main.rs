use anyhow::Result;
use clap::Parser;
use weather_compass::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    weather_compass::run(cli).await
}
