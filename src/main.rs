use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use voycrawl::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    println!("Running...");
    voycrawl::runtime::run(cli)?;
    println!("Done!");
    Ok(())
}
