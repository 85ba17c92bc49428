//! classmap CLI entry point

use clap::Parser;
use classmap::commands::{self, GenerateConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "classmap")]
#[command(about = "Precompute class equivalences across OKN knowledge graphs", long_about = None)]
struct Cli {
    /// SPARQL endpoint to query
    #[arg(long, default_value = commands::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Output Turtle file
    #[arg(long, default_value = commands::DEFAULT_OUTPUT)]
    output: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    classmap::logging::init_tracing();

    tracing::info!("classmap v{}", env!("CARGO_PKG_VERSION"));

    let config = GenerateConfig {
        endpoint: cli.endpoint,
        output: cli.output,
        ..GenerateConfig::default()
    };
    commands::run_generate(&config).await
}
