//! Report of classes defined versus used per graph

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "class-usage")]
#[command(about = "Compare defined and used classes across OKN graphs", long_about = None)]
struct Cli {
    /// Directory holding defined_classes.xml and used_classes.xml
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    classmap::logging::init_tracing();

    let report = classmap::commands::run_report(&cli.dir)?;
    println!("{report}");
    Ok(())
}
