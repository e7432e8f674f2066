use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use rusty_extract::Job;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Extract a header and data rows from a spreadsheet sheet into CSV.")]
struct Cli {
    /// JSON configuration file.
    config: PathBuf,

    /// Directory for the output file (default: current directory).
    output_dir: Option<PathBuf>,

    /// The run must fail: write the error text to `<config stem>.txt` and exit successfully.
    #[arg(long)]
    expect_failure: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_dir = match cli.output_dir {
        Some(output_dir) => output_dir,
        None => std::env::current_dir().context("Cannot resolve the current directory")?,
    };
    let job = Job::new(&cli.config, &output_dir)?;
    let output = if cli.expect_failure {
        job.run_expecting_failure()?
    } else {
        job.run()?
    };
    println!("{}", output.display());
    Ok(())
}
