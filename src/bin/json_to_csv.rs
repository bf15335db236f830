use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tweetsift::normalize;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert ingested tweet JSON files to a single CSV"
)]
struct Args {
    /// Pattern for glob to find all json files.
    input_pattern: String,
    /// Path for output csv. Will fail if it already exists.
    output_csv: PathBuf,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let rows = normalize::normalize_to_csv(&args.input_pattern, &args.output_csv)?;
    info!(rows, output = %args.output_csv.display(), "done");
    Ok(())
}
