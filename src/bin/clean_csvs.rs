use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tweetsift::clean;

#[derive(Parser)]
#[command(author, version, about = "Clean and dedup collected tweet CSVs")]
struct Args {
    /// Dir containing input csvs. Will glob all csvs inside.
    input_dir: PathBuf,
    /// Path to output directory. Will fail if not exists.
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    clean::clean_dir(&args.input_dir, &args.output_dir)?;
    info!(output = %args.output_dir.display(), "done");
    Ok(())
}
