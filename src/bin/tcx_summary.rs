//! Read a TCX activity file and write its summary as JSON.
//!
//! Run with: cargo run --features cli --bin tcx-summary -- activity.tcx -o output.json

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(name = "tcx-summary", about = "Summarize a TCX activity file as JSON")]
struct Cli {
    /// TCX file to read
    input: PathBuf,

    /// Where to write the JSON summary
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// Print the JSON to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let xml = std::fs::read_to_string(&cli.input)?;
    let json = tcx_summary::summarize_to_json(&xml, !cli.compact)?;

    if cli.stdout {
        println!("{}", json);
    } else {
        std::fs::write(&cli.output, json)?;
        info!("Summary of {} saved to {}", cli.input.display(), cli.output.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Failed to summarize {}: {}", cli.input.display(), err);
            ExitCode::FAILURE
        }
    }
}
