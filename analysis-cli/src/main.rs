use std::path::PathBuf;

use clap::{Parser, Subcommand};
use image_analysis::ImageLimits;
use tracing_subscriber::{prelude::*, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "analysis-cli", about = "Build and check base64 image records")]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a PNG file and print it as a JSON image record
    Encode {
        path: PathBuf,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Check that a JSON image record decodes within the size limit
    Check { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();

    let opts = Opts::parse();
    let settings = config::read_config()?;
    init_tracing(&settings.application.log_level)?;

    let limits = ImageLimits::from(&settings.limits);

    match opts.command {
        Command::Encode { path, pretty } => {
            println!("{}", commands::encode(&path, &limits, pretty)?);
        }
        Command::Check { path } => {
            let report = commands::check(&path, &limits)?;
            println!(
                "ok: {} encoded bytes, {} decoded bytes",
                report.encoded_len, report.decoded_len
            );
        }
    }

    Ok(())
}

// Logs go to stderr so stdout only carries command output.
fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
