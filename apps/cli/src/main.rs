//! scormchef CLI — one-shot SCORM course ingestion chef.
//!
//! Repackages extracted SCORM exports into viewer-ready lesson directories,
//! reproducible zips, and a channel manifest for the upload SDK.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
