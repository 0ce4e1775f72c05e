#![deny(clippy::pedantic)]

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use gentrees::plan::FixturePlan;

mod minimal_logger;
use minimal_logger::MinimalLogger;

/// Generates the coalescent tree sequence fixtures in testdata/
#[derive(Debug, Parser)]
#[command(name = "gentrees", version, about)]
struct Options {}

static MINIMAL_LOGGER: MinimalLogger = MinimalLogger::new(LevelFilter::Info);

fn main() -> Result<()> {
    let Options {} = Options::parse();

    // Set up the minimal logger to stdout/stderr
    MINIMAL_LOGGER
        .install()
        .context("Failed to set up the logger.")?;

    let plan = FixturePlan::embedded()?;

    let fixtures = gentrees::generate(&plan)?;

    gentrees::write(&fixtures, Path::new("."))
}
