//! sitediff: visual regression comparison of live/dev URL pairs.
//!
//! Reads a JSON array of `{live, dev}` URL pairs, renders both pages of each
//! pair in a shared headless Chrome instance, and reports every pair whose
//! full-page screenshots differ, with PNG artifacts written under `diffs/`.

use anyhow::{Result, anyhow};
use env_logger::Env;
use log::{error, warn};
use page_capture::HeadlessBrowser;
use std::env;
use std::path::PathBuf;
use std::process;

mod config;
mod input;
mod pair;
mod report;
mod runner;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(error) = run().await {
        error!("Error: {error:?}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let input_path = env::args().nth(1).map(PathBuf::from).ok_or_else(|| {
        anyhow!("Please provide the URLs JSON file path as a command line argument.")
    })?;

    let pairs = input::load_pairs(&input_path)?;
    let run_config = config::RunConfig::from_env();
    let capture_config = run_config.capture_config();

    let browser = HeadlessBrowser::launch().await?;
    let summary = runner::run_pairs(&browser, &pairs, &capture_config).await;

    if let Err(error) = browser.shutdown().await {
        warn!("Browser shutdown failed: {error:?}");
    }

    print!("{}", report::render(&summary));

    if summary.failures.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} pair(s) failed to process",
            summary.failures.len()
        ))
    }
}
