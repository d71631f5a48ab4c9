//! Chunked, bounded-concurrency orchestration over the pair list.

use futures::future::join_all;
use log::{debug, error};
use std::future::Future;

use crate::input::UrlPair;
use crate::pair::{DiffRecord, process_pair};
use page_capture::{CaptureConfig, HeadlessBrowser};

/// Upper bound on concurrently processed pairs. Unbounded parallel tabs
/// exhaust browser memory, so the pair list is worked off in fixed-size
/// chunks with full concurrency inside each chunk.
pub const CHUNK_SIZE: usize = 10;

/// A pair whose processing failed; the run continues without it.
#[derive(Debug)]
pub struct PairFailure {
    pub pair: UrlPair,
    pub index: usize,
    pub error: String,
}

/// Aggregated results of a whole run, in input order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub differences: Vec<DiffRecord>,
    pub failures: Vec<PairFailure>,
}

/// Processes every pair against the shared browser and aggregates results.
///
/// Chunks are processed strictly in input order; pairs within a chunk run
/// concurrently. A failing pair is recorded in the summary instead of
/// aborting its chunk.
pub async fn run_pairs(
    browser: &HeadlessBrowser,
    pairs: &[UrlPair],
    capture: &CaptureConfig,
) -> RunSummary {
    run_chunked(pairs, |index, pair| async move {
        process_pair(browser, &pair, index, capture).await
    })
    .await
}

/// Drives `process` over the pair list in chunks of [`CHUNK_SIZE`].
///
/// `join_all` yields results in the order the futures were created, so the
/// summary preserves input order regardless of completion order.
async fn run_chunked<F, Fut>(pairs: &[UrlPair], process: F) -> RunSummary
where
    F: Fn(usize, UrlPair) -> Fut,
    Fut: Future<Output = anyhow::Result<Option<DiffRecord>>>,
{
    let mut summary = RunSummary::default();

    for (chunk_index, chunk) in pairs.chunks(CHUNK_SIZE).enumerate() {
        let base = chunk_index * CHUNK_SIZE;
        let tasks = chunk
            .iter()
            .enumerate()
            .map(|(offset, pair)| process(base + offset, pair.clone()));
        let results = join_all(tasks).await;

        for (offset, result) in results.into_iter().enumerate() {
            let index = base + offset;
            match result {
                Ok(Some(record)) => {
                    debug!("Recorded difference for pair {}", record.index + 1);
                    summary.differences.push(record);
                }
                Ok(None) => {}
                Err(err) => {
                    error!("Pair {} failed: {err:?}", index + 1);
                    summary.failures.push(PairFailure {
                        pair: chunk[offset].clone(),
                        index,
                        error: format!("{err:#}"),
                    });
                }
            }
        }
    }

    summary
}
