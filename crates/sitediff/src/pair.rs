//! Processing of a single URL pair: capture both pages, reconcile, diff,
//! and persist artifacts when a difference is found.

use anyhow::{Context as _, Result};
use image::{ColorType, ImageEncoder as _, RgbaImage, codecs::png::PngEncoder};
use log::{debug, info};
use page_capture::{CaptureConfig, HeadlessBrowser, capture_page};
use pixeldiff::{DiffOptions, diff, reconcile};
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::input::UrlPair;

/// Directory under which all diff artifacts are written.
pub const DIFF_DIR: &str = "diffs";

const DIFF_MESSAGE: &str = "Differences found";

/// Outcome of a pair whose captures differed, as listed in the run summary.
#[derive(Debug)]
pub struct DiffRecord {
    pub pair: UrlPair,
    pub index: usize,
    pub differing_pixels: u64,
    pub dev_path: PathBuf,
    pub live_path: PathBuf,
    pub diff_path: PathBuf,
    pub message: &'static str,
}

/// Artifact locations for one differing pair.
struct ArtifactPaths {
    dev: PathBuf,
    live: PathBuf,
    diff: PathBuf,
}

impl ArtifactPaths {
    /// Deterministic, collision-resistant names: the padded captures are
    /// keyed by pair index alone, the diff additionally by timestamp.
    fn for_pair(dir: &Path, index: usize, timestamp_millis: u128) -> Self {
        Self {
            dev: dir.join(format!("dev-{}.png", index + 1)),
            live: dir.join(format!("live-{}.png", index + 1)),
            diff: dir.join(format!("diff-{}-{}.png", index + 1, timestamp_millis)),
        }
    }
}

/// Runs the full comparison pipeline for one pair.
///
/// Captures the dev page, then the live page, pads both captures to common
/// dimensions, and diffs them. Returns `Ok(None)` when the renders are
/// identical; otherwise writes the three PNG artifacts and returns the
/// populated [`DiffRecord`].
///
/// # Errors
///
/// Returns an error if either capture, the diff, or artifact persistence
/// fails; the failure carries the pair number as context.
pub async fn process_pair(
    browser: &HeadlessBrowser,
    pair: &UrlPair,
    index: usize,
    capture: &CaptureConfig,
) -> Result<Option<DiffRecord>> {
    info!("Processing pair {}: {} vs {}", index + 1, pair.live, pair.dev);

    let dev_image = capture_page(browser, &pair.dev, capture)
        .await
        .with_context(|| format!("Failed to capture dev page for pair {}", index + 1))?;
    let live_image = capture_page(browser, &pair.live, capture)
        .await
        .with_context(|| format!("Failed to capture live page for pair {}", index + 1))?;

    let (padded_dev, padded_live) = reconcile(&dev_image, &live_image);
    let outcome = diff(&padded_dev, &padded_live, &DiffOptions::default())
        .with_context(|| format!("Comparison failed for pair {}", index + 1))?;

    if outcome.is_identical() {
        info!("No differences found");
        return Ok(None);
    }

    let dir = Path::new(DIFF_DIR);
    let paths = ArtifactPaths::for_pair(dir, index, unix_millis()?);
    write_artifacts(dir, &paths, &padded_dev, &padded_live, &outcome.visualization)?;

    let record = DiffRecord {
        pair: pair.clone(),
        index,
        differing_pixels: outcome.differing_pixels,
        dev_path: paths.dev,
        live_path: paths.live,
        diff_path: paths.diff,
        message: DIFF_MESSAGE,
    };

    info!(
        "Differences found: {} differing pixels. Diff saved to: {}",
        record.differing_pixels,
        record.diff_path.display()
    );
    debug!(
        "Padded captures saved to {} and {}",
        record.dev_path.display(),
        record.live_path.display()
    );
    Ok(Some(record))
}

/// Persists the padded captures and the diff visualization under `dir`,
/// creating it first if needed.
fn write_artifacts(
    dir: &Path,
    paths: &ArtifactPaths,
    dev: &RgbaImage,
    live: &RgbaImage,
    visualization: &RgbaImage,
) -> Result<()> {
    create_dir_all(dir)
        .with_context(|| format!("Failed to create artifact directory {}", dir.display()))?;
    write_png(&paths.dev, dev)?;
    write_png(&paths.live, live)?;
    write_png(&paths.diff, visualization)?;
    Ok(())
}

fn unix_millis() -> Result<u128> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?;
    Ok(elapsed.as_millis())
}

/// Encodes an RGBA image as PNG and writes it to `path`.
///
/// # Errors
///
/// Returns an error if PNG encoding or the filesystem write fails.
fn write_png(path: &Path, image: &RgbaImage) -> Result<()> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8.into(),
    )?;
    write(path, &buffer).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn artifact_names_follow_the_documented_pattern() {
        let paths = ArtifactPaths::for_pair(Path::new(DIFF_DIR), 4, 1_700_000_000_123);

        assert_eq!(paths.dev, Path::new("diffs/dev-5.png"));
        assert_eq!(paths.live, Path::new("diffs/live-5.png"));
        assert_eq!(paths.diff, Path::new("diffs/diff-5-1700000000123.png"));
    }

    #[test]
    fn diff_found_path_writes_exactly_three_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("diffs");
        let paths = ArtifactPaths::for_pair(&dir, 0, 42);
        let image = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));

        write_artifacts(&dir, &paths, &image, &image, &image).unwrap();

        let mut names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["dev-1.png", "diff-1-42.png", "live-1.png"]);
    }

    #[test]
    fn written_png_round_trips_through_the_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.png");
        let image = RgbaImage::from_pixel(6, 3, Rgba([10, 200, 30, 255]));

        write_png(&path, &image).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (6, 3));
        assert_eq!(decoded, image);
    }
}
