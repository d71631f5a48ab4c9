//! Rendering of the final run summary.

use crate::runner::RunSummary;

/// Renders the summary block printed at the end of a run: either the
/// all-identical line or a 1-indexed enumeration of every difference,
/// followed by any pairs that failed to process.
pub fn render(summary: &RunSummary) -> String {
    let mut out = String::from("\nSummary of differing URL pairs:\n");

    if summary.differences.is_empty() {
        out.push_str("All URL pairs are identical\n");
    } else {
        for (position, record) in summary.differences.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", position + 1, record.message));
            out.push_str(&format!("   Live: {}\n", record.pair.live));
            out.push_str(&format!("   Dev: {}\n", record.pair.dev));
            if let Some(browser) = &record.pair.dev_browser {
                out.push_str(&format!("   Dev Browser: {browser}\n"));
            }
            out.push_str(&format!("   Diff image: {}\n", record.diff_path.display()));
        }
    }

    if !summary.failures.is_empty() {
        out.push_str("\nPairs that failed to process:\n");
        for (position, failure) in summary.failures.iter().enumerate() {
            out.push_str(&format!(
                "{}. Pair {}: {}\n",
                position + 1,
                failure.index + 1,
                failure.error
            ));
            out.push_str(&format!("   Live: {}\n", failure.pair.live));
            out.push_str(&format!("   Dev: {}\n", failure.pair.dev));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::UrlPair;
    use crate::pair::DiffRecord;
    use crate::runner::PairFailure;
    use std::path::PathBuf;
    use url::Url;

    fn pair(index: usize, dev_browser: Option<&str>) -> UrlPair {
        UrlPair {
            live: Url::parse(&format!("https://live.example/page-{index}")).unwrap(),
            dev: Url::parse(&format!("https://dev.example/page-{index}")).unwrap(),
            dev_browser: dev_browser.map(String::from),
        }
    }

    fn record(index: usize, dev_browser: Option<&str>) -> DiffRecord {
        DiffRecord {
            pair: pair(index, dev_browser),
            index,
            differing_pixels: 42,
            dev_path: PathBuf::from(format!("diffs/dev-{}.png", index + 1)),
            live_path: PathBuf::from(format!("diffs/live-{}.png", index + 1)),
            diff_path: PathBuf::from(format!("diffs/diff-{}-1700000000000.png", index + 1)),
            message: "Differences found",
        }
    }

    #[test]
    fn empty_summary_reports_all_identical() {
        let rendered = render(&RunSummary::default());

        assert!(rendered.contains("Summary of differing URL pairs:"));
        assert!(rendered.contains("All URL pairs are identical"));
    }

    #[test]
    fn differences_are_enumerated_in_order_with_details() {
        let summary = RunSummary {
            differences: vec![record(2, None), record(7, Some("firefox"))],
            failures: Vec::new(),
        };

        let rendered = render(&summary);

        assert!(rendered.contains("1. Differences found"));
        assert!(rendered.contains("2. Differences found"));
        assert!(rendered.contains("   Live: https://live.example/page-2"));
        assert!(rendered.contains("   Dev: https://dev.example/page-7"));
        assert!(rendered.contains("   Dev Browser: firefox"));
        assert!(rendered.contains("   Diff image: diffs/diff-8-1700000000000.png"));
        assert!(!rendered.contains("All URL pairs are identical"));
    }

    #[test]
    fn failures_are_listed_after_differences() {
        let summary = RunSummary {
            differences: Vec::new(),
            failures: vec![PairFailure {
                pair: pair(3, None),
                index: 3,
                error: String::from("Navigation timed out"),
            }],
        };

        let rendered = render(&summary);

        assert!(rendered.contains("All URL pairs are identical"));
        assert!(rendered.contains("Pairs that failed to process:"));
        assert!(rendered.contains("1. Pair 4: Navigation timed out"));
    }
}
