//! Loading and validation of the URL pair list.

use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

/// One comparison unit as it appears in the input file.
#[derive(Debug, Deserialize)]
struct RawUrlPair {
    live: String,
    dev: String,
    #[serde(default)]
    dev_browser: Option<String>,
}

/// One comparison unit with validated URLs.
///
/// Input order defines processing and reporting order; uniqueness is not
/// required.
#[derive(Debug, Clone)]
pub struct UrlPair {
    pub live: Url,
    pub dev: Url,
    pub dev_browser: Option<String>,
}

/// Reads the pair list from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a JSON array of
/// `{live, dev}` objects, or contains an unparsable URL.
pub fn load_pairs(path: &Path) -> Result<Vec<UrlPair>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL pairs from {}", path.display()))?;
    parse_pairs(&contents)
}

fn parse_pairs(json: &str) -> Result<Vec<UrlPair>> {
    let raw_pairs: Vec<RawUrlPair> =
        serde_json::from_str(json).context("URL pairs file is not a JSON array of objects")?;

    raw_pairs
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let live = Url::parse(&raw.live)
                .with_context(|| format!("Invalid live URL for pair {}: {}", index + 1, raw.live))?;
            let dev = Url::parse(&raw.dev)
                .with_context(|| format!("Invalid dev URL for pair {}: {}", index + 1, raw.dev))?;
            Ok(UrlPair {
                live,
                dev,
                dev_browser: raw.dev_browser,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_in_input_order() {
        let json = r#"[
            {"live": "https://a.example/x", "dev": "https://b.example/x"},
            {"live": "https://a.example/y", "dev": "https://b.example/y", "dev_browser": "firefox"}
        ]"#;

        let pairs = parse_pairs(json).unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].live.as_str(), "https://a.example/x");
        assert_eq!(pairs[0].dev_browser, None);
        assert_eq!(pairs[1].dev.as_str(), "https://b.example/y");
        assert_eq!(pairs[1].dev_browser.as_deref(), Some("firefox"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_pairs("{not json").is_err());
        assert!(parse_pairs(r#"{"live": "https://a.example"}"#).is_err());
    }

    #[test]
    fn rejects_missing_fields() {
        let json = r#"[{"live": "https://a.example/x"}]"#;
        assert!(parse_pairs(json).is_err());
    }

    #[test]
    fn rejects_invalid_urls() {
        let json = r#"[{"live": "not a url", "dev": "https://b.example/x"}]"#;
        let error = parse_pairs(json).unwrap_err();
        assert!(error.to_string().contains("pair 1"));
    }

    #[test]
    fn load_reports_missing_file() {
        let error = load_pairs(Path::new("does-not-exist.json")).unwrap_err();
        assert!(error.to_string().contains("does-not-exist.json"));
    }
}
