//! In-page suppression of animated content before capture.
//!
//! Animated GIFs and CSS animations make two captures of the same page differ
//! frame by frame. Before screenshotting, every loaded GIF is swapped for a
//! same-size static placeholder and CSS animation execution is disabled
//! globally. Both mutations are best-effort: a GIF that never fires its load
//! event keeps animating, which is accepted rather than treated as an error.

use anyhow::Result;
use chromiumoxide::page::Page;
use std::time::Duration;
use tokio::time::sleep;

/// How long to wait after issuing the mutations so pending image loads and
/// placeholder substitutions resolve before capture.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Replaces every `<img>` whose source ends in `.gif` with a placeholder of
/// the element's current natural size, preserving layout. Images still
/// loading get a one-shot load listener that performs the same substitution.
const FREEZE_GIFS_SCRIPT: &str = r#"(function(){
    try {
        var swap = function (gif) {
            gif.src = 'https://placehold.co/' + gif.naturalWidth + 'x' + gif.naturalHeight;
        };
        var gifs = document.querySelectorAll('img[src$=".gif"]');
        gifs.forEach(function (gif) {
            if (gif.complete && gif.naturalWidth !== 0) {
                swap(gif);
            } else {
                gif.addEventListener('load', function () { swap(gif); }, { once: true });
            }
        });
        return true;
    } catch (e) {
        return false;
    }
})()"#;

/// Forces the animation effect to a no-op for every element via an injected
/// style tag.
const DISABLE_CSS_ANIMATIONS_SCRIPT: &str = r#"(function(){
    try {
        var existing = document.querySelector("style[data-freeze-animations='1']");
        if (existing) { return true; }
        var style = document.createElement('style');
        style.setAttribute('data-freeze-animations', '1');
        style.appendChild(document.createTextNode('* { animation: none !important; }'));
        var head = document.head || document.getElementsByTagName('head')[0] || document.documentElement;
        head.appendChild(style);
        return true;
    } catch (e) {
        return false;
    }
})()"#;

/// Freezes visual motion on a loaded page, then sleeps for `settle` so
/// pending substitutions complete.
///
/// # Errors
///
/// Returns an error if script evaluation itself fails; in-page failures
/// (reported as a `false` return value) are logged and tolerated.
pub async fn freeze_page_motion(page: &Page, settle: Duration) -> Result<()> {
    evaluate_best_effort(page, FREEZE_GIFS_SCRIPT, "GIF freeze").await?;
    evaluate_best_effort(page, DISABLE_CSS_ANIMATIONS_SCRIPT, "CSS animation disable").await?;
    sleep(settle).await;
    Ok(())
}

async fn evaluate_best_effort(page: &Page, script: &str, what: &str) -> Result<()> {
    let result = page.evaluate(script).await?;
    if result.value().and_then(serde_json::Value::as_bool) != Some(true) {
        log::debug!("{what} script reported failure; continuing");
    }
    Ok(())
}
