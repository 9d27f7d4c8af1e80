//! Notification count extraction.
//!
//! The forum marks its notification badges with the `ipsNotificationCount`
//! class. When the page carries a combined badge
//! (`data-notificationtype="total"`) that value is authoritative; otherwise the
//! individual badges are summed.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::{errors::Error, Result};

pub const MARKER_CLASS: &str = "ipsNotificationCount";
pub const TOTAL_TYPE: &str = "total";

/// Extract the notification count from a forum page.
///
/// A page without any badge has zero notifications; that is not an error.
pub fn extract_count(html: &str) -> Result<u64> {
    let total_sel = selector(&format!(
        r#"[class*="{MARKER_CLASS}"][data-notificationtype="{TOTAL_TYPE}"]"#
    ))?;
    let any_sel = selector(&format!(r#"[class*="{MARKER_CLASS}"]"#))?;

    let doc = Html::parse_document(html);

    if let Some(total) = doc.select(&total_sel).next() {
        let text = text_of(total);
        debug!("found total notification badge: {text:?}");
        return parse_count(&text);
    }

    let mut sum: u64 = 0;
    let mut badges = 0usize;
    for badge in doc.select(&any_sel) {
        badges += 1;
        let text = text_of(badge);
        let n = parse_count(&text).unwrap_or_else(|e| {
            debug!("ignoring notification badge: {e}");
            0
        });
        sum = sum.saturating_add(n);
    }
    debug!("summed {badges} notification badge(s) to {sum}");

    Ok(sum)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Parse(format!("invalid selector {css:?}: {e}")))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

// Surrounding whitespace is tolerated on purpose; the digits themselves are
// parsed strictly.
fn parse_count(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    trimmed.parse::<u64>().map_err(|source| Error::CountParse {
        text: trimmed.to_string(),
        source,
    })
}
