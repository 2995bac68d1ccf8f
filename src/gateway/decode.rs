//! Best-effort decoding of model output.
//!
//! Clinical workflows must keep producing *a* result for manual correction
//! rather than blocking on a malformed model reply, so this is an explicit
//! robustness boundary with a documented contract: `best_effort_decode`
//! never fails — it returns the caller's fallback instead.

use serde::de::DeserializeOwned;

/// Decode `raw` as JSON, repairing the common model quirks:
///
/// 1. If the text contains a fenced code block (```json … ``` or a bare
///    ``` … ``` fence), parse its inner content.
/// 2. Otherwise parse the whole text.
/// 3. On any parse failure, return `fallback`.
///
/// Contract: never panics, never errors — always returns a `T`.
pub fn best_effort_decode<T: DeserializeOwned>(raw: &str, fallback: T) -> T {
    let candidate = extract_fenced(raw).unwrap_or(raw).trim();
    match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                error = %e,
                raw_len = raw.len(),
                "model output was not valid JSON, using fallback"
            );
            fallback
        }
    }
}

/// Inner content of the first fenced code block, if any.
fn extract_fenced(raw: &str) -> Option<&str> {
    let open = raw.find("```")?;
    let after_fence = &raw[open + 3..];
    // Skip an optional language tag on the fence line.
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Parse an array of raw JSON values leniently — items that fail to
/// deserialize are dropped with a warning instead of failing the whole list.
pub fn lenient_array<T: DeserializeOwned>(items: Vec<serde_json::Value>) -> Vec<T> {
    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if parsed.len() < total {
        tracing::warn!(
            dropped = total - parsed.len(),
            total,
            "dropped malformed items from model output array"
        );
    }
    parsed
}
