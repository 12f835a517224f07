//! Key selection for rescans and the manual trigger.

/// File suffix every selected key must carry (compared case-insensitively).
pub const PDF_SUFFIX: &str = ".pdf";

/// True when the lowercase key contains `marker` and ends with `.pdf`.
///
/// `marker` is expected in lowercase.
pub fn matches_rescan_filter(key: &str, marker: &str) -> bool {
    let lower = key.to_lowercase();
    lower.ends_with(PDF_SUFFIX) && lower.contains(marker)
}
