//! Key normalization for the destination namespace.
//!
//! Path segments in the destination tree may not contain any of
//! [`RESERVED_CHARS`], so every key written to the export is lowercased,
//! trimmed and stripped of those characters.

/// Characters forbidden in destination path segments.
pub const RESERVED_CHARS: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// Lowercase and trim, without stripping reserved characters.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

/// Map raw text to a safe lookup key.
///
/// The result may be empty; callers treat an empty key as "no valid key"
/// and skip the record.
///
/// ```
/// use lexport_core::normalize::normalize_key;
///
/// assert_eq!(normalize_key("  Dům/Byt "), "důmbyt");
/// assert_eq!(normalize_key("..."), "");
/// ```
pub fn normalize_key(text: &str) -> String {
    // Trim again after stripping so "a. " style input stays idempotent.
    let stripped: String = fold_case(text)
        .chars()
        .filter(|c| !RESERVED_CHARS.contains(c))
        .collect();
    stripped.trim().to_string()
}
