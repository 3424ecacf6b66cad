//! Text helpers

/// Keep at most `limit` characters of `value`.
///
/// Counts Unicode scalar values, not bytes, so a cut never lands inside a
/// multi-byte character. Inputs at or under the limit are returned whole.
pub fn truncate_chars(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}
