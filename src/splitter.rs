//! Nesting-aware sibling splitting for the call-graph grammar
//!
//! Splits an argument string on `+` only where the parenthesis depth is zero,
//! so sibling call entries separate while nested call graphs stay intact.
//! Empty segments are dropped, which silently absorbs leading, trailing and
//! doubled separators.

/// Split `s` on top-level `+` separators.
///
/// A separator counts only when the running `(`/`)` depth is zero at its
/// position. Delimiter balance is not validated; on unbalanced input the
/// counter may go negative and splitting still follows whatever the counter
/// reads. Always returns a (possibly empty) list, never fails.
pub(crate) fn split_top_level(s: &str) -> Vec<&str> {
    let mut depth: i32 = 0;
    let mut parts = Vec::new();
    let mut start = 0;

    for (pos, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            '+' if depth == 0 => {
                parts.push(&s[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);

    parts.retain(|part| !part.is_empty());
    parts
}
