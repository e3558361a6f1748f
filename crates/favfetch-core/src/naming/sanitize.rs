//! Filesystem-safe stems.

/// Replaces NUL, `/`, `\`, and control characters with `_`.
///
/// Runs of replaced characters collapse into one `_`. Everything else,
/// including dots and non-ASCII text, is kept so the mapping stays predictable.
pub fn sanitize_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_replaced = false;

    for c in name.chars() {
        if c == '\0' || c == '/' || c == '\\' || c.is_control() {
            if !prev_replaced {
                out.push('_');
            }
            prev_replaced = true;
        } else {
            out.push(c);
            prev_replaced = false;
        }
    }
    out
}
