//! File and directory names derived from CSV fields.

/// Longest generated name, in characters.
pub const MAX_NAME_LEN: usize = 200;

/// Name used when nothing usable is left.
pub const FALLBACK_NAME: &str = "qr";

/// Turn arbitrary text into a portable file name component.
///
/// Surrounding whitespace is trimmed, every run of characters other
/// than ASCII letters, digits, `-` and `_` becomes a single `_`, and the
/// result is cut to [`MAX_NAME_LEN`] characters. Empty input gives
/// [`FALLBACK_NAME`].
#[must_use]
pub fn safe_filename(text: &str) -> String {
    let mut name = String::with_capacity(text.len().min(MAX_NAME_LEN));
    let mut in_run = false;
    for ch in text.trim().chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            name.push(ch);
            in_run = false;
        } else if !in_run {
            name.push('_');
            in_run = true;
        }
    }

    // Only ASCII is ever pushed, so byte length equals character count.
    name.truncate(MAX_NAME_LEN);
    if name.is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        name
    }
}
