//! Text run handling
//!
//! Character data is not entity-decoded. Instead, markup characters that
//! would need decoding are rejected, and whitespace is normalized.

use super::cursor::is_whitespace;
use std::borrow::Cow;

/// Find the first byte that may not appear undecoded in a text run.
///
/// `&` starts an entity reference, which is not expanded. `>`, `"` and `'`
/// are also refused in text content.
pub fn find_disallowed(content: &str) -> Option<(usize, char)> {
    content
        .bytes()
        .position(|b| matches!(b, b'&' | b'>' | b'"' | b'\''))
        .map(|i| (i, content.as_bytes()[i] as char))
}

/// Trim leading/trailing whitespace and collapse internal runs to one space.
///
/// Borrows when the text is already normalized.
pub fn normalize_whitespace(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim_matches(|c: char| c.is_ascii() && is_whitespace(c as u8));
    let bytes = trimmed.as_bytes();

    let already_normal = bytes
        .iter()
        .enumerate()
        .all(|(i, &b)| match b {
            b'\t' | b'\n' | b'\r' => false,
            b' ' => !bytes.get(i + 1).is_some_and(|&n| is_whitespace(n)),
            _ => true,
        });
    if already_normal {
        return Cow::Borrowed(trimmed);
    }

    let mut out = String::with_capacity(trimmed.len());
    for word in trimmed
        .split(|c: char| c.is_ascii() && is_whitespace(c as u8))
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    Cow::Owned(out)
}
