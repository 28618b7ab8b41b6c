//! Forward-only read position over one input buffer
//!
//! Each `scan` call owns its own `Cursor` and lends it by `&mut` to the
//! sub-machines, so no scan position ever outlives a single invocation.
//! Searches use memchr (SIMD where available).

use memchr::{memchr, memmem};

/// Cursor over a UTF-8 buffer, addressed by byte offset
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Length of the whole buffer
    #[inline]
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Byte at an absolute offset
    #[inline]
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        self.input.as_bytes().get(pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input.as_bytes()[self.pos.min(self.input.len())..].starts_with(needle)
    }

    /// Slice of the input between two offsets.
    ///
    /// Both offsets must sit on char boundaries: the start of input, the end of
    /// input, or an ASCII byte.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Find next occurrence of a byte at or after the cursor
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        let from = self.pos.min(self.input.len());
        memchr(byte, &self.input.as_bytes()[from..]).map(|i| from + i)
    }

    /// Find next occurrence of a byte sequence at or after the cursor
    #[inline]
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        let from = self.pos.min(self.input.len());
        memmem::find(&self.input.as_bytes()[from..], needle).map(|i| from + i)
    }

    /// Read a name: one start character followed by name characters.
    /// Returns `None` without moving if the current byte cannot start a name.
    ///
    /// Every byte of a multi-byte character is >= 0x80 and counts as a name
    /// byte, so the run always stops on an ASCII byte or at end of input.
    pub fn read_name(&mut self) -> Option<&'a str> {
        if !self.peek().is_some_and(is_name_start_char) {
            return None;
        }
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let mut end = start + 1;
        while bytes.get(end).copied().is_some_and(is_name_char) {
            end += 1;
        }
        self.pos = end;
        Some(self.slice(start, end))
    }
}

/// Name start: ASCII letter, underscore, colon, or any non-ASCII byte
/// (part of a UTF-8 encoded letter)
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Name continuation: name start characters plus digits, `-` and `.`
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Render a byte for diagnostics
pub fn describe_byte(b: u8) -> String {
    match b {
        b' ' => "space".to_string(),
        b'\t' => "tab".to_string(),
        b'\n' => "newline".to_string(),
        b'\r' => "carriage return".to_string(),
        _ if b.is_ascii_graphic() => format!("'{}'", b as char),
        _ => format!("byte 0x{:02X}", b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_byte() {
        let cursor = Cursor::new("hello <world>");
        assert_eq!(cursor.find_byte(b'<'), Some(6));
    }

    #[test]
    fn test_find_sequence_from_position() {
        let mut cursor = Cursor::new("a]]b]]>");
        cursor.set_position(2);
        assert_eq!(cursor.find(b"]]>"), Some(4));
        cursor.set_position(7);
        assert_eq!(cursor.find(b"]]>"), None);
    }

    #[test]
    fn test_read_name() {
        let mut cursor = Cursor::new("element-name.v2>");
        assert_eq!(cursor.read_name(), Some("element-name.v2"));
        assert_eq!(cursor.position(), 15);
    }

    #[test]
    fn test_read_name_rejects_digit_start() {
        let mut cursor = Cursor::new("9lives");
        assert_eq!(cursor.read_name(), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_name_non_ascii() {
        let mut cursor = Cursor::new("größe>");
        assert_eq!(cursor.read_name(), Some("größe"));
        assert_eq!(cursor.peek(), Some(b'>'));
    }

    #[test]
    fn test_read_name_non_ascii_start() {
        let mut cursor = Cursor::new("ñandú/>");
        assert_eq!(cursor.read_name(), Some("ñandú"));
        assert_eq!(cursor.peek(), Some(b'/'));

        let mut cursor = Cursor::new("日本");
        assert_eq!(cursor.read_name(), Some("日本"));
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_describe_byte() {
        assert_eq!(describe_byte(b'='), "'='");
        assert_eq!(describe_byte(b'\n'), "newline");
        assert_eq!(describe_byte(0x07), "byte 0x07");
    }

    #[test]
    fn test_peek_past_end() {
        let mut cursor = Cursor::new("<");
        assert_eq!(cursor.peek_at(1), None);
        cursor.advance(1);
        assert!(cursor.is_eof());
        assert!(!cursor.starts_with(b">"));
    }
}
