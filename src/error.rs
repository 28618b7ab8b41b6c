//! Parse errors
//!
//! Every failure carries the kind of violation, a human-readable message and
//! the byte offset where it was detected. Scanner errors and builder errors
//! share one type so the pipeline can propagate either with `?`.

use std::fmt;

/// Kind of well-formedness violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Element name missing, badly formed, or followed by junk
    MalformedName,
    /// Attribute list does not follow `name="value"` syntax
    MalformedAttribute,
    /// `<![` not followed by `CDATA[`
    MalformedCData,
    /// `<!` not followed by `--`, or a comment closed with `--->`
    MalformedComment,
    UnterminatedComment,
    UnterminatedCData,
    /// `<?xml` without a closing `?>`
    UnterminatedProlog,
    /// `&`, `>`, `"` or `'` inside a text run
    DisallowedCharacterInText,
    /// Closing tag does not match the innermost open element
    TagMismatch,
    /// Input ended with elements still open
    UnclosedTags,
}

impl ErrorKind {
    /// Snake-case name, used for atoms on the Elixir side
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MalformedName => "malformed_name",
            ErrorKind::MalformedAttribute => "malformed_attribute",
            ErrorKind::MalformedCData => "malformed_cdata",
            ErrorKind::MalformedComment => "malformed_comment",
            ErrorKind::UnterminatedComment => "unterminated_comment",
            ErrorKind::UnterminatedCData => "unterminated_cdata",
            ErrorKind::UnterminatedProlog => "unterminated_prolog",
            ErrorKind::DisallowedCharacterInText => "disallowed_character_in_text",
            ErrorKind::TagMismatch => "tag_mismatch",
            ErrorKind::UnclosedTags => "unclosed_tags",
        }
    }

    /// True for errors raised by the scanner, false for tree-building errors
    pub fn is_lexical(self) -> bool {
        !matches!(self, ErrorKind::TagMismatch | ErrorKind::UnclosedTags)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse failure at a byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, position: usize) -> Self {
        ParseError {
            kind,
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let err = ParseError::new(ErrorKind::MalformedName, "Invalid element name", 3);
        assert_eq!(err.to_string(), "Invalid element name at byte 3");
    }

    #[test]
    fn test_lexical_split() {
        assert!(ErrorKind::MalformedCData.is_lexical());
        assert!(ErrorKind::UnterminatedProlog.is_lexical());
        assert!(!ErrorKind::TagMismatch.is_lexical());
        assert!(!ErrorKind::UnclosedTags.is_lexical());
    }
}
