//! XML Tokenizer - single-pass scanner producing element and text tokens
//!
//! The buffer is scanned once, front to back. Each markup construct is
//! handled by its own sub-machine taking the invocation's `Cursor` by
//! `&mut`; the first error from any of them ends the scan.
//!
//! - Prolog: `<?xml ... ?>`, only at the very start, discarded
//! - Close tag: `</name>`
//! - Open tag: `<name attr="v">` or `<name/>`
//! - Comment: `<!-- ... -->`, discarded
//! - CDATA: `<![CDATA[ ... ]]>`, emitted verbatim as text
//! - Text run: whitespace-normalized character data

use super::attributes::{scan_attributes, Attribute, TagEnd};
use super::cursor::{describe_byte, is_name_char, is_whitespace, Cursor};
use super::text::{find_disallowed, normalize_whitespace};
use crate::error::{ErrorKind, ParseError};
use std::borrow::Cow;

/// Type of token, with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Element start tag: `<element ...>`
    Open {
        name: &'a str,
        attributes: Vec<Attribute<'a>>,
    },
    /// Element end tag: `</element>`
    Close { name: &'a str },
    /// Empty element: `<element .../>`
    SelfClosing {
        name: &'a str,
        attributes: Vec<Attribute<'a>>,
    },
    /// Normalized text or verbatim CDATA content, never empty
    Text(Cow<'a, str>),
}

/// A scanned token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind<'a>, start: usize, end: usize) -> Self {
        Token {
            kind,
            span: (start, end),
        }
    }
}

/// Scan a complete buffer into tokens.
///
/// Comments and the prolog are consumed without producing tokens.
pub fn scan(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut tokens = Vec::new();

    let result = skip_prolog(&mut cursor).and_then(|()| {
        while !cursor.is_eof() {
            if let Some(token) = next_token(&mut cursor)? {
                tokens.push(token);
            }
        }
        Ok(())
    });

    result?;
    log::trace!("scanned {} tokens from {} bytes", tokens.len(), input.len());
    Ok(tokens)
}

/// Dispatch on lookahead at the cursor. Returns `None` for discarded markup
/// and whitespace-only text.
fn next_token<'a>(cursor: &mut Cursor<'a>) -> Result<Option<Token<'a>>, ParseError> {
    if cursor.peek() != Some(b'<') {
        return scan_text(cursor);
    }

    match (cursor.peek_at(1), cursor.peek_at(2)) {
        (Some(b'/'), _) => scan_close_tag(cursor).map(Some),
        (Some(b'!'), Some(b'[')) => scan_cdata(cursor),
        (Some(b'!'), _) => scan_comment(cursor).map(|()| None),
        _ => scan_open_tag(cursor).map(Some),
    }
}

/// Skip a leading `<?xml ... ?>` declaration, if the buffer starts with one
pub fn skip_prolog(cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    if cursor.position() != 0 || !cursor.starts_with(b"<?xml") {
        return Ok(());
    }

    cursor.advance(5);
    match cursor.find(b"?>") {
        Some(end) => {
            cursor.set_position(end + 2);
            Ok(())
        }
        None => Err(ParseError::new(
            ErrorKind::UnterminatedProlog,
            "XML declaration is missing its closing '?>'",
            cursor.input_len(),
        )),
    }
}

/// Parse an end tag
fn scan_close_tag<'a>(cursor: &mut Cursor<'a>) -> Result<Token<'a>, ParseError> {
    let start = cursor.position();
    cursor.advance(2); // Skip '</'

    let Some(name) = cursor.read_name() else {
        return Err(malformed_name(
            cursor,
            "Invalid element name in end tag: must start with letter, underscore, or colon",
        ));
    };

    // Whitespace may trail the name, but nothing else
    let mut seen_whitespace = false;
    loop {
        match cursor.peek() {
            Some(b'>') => {
                cursor.advance(1);
                return Ok(Token::new(TokenKind::Close { name }, start, cursor.position()));
            }
            Some(b) if is_whitespace(b) => seen_whitespace = true,
            Some(b) if is_name_char(b) && !seen_whitespace => {}
            Some(b) => {
                return Err(malformed_name(
                    cursor,
                    format!("Unexpected {} in end tag </{}>", describe_byte(b), name),
                ));
            }
            None => {
                return Err(malformed_name(cursor, format!("Unterminated end tag </{}", name)));
            }
        }
        cursor.advance(1);
    }
}

/// Parse a start tag or empty element tag
fn scan_open_tag<'a>(cursor: &mut Cursor<'a>) -> Result<Token<'a>, ParseError> {
    let start = cursor.position();
    cursor.advance(1); // Skip '<'

    let Some(name) = cursor.read_name() else {
        return Err(malformed_name(
            cursor,
            "Invalid element name: must start with letter, underscore, or colon",
        ));
    };

    let (attributes, end) = match cursor.peek() {
        Some(b'/') if cursor.peek_at(1) == Some(b'>') => {
            cursor.advance(2);
            (Vec::new(), TagEnd::SelfClosing)
        }
        Some(b'>') => {
            cursor.advance(1);
            (Vec::new(), TagEnd::Open)
        }
        Some(b) if is_whitespace(b) => scan_attributes(cursor)?,
        Some(b) => {
            return Err(malformed_name(
                cursor,
                format!("Unexpected {} after element name '{}'", describe_byte(b), name),
            ));
        }
        None => {
            return Err(malformed_name(cursor, format!("Unterminated start tag <{}", name)));
        }
    };

    let kind = match end {
        TagEnd::Open => TokenKind::Open { name, attributes },
        TagEnd::SelfClosing => TokenKind::SelfClosing { name, attributes },
    };
    Ok(Token::new(kind, start, cursor.position()))
}

/// Skip a comment `<!--...-->`
fn scan_comment(cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    cursor.advance(2); // Skip '<!'

    if !cursor.starts_with(b"--") {
        return Err(ParseError::new(
            ErrorKind::MalformedComment,
            "Invalid declaration: expected '<!--' to open a comment",
            cursor.position(),
        ));
    }
    cursor.advance(2);
    let content_start = cursor.position();

    let Some(end) = cursor.find(b"-->") else {
        return Err(ParseError::new(
            ErrorKind::UnterminatedComment,
            format!("Comment opened at byte {} is never closed", content_start - 4),
            cursor.input_len(),
        ));
    };

    if end > content_start && cursor.byte_at(end - 1) == Some(b'-') {
        return Err(ParseError::new(
            ErrorKind::MalformedComment,
            "Comment cannot end with '--->'",
            end - 1,
        ));
    }

    cursor.set_position(end + 3);
    Ok(())
}

/// Parse a CDATA section `<![CDATA[...]]>` into a verbatim text token
fn scan_cdata<'a>(cursor: &mut Cursor<'a>) -> Result<Option<Token<'a>>, ParseError> {
    let start = cursor.position();
    cursor.advance(3); // Skip '<!['

    if !cursor.starts_with(b"CDATA[") {
        return Err(ParseError::new(
            ErrorKind::MalformedCData,
            "Invalid declaration: expected '<![CDATA['",
            cursor.position(),
        ));
    }
    cursor.advance(6);
    let content_start = cursor.position();

    let Some(end) = cursor.find(b"]]>") else {
        return Err(ParseError::new(
            ErrorKind::UnterminatedCData,
            format!("CDATA section opened at byte {} is never closed", start),
            cursor.input_len(),
        ));
    };

    cursor.set_position(end + 3);
    if end == content_start {
        return Ok(None);
    }
    let content = cursor.slice(content_start, end);
    Ok(Some(Token::new(TokenKind::Text(Cow::Borrowed(content)), start, cursor.position())))
}

/// Parse text content up to the next '<' or end of input
fn scan_text<'a>(cursor: &mut Cursor<'a>) -> Result<Option<Token<'a>>, ParseError> {
    let start = cursor.position();
    let end = cursor.find_byte(b'<').unwrap_or(cursor.input_len());
    let raw = cursor.slice(start, end);

    if let Some((offset, c)) = find_disallowed(raw) {
        return Err(ParseError::new(
            ErrorKind::DisallowedCharacterInText,
            format!("Character '{}' is not allowed in text content", c),
            start + offset,
        ));
    }

    cursor.set_position(end);
    let text = normalize_whitespace(raw);
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(Token::new(TokenKind::Text(text), start, end)))
}

fn malformed_name(cursor: &Cursor<'_>, message: impl Into<String>) -> ParseError {
    ParseError::new(ErrorKind::MalformedName, message, cursor.position())
}
