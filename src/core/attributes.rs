//! XML Attribute Parsing
//!
//! Parses the attribute list of an opening tag with an explicit state
//! machine, from the whitespace after the element name through the closing
//! `>` or `/>`.

use super::cursor::{describe_byte, is_name_char, is_name_start_char, is_whitespace, Cursor};
use crate::error::{ErrorKind, ParseError};

/// A parsed XML attribute, borrowed from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    /// Raw value between the quotes, not entity-decoded
    pub value: &'a str,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Attribute { name, value }
    }
}

/// Position within an attribute list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrState {
    /// After the element name or a committed value; whitespace required next
    Separator,
    /// Between attributes, waiting for a name
    AttrStart,
    /// Inside an attribute name
    Name,
    /// Whitespace after a name, before `=`
    PostName,
    /// After `=`, waiting for the opening quote
    Quote,
    /// Inside a quoted value
    Value,
}

/// How an opening tag was terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEnd {
    /// `>`
    Open,
    /// `/>`
    SelfClosing,
}

/// Parse attributes starting at the whitespace that follows an element name.
///
/// On success the cursor sits just past the tag's `>`.
pub fn scan_attributes<'a>(cursor: &mut Cursor<'a>) -> Result<(Vec<Attribute<'a>>, TagEnd), ParseError> {
    let mut attributes: Vec<Attribute<'a>> = Vec::new();
    let mut state = AttrState::Separator;
    let mut key_start = 0;
    let mut key: &'a str = "";
    let mut quote = b'"';

    loop {
        let pos = cursor.position();
        let Some(b) = cursor.peek() else {
            return Err(malformed("Unexpected end of input inside tag", cursor.input_len()));
        };

        if matches!(state, AttrState::Separator | AttrState::AttrStart) {
            if b == b'/' && cursor.peek_at(1) == Some(b'>') {
                cursor.advance(2);
                return Ok((attributes, TagEnd::SelfClosing));
            }
            if b == b'>' {
                cursor.advance(1);
                return Ok((attributes, TagEnd::Open));
            }
        }

        match state {
            AttrState::Separator => {
                if !is_whitespace(b) {
                    return Err(malformed(
                        format!("Expected whitespace before attribute, found {}", describe_byte(b)),
                        pos,
                    ));
                }
                state = AttrState::AttrStart;
            }
            AttrState::AttrStart => {
                if is_name_start_char(b) {
                    key_start = pos;
                    state = AttrState::Name;
                } else if !is_whitespace(b) {
                    return Err(malformed(
                        format!("Invalid attribute name start {}", describe_byte(b)),
                        pos,
                    ));
                }
            }
            AttrState::Name => {
                if b == b'=' {
                    key = cursor.slice(key_start, pos);
                    state = AttrState::Quote;
                } else if is_whitespace(b) {
                    key = cursor.slice(key_start, pos);
                    state = AttrState::PostName;
                } else if !is_name_char(b) {
                    return Err(malformed(
                        format!(
                            "Unexpected {} in attribute name '{}'",
                            describe_byte(b),
                            cursor.slice(key_start, pos)
                        ),
                        pos,
                    ));
                }
            }
            AttrState::PostName => {
                if b == b'=' {
                    state = AttrState::Quote;
                } else if !is_whitespace(b) {
                    return Err(malformed(
                        format!("Attribute '{}' must be followed by '='", key),
                        pos,
                    ));
                }
            }
            AttrState::Quote => {
                if b == b'"' || b == b'\'' {
                    quote = b;
                    state = AttrState::Value;
                } else if !is_whitespace(b) {
                    return Err(malformed(
                        format!("Value of attribute '{}' must be quoted", key),
                        pos,
                    ));
                }
            }
            AttrState::Value => {
                let value_start = pos;
                let Some(value_end) = cursor.find_byte(quote) else {
                    return Err(malformed(
                        format!("Unterminated value for attribute '{}'", key),
                        cursor.input_len(),
                    ));
                };
                if attributes.iter().any(|attr| attr.name == key) {
                    return Err(malformed(format!("Duplicate attribute '{}'", key), key_start));
                }
                attributes.push(Attribute::new(key, cursor.slice(value_start, value_end)));
                cursor.set_position(value_end + 1);
                state = AttrState::Separator;
                continue;
            }
        }

        cursor.advance(1);
    }
}

fn malformed(message: impl Into<String>, position: usize) -> ParseError {
    ParseError::new(ErrorKind::MalformedAttribute, message, position)
}
