//! Tree Builder - folds a token stream into a `Value`
//!
//! Non-recursive: open elements live on an explicit stack of frames whose
//! names, bottom to top, are the currently unclosed elements in document
//! order. The bottom frame is a sentinel root with an empty name.
//!
//! - Attributes become `prefix + name` keys holding scalars
//! - Text goes under `#text`, concatenated without separator
//! - A second sibling with the same name turns the entry into a sequence
//! - A finished element holding only `#text` collapses to the bare scalar

use super::value::{Mapping, Value};
use crate::core::{Attribute, Token, TokenKind};
use crate::error::{ErrorKind, ParseError};
use crate::options::TEXT_KEY;
use std::collections::hash_map::Entry;

/// One open element: its name and its mapping so far
#[derive(Debug)]
pub struct Frame<'a> {
    pub name: &'a str,
    pub mapping: Mapping,
}

impl<'a> Frame<'a> {
    fn root() -> Self {
        Frame {
            name: "",
            mapping: Mapping::new(),
        }
    }
}

/// Incremental builder. Feed tokens in document order with `push`, then
/// call `finish`.
pub struct Builder<'a, 'p> {
    attr_prefix: &'p str,
    /// Top of the frame stack
    current: Frame<'a>,
    /// Frames below the top, the sentinel root first
    parents: Vec<Frame<'a>>,
}

impl<'a, 'p> Builder<'a, 'p> {
    pub fn new(attr_prefix: &'p str) -> Self {
        Builder {
            attr_prefix,
            current: Frame::root(),
            parents: Vec::new(),
        }
    }

    /// Number of elements currently open
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    /// Apply one token
    pub fn push(&mut self, token: Token<'a>) -> Result<(), ParseError> {
        match token.kind {
            TokenKind::Text(text) => {
                match self.current.mapping.get_mut(TEXT_KEY) {
                    Some(Value::Scalar(existing)) => existing.push_str(&text),
                    _ => {
                        self.current
                            .mapping
                            .insert(TEXT_KEY.to_string(), Value::Scalar(text.into_owned()));
                    }
                }
            }
            TokenKind::Open { name, attributes } => {
                let mapping = self.attribute_mapping(attributes);
                let parent = std::mem::replace(&mut self.current, Frame { name, mapping });
                self.parents.push(parent);
            }
            TokenKind::SelfClosing { name, attributes } => {
                let mapping = self.attribute_mapping(attributes);
                attach(&mut self.current.mapping, name, finalize(mapping));
            }
            TokenKind::Close { name } => {
                if self.parents.is_empty() || self.current.name != name {
                    return Err(self.mismatch(name, token.span.0));
                }
                if let Some(parent) = self.parents.pop() {
                    let closed = std::mem::replace(&mut self.current, parent);
                    attach(&mut self.current.mapping, closed.name, finalize(closed.mapping));
                }
            }
        }
        Ok(())
    }

    /// Finish building. `end` is the input length, reported if elements are
    /// still open.
    pub fn finish(self, end: usize) -> Result<Value, ParseError> {
        let unclosed = self.parents.len();
        if unclosed > 0 {
            return Err(ParseError::new(
                ErrorKind::UnclosedTags,
                format!("{} unclosed tag(s), innermost <{}>", unclosed, self.current.name),
                end,
            ));
        }
        log::trace!("built root mapping with {} entries", self.current.mapping.len());
        Ok(Value::Mapping(self.current.mapping))
    }

    fn attribute_mapping(&self, attributes: Vec<Attribute<'_>>) -> Mapping {
        attributes
            .into_iter()
            .map(|attr| {
                let mut key = String::with_capacity(self.attr_prefix.len() + attr.name.len());
                key.push_str(self.attr_prefix);
                key.push_str(attr.name);
                (key, Value::Scalar(attr.value.to_string()))
            })
            .collect()
    }

    fn mismatch(&self, name: &str, position: usize) -> ParseError {
        let message = if self.parents.is_empty() {
            format!("Unexpected closing tag </{}>: no element is open", name)
        } else {
            format!("Tag mismatch: <{}> closed with </{}>", self.current.name, name)
        };
        ParseError::new(ErrorKind::TagMismatch, message, position)
    }
}

/// Build a value from a complete token sequence
pub fn build<'a>(
    tokens: impl IntoIterator<Item = Token<'a>>,
    attr_prefix: &str,
    end: usize,
) -> Result<Value, ParseError> {
    let mut builder = Builder::new(attr_prefix);
    for token in tokens {
        builder.push(token)?;
    }
    builder.finish(end)
}

/// Collapse a mapping whose only entry is the text key to its scalar
fn finalize(mut mapping: Mapping) -> Value {
    if mapping.len() == 1 {
        if let Some(text) = mapping.remove(TEXT_KEY) {
            return text;
        }
    }
    Value::Mapping(mapping)
}

/// Store `value` under `name`, turning the entry into a sequence on repeats
fn attach(parent: &mut Mapping, name: &str, value: Value) {
    match parent.entry(name.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Sequence(items) => items.push(value),
            existing => {
                let prior = std::mem::replace(existing, Value::Sequence(Vec::new()));
                *existing = Value::Sequence(vec![prior, value]);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scan;
    use test_log::test;

    fn convert(input: &str, prefix: &str) -> Result<Value, ParseError> {
        build(scan(input)?, prefix, input.len())
    }

    fn mapping(entries: &[(&str, Value)]) -> Value {
        Value::Mapping(entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
    }

    #[test]
    fn test_empty_token_stream() {
        assert_eq!(build(Vec::new(), "@", 0).unwrap(), Value::empty_mapping());
    }

    #[test]
    fn test_attributes_become_prefixed_keys() {
        let value = convert("<p a=\"1\" b=\"2\"/>", "@").unwrap();
        assert_eq!(
            value,
            mapping(&[("p", mapping(&[("@a", "1".into()), ("@b", "2".into())]))])
        );
    }

    #[test]
    fn test_text_collapses_to_scalar() {
        let value = convert("<x>hello</x>", "@").unwrap();
        assert_eq!(value, mapping(&[("x", "hello".into())]));
    }

    #[test]
    fn test_text_with_attributes_is_kept_as_key() {
        let value = convert("<p width=\"10\">Hello World</p>", "@").unwrap();
        assert_eq!(
            value,
            mapping(&[("p", mapping(&[("@width", "10".into()), ("#text", "Hello World".into())]))])
        );
    }

    #[test]
    fn test_text_concatenates_without_separator() {
        let value = convert("<p>Hey <b>bold</b>There</p>", "@").unwrap();
        assert_eq!(
            value,
            mapping(&[("p", mapping(&[("#text", "HeyThere".into()), ("b", "bold".into())]))])
        );
    }

    #[test]
    fn test_repeated_siblings_merge_to_list() {
        let value = convert("<r><a/><a/><a/></r>", "@").unwrap();
        let items = value.get("r").and_then(|r| r.get("a")).and_then(Value::as_sequence);
        assert_eq!(items.map(|i| i.len()), Some(3));
    }

    #[test]
    fn test_collapse_applies_to_last_list_slot() {
        let value = convert("<r><a x=\"1\"/><a>two</a><a>three</a></r>", "@").unwrap();
        assert_eq!(
            value,
            mapping(&[(
                "r",
                mapping(&[(
                    "a",
                    Value::Sequence(vec![mapping(&[("@x", "1".into())]), "two".into(), "three".into()])
                )])
            )])
        );
    }

    #[test]
    fn test_same_name_at_different_depths_does_not_merge() {
        let value = convert("<a><a>inner</a></a>", "@").unwrap();
        assert_eq!(value, mapping(&[("a", mapping(&[("a", "inner".into())]))]));
    }

    #[test]
    fn test_empty_prefix_merges_with_child() {
        let value = convert("<r a=\"1\"><a>t</a></r>", "").unwrap();
        assert_eq!(
            value,
            mapping(&[("r", mapping(&[("a", Value::Sequence(vec!["1".into(), "t".into()]))]))])
        );
    }

    #[test]
    fn test_self_closing_matches_empty_pair() {
        assert_eq!(convert("<x/>", "@").unwrap(), convert("<x></x>", "@").unwrap());
        assert_eq!(convert("<x/>", "@").unwrap(), mapping(&[("x", Value::empty_mapping())]));
    }

    #[test]
    fn test_multiple_roots() {
        let value = convert("<pizza></pizza><book><p></p></book><card/>", "@").unwrap();
        assert_eq!(
            value,
            mapping(&[
                ("pizza", Value::empty_mapping()),
                ("book", mapping(&[("p", Value::empty_mapping())])),
                ("card", Value::empty_mapping()),
            ])
        );
    }

    #[test]
    fn test_top_level_text() {
        let value = convert("loose <a/> words", "@").unwrap();
        assert_eq!(value.get("#text").and_then(Value::as_str), Some("loosewords"));
    }

    #[test]
    fn test_tag_mismatch() {
        let err = convert("<a><b></a></b>", "@").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TagMismatch);
        assert_eq!(err.position, 6);
        assert!(err.message.contains("<b>"));
        assert!(err.message.contains("</a>"));
    }

    #[test]
    fn test_close_without_open() {
        let err = convert("</p>", "@").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TagMismatch);
        assert_eq!(err.position, 0);

        let err = convert("<a/></a>", "@").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TagMismatch);
        assert_eq!(err.position, 4);
    }

    #[test]
    fn test_unclosed_tags() {
        let err = convert("<a><b></b>", "@").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnclosedTags);
        assert_eq!(err.position, 10);
        assert!(err.message.starts_with("1 unclosed"));

        let err = convert("<a><b><c>", "@").unwrap_err();
        assert!(err.message.starts_with("3 unclosed"));
    }

    #[test]
    fn test_incremental_depth() {
        let tokens = scan("<a><b></b></a>").unwrap();
        let mut builder = Builder::new("@");
        let mut depths = Vec::new();
        for token in tokens {
            builder.push(token).unwrap();
            depths.push(builder.depth());
        }
        assert_eq!(depths, vec![1, 2, 1, 0]);
        assert!(builder.finish(14).is_ok());
    }
}
