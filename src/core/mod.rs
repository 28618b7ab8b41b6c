//! Core XML scanning primitives
//!
//! This module contains the lexical half of the converter:
//! - Cursor: invocation-local read position with memchr-accelerated search
//! - Tokenizer: prolog skip plus the tag, comment, CDATA and text sub-machines
//! - Attributes: the attribute list state machine
//! - Text: whitespace normalization and undecoded-character checks

pub mod attributes;
pub mod cursor;
pub mod text;
pub mod tokenizer;

pub use attributes::Attribute;
pub use tokenizer::{scan, Token, TokenKind};
