//! Elixir Term Conversion Utilities
//!
//! Converts converted values, tokens and errors to Elixir terms.

use crate::core::{Attribute, Token, TokenKind};
use crate::error::ParseError;
use crate::tree::{Mapping, Value};
use rustler::{Encoder, Env, NewBinary, NifResult, Term};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    open,
    close,
    self_closing,
    text,
    malformed_name,
    malformed_attribute,
    malformed_cdata,
    malformed_comment,
    unterminated_comment,
    unterminated_cdata,
    unterminated_prolog,
    disallowed_character_in_text,
    tag_mismatch,
    unclosed_tags,
}

/// Pending work for `value_to_term`
enum Step<'v> {
    Encode(&'v Value),
    /// Children are encoded; pair them with the mapping's keys
    Map(&'v Mapping),
    /// Children are encoded; collect this many into a list
    List(usize),
}

/// Convert a value: scalars to binaries, mappings to maps with binary keys,
/// sequences to lists.
///
/// Walks the tree with an explicit stack; BEAM scheduler threads have small
/// stacks and documents can nest arbitrarily deep.
pub fn value_to_term<'a>(env: Env<'a>, value: &Value) -> NifResult<Term<'a>> {
    let mut steps = vec![Step::Encode(value)];
    // Finished terms. Children of one node land here in reverse order.
    let mut done: Vec<Term<'a>> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Encode(Value::Scalar(s)) => done.push(str_to_binary(env, s)),
            Step::Encode(Value::Mapping(mapping)) => {
                steps.push(Step::Map(mapping));
                steps.extend(mapping.values().map(Step::Encode));
            }
            Step::Encode(Value::Sequence(items)) => {
                steps.push(Step::List(items.len()));
                steps.extend(items.iter().map(Step::Encode));
            }
            Step::Map(mapping) => {
                let children = done.split_off(done.len().saturating_sub(mapping.len()));
                let pairs: Vec<_> = mapping
                    .keys()
                    .map(|key| str_to_binary(env, key))
                    .zip(children.into_iter().rev())
                    .collect();
                done.push(Term::map_from_pairs(env, &pairs)?);
            }
            Step::List(len) => {
                let children = done.split_off(done.len().saturating_sub(len));
                let mut list = Term::list_new_empty(env);
                for child in children {
                    list = list.list_prepend(child);
                }
                done.push(list);
            }
        }
    }

    done.pop().ok_or(rustler::Error::BadArg)
}

/// `{:ok, term}` for a converted document, `{:error, {kind, message, position}}` otherwise
pub fn result_to_term<'a>(env: Env<'a>, result: &Result<Value, ParseError>) -> NifResult<Term<'a>> {
    match result {
        Ok(value) => Ok((rustler::types::atom::ok(), value_to_term(env, value)?).encode(env)),
        Err(err) => Ok(error_to_term(env, err)),
    }
}

/// `{:error, {kind, message, position}}`
pub fn error_to_term<'a>(env: Env<'a>, err: &ParseError) -> Term<'a> {
    let kind = error_kind_atom(err);
    (
        rustler::types::atom::error(),
        (kind, str_to_binary(env, &err.message), err.position),
    )
        .encode(env)
}

fn error_kind_atom(err: &ParseError) -> rustler::Atom {
    use crate::error::ErrorKind;

    match err.kind {
        ErrorKind::MalformedName => malformed_name(),
        ErrorKind::MalformedAttribute => malformed_attribute(),
        ErrorKind::MalformedCData => malformed_cdata(),
        ErrorKind::MalformedComment => malformed_comment(),
        ErrorKind::UnterminatedComment => unterminated_comment(),
        ErrorKind::UnterminatedCData => unterminated_cdata(),
        ErrorKind::UnterminatedProlog => unterminated_prolog(),
        ErrorKind::DisallowedCharacterInText => disallowed_character_in_text(),
        ErrorKind::TagMismatch => tag_mismatch(),
        ErrorKind::UnclosedTags => unclosed_tags(),
    }
}

/// Convert scanned tokens to a list of event tuples
pub fn tokens_to_term<'a>(env: Env<'a>, tokens: Vec<Token<'_>>) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for token in tokens.into_iter().rev() {
        list = list.list_prepend(token_to_term(env, token));
    }
    list
}

/// Convert a single token to an Elixir term
pub fn token_to_term<'a>(env: Env<'a>, token: Token<'_>) -> Term<'a> {
    match token.kind {
        TokenKind::Open { name, attributes } => {
            (open(), str_to_binary(env, name), attributes_to_term(env, &attributes)).encode(env)
        }
        TokenKind::SelfClosing { name, attributes } => (
            self_closing(),
            str_to_binary(env, name),
            attributes_to_term(env, &attributes),
        )
            .encode(env),
        TokenKind::Close { name } => (close(), str_to_binary(env, name)).encode(env),
        TokenKind::Text(content) => (text(), str_to_binary(env, &content)).encode(env),
    }
}

fn attributes_to_term<'a>(env: Env<'a>, attributes: &[Attribute<'_>]) -> Term<'a> {
    let mut attrs = Term::list_new_empty(env);
    for attr in attributes.iter().rev() {
        let tuple = (str_to_binary(env, attr.name), str_to_binary(env, attr.value));
        attrs = attrs.list_prepend(tuple.encode(env));
    }
    attrs
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
