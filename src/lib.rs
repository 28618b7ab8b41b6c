//! xmldict - XML documents as nested maps and lists
//!
//! A single-pass scanner tokenizes the markup, then a stack-based builder
//! folds the tokens into a `Value`:
//! - attributes become prefixed keys (`@name` by default)
//! - text content goes under `#text`
//! - repeated sibling elements become a list
//! - elements holding only text collapse to the text itself
//!
//! The same pipeline is exposed to Elixir as NIFs (`XmlDict.Native`).

use rustler::{Env, NifResult, Term};

mod alloc;
pub mod batch;
pub mod core;
pub mod error;
pub mod options;
mod parse;
mod term;
pub mod tree;

pub use crate::core::{scan, Attribute, Token, TokenKind};
pub use error::{ErrorKind, ParseError};
pub use options::{ParseOptions, DEFAULT_ATTR_PREFIX, TEXT_KEY};
pub use parse::{parse, parse_with_options};
pub use tree::{Mapping, Value};

use term::{error_to_term, result_to_term, tokens_to_term};

// ============================================================================
// Memory Tracking NIFs
// ============================================================================

#[rustler::nif]
fn get_rust_memory() -> usize {
    alloc::current_bytes()
}

#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    alloc::peak_bytes()
}

#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    alloc::reset_peak()
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert a document into a map.
/// Returns {:ok, map} or {:error, {kind, message, position}}
#[rustler::nif(name = "parse")]
fn parse_nif<'a>(env: Env<'a>, input: &str, attr_prefix: &str) -> NifResult<Term<'a>> {
    let options = ParseOptions::new().with_attr_prefix(attr_prefix);
    result_to_term(env, &parse_with_options(input, &options))
}

/// Convert many documents in parallel, one result tuple per document
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_many<'a>(env: Env<'a>, inputs: Vec<&str>, attr_prefix: &str) -> NifResult<Term<'a>> {
    let options = ParseOptions::new().with_attr_prefix(attr_prefix);
    let results = batch::parse_parallel(&inputs, &options);

    let mut list = Term::list_new_empty(env);
    for result in results.iter().rev() {
        list = list.list_prepend(result_to_term(env, result)?);
    }
    Ok(list)
}

/// Scan a document and return its token events.
/// Returns {:ok, events} or {:error, {kind, message, position}}
#[rustler::nif]
fn tokenize<'a>(env: Env<'a>, input: &str) -> NifResult<Term<'a>> {
    use rustler::Encoder;

    match scan(input) {
        Ok(tokens) => Ok((rustler::types::atom::ok(), tokens_to_term(env, tokens)).encode(env)),
        Err(err) => Ok(error_to_term(env, &err)),
    }
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.XmlDict.Native");
