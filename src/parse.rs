//! Document conversion pipeline
//!
//! buffer → prolog skip → scanner → builder → value. A scan error means the
//! builder never runs; a build error discards the partial tree.

use crate::core::scan;
use crate::error::ParseError;
use crate::options::ParseOptions;
use crate::tree::{build, Value};

/// Convert a document using the default `@` attribute prefix
pub fn parse(input: &str) -> Result<Value, ParseError> {
    parse_with_options(input, &ParseOptions::default())
}

/// Convert a document. The root of a successful result is always a mapping.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    scan(input)
        .and_then(|tokens| build(tokens, &options.attr_prefix, input.len()))
        .inspect_err(|err| {
            let stage = if err.kind.is_lexical() { "scan" } else { "build" };
            log::debug!("{} failed ({}): {}", stage, err.kind, err);
        })
}
