//! Parallel batch conversion
//!
//! Uses Rayon to convert many independent documents at once. Each document
//! gets its own cursor and frame stack, so nothing is shared between workers.

use crate::error::ParseError;
use crate::options::ParseOptions;
use crate::parse::parse_with_options;
use crate::tree::Value;
use rayon::prelude::*;

/// Convert multiple documents in parallel. Results are in input order.
pub fn parse_parallel(inputs: &[&str], options: &ParseOptions) -> Vec<Result<Value, ParseError>> {
    log::debug!("parsing batch of {} documents", inputs.len());
    inputs
        .par_iter()
        .map(|input| parse_with_options(input, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parallel_parse() {
        let inputs = ["<a>1</a>", "<b x='2'/>", "<c><d/><d/></c>"];
        let results = parse_parallel(&inputs, &ParseOptions::default());
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(
            results[0].as_ref().ok().and_then(|v| v.get("a")).and_then(Value::as_str),
            Some("1")
        );
    }

    #[test]
    fn test_errors_stay_with_their_document() {
        let inputs = ["<ok/>", "<broken>", "<also_ok/>"];
        let results = parse_parallel(&inputs, &ParseOptions::default());
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().kind, ErrorKind::UnclosedTags);
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_matches_sequential_results() {
        let inputs: Vec<String> = (0..64)
            .map(|i| format!("<r n=\"{}\"><item>{}</item><item/></r>", i, i * 2))
            .collect();
        let refs: Vec<&str> = inputs.iter().map(String::as_str).collect();
        let options = ParseOptions::new().with_attr_prefix("-");

        let parallel = parse_parallel(&refs, &options);
        let sequential: Vec<_> = refs.iter().map(|s| parse_with_options(s, &options)).collect();
        assert_eq!(parallel, sequential);
    }
}
