//! Conversion options

/// Mapping key holding an element's direct text content
pub const TEXT_KEY: &str = "#text";

/// Prefix prepended to attribute names unless overridden
pub const DEFAULT_ATTR_PREFIX: &str = "@";

/// Options controlling how a document maps onto a `Value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Prepended to every attribute key. Not validated or escaped.
    pub attr_prefix: String,
}

impl ParseOptions {
    pub fn new() -> Self {
        ParseOptions {
            attr_prefix: DEFAULT_ATTR_PREFIX.to_string(),
        }
    }

    pub fn with_attr_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attr_prefix = prefix.into();
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefix() {
        assert_eq!(ParseOptions::default().attr_prefix, "@");
    }

    #[test]
    fn test_override_prefix() {
        let options = ParseOptions::new().with_attr_prefix("$");
        assert_eq!(options.attr_prefix, "$");
        assert_eq!(ParseOptions::new().with_attr_prefix("").attr_prefix, "");
    }
}
