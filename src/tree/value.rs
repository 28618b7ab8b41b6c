//! Converted Value Types
//!
//! A document converts to one of three shapes: a scalar string, a mapping
//! from keys to values, or an ordered sequence of values.

use std::collections::HashMap;

/// Key-to-value table of one element. Key order is not significant.
pub type Mapping = HashMap<String, Value>;

/// Result of converting a document or one of its elements
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Value {
    /// Text-only element, attribute value, or text content
    Scalar(String),
    /// Element with attributes and/or children
    Mapping(Mapping),
    /// Repeated sibling elements, in document order
    Sequence(Vec<Value>),
}

impl Value {
    /// Create an empty mapping
    pub fn empty_mapping() -> Self {
        Value::Mapping(Mapping::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }
}

// Drained through a worklist so deeply nested documents don't exhaust the
// stack on drop
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = match self {
            Value::Scalar(_) => return,
            Value::Mapping(mapping) if mapping.is_empty() => return,
            Value::Sequence(items) if items.is_empty() => return,
            Value::Mapping(mapping) => mapping.drain().map(|(_, child)| child).collect::<Vec<_>>(),
            Value::Sequence(items) => std::mem::take(items),
        };
        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::Scalar(_) => {}
                Value::Mapping(mapping) => pending.extend(mapping.drain().map(|(_, child)| child)),
                Value::Sequence(items) => pending.append(items),
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}
