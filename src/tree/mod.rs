//! Tree Module - token stream to nested map/list value
//!
//! - Value: the closed scalar/mapping/sequence union
//! - Builder: stack-based assembly with merge-to-list and collapse rules

pub mod builder;
pub mod value;

pub use builder::{build, Builder, Frame};
pub use value::{Mapping, Value};
