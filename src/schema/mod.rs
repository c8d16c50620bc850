//! Types and functions to manipulate the contents of the feature table document.
//!
//! These are encoding the rules of the corresponding schema as Rust data types
//! with the help of `serde` deserialization.

mod features;

pub use features::*;
