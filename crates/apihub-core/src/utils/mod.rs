//! Utility functions for string formatting.

pub mod format;

pub use format::{mask_key, pretty_json, truncate_string};
