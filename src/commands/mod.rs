//! CLI command implementations.

mod reorganize;

pub use reorganize::{ReorganizeOptions, reorganize, reorganize_with, success_message};
