//! CLI command handlers.

pub mod completions;
pub mod edit;
pub mod render;
