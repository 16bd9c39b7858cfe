//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - clean: single-text normalization
//! - run: consuming posts into CSV
//! - info: information display (tables, config)

pub mod clean;
pub mod info;
pub mod run;

// Re-export all public handlers
pub use clean::*;
pub use info::*;
pub use run::*;
