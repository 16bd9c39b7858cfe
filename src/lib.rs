//! sentiflow: cleans social-media posts for sentiment analysis
//!
//! Posts arrive as JSON payloads, get normalized by a fixed pipeline of text
//! transformations, are translated when they are not in the source language,
//! and end up in a CSV file, optionally with the emotion reported by an
//! external classifier.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod logging;
pub mod pipeline;
pub mod preprocessing;
pub mod services;
pub mod sink;


pub use config::AppConfig;
pub use errors::*;
