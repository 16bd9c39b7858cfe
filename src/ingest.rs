//! Queue payload model and pull-style message sources
//!
//! A message is one JSON object carrying at least `text` and `lang`. Sources
//! hand out raw payload strings one at a time; parsing happens in the pipeline
//! so a bad payload fails only its own message.

use std::collections::VecDeque;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::BufReader;
use tokio::io::Lines;
use tracing::debug;

use crate::errors::Result;
use crate::errors::SentimentError;

/// A social post as delivered by the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    pub text: String,
    pub lang: String,
}

impl RawPost {
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| SentimentError::InvalidPayload(e.to_string()))
    }

    /// The text as a JSON string literal, quotes and escape sequences included.
    ///
    /// This is the form the normalizer has always been fed and the form written
    /// to the raw-text CSV column.
    pub fn text_literal(&self) -> String {
        serde_json::to_string(&self.text).unwrap_or_else(|_| format!("\"{}\"", self.text))
    }
}

/// Pull-style source of raw queue payloads
#[allow(async_fn_in_trait)]
pub trait MessageSource {
    /// Next payload, or `None` once the source is exhausted
    async fn next_message(&mut self) -> Result<Option<String>>;
}

/// Reads one payload per line from a file or stdin
pub struct JsonLinesSource<R> {
    lines: Lines<BufReader<R>>,
    line_number: usize,
}

impl JsonLinesSource<tokio::fs::File> {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        debug!("Consuming payloads from {}", path.display());
        Ok(Self::new(file))
    }
}

impl JsonLinesSource<tokio::io::Stdin> {
    pub fn stdin() -> Self {
        debug!("Consuming payloads from stdin");
        Self::new(tokio::io::stdin())
    }
}

impl<R: AsyncRead + Unpin> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            line_number: 0,
        }
    }

    /// Line number of the last payload handed out
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: AsyncRead + Unpin> MessageSource for JsonLinesSource<R> {
    async fn next_message(&mut self) -> Result<Option<String>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}

/// In-memory queue of payloads
#[derive(Debug, Default, Clone)]
pub struct VecSource {
    messages: VecDeque<String>,
}

impl VecSource {
    pub fn new<S: Into<String>>(messages: impl IntoIterator<Item = S>) -> Self {
        Self {
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageSource for VecSource {
    async fn next_message(&mut self) -> Result<Option<String>> {
        Ok(self.messages.pop_front())
    }
}
