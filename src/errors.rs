use std::path::PathBuf;

use thiserror::Error;

/// Lookup table a load fault refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Emojis,
    Abbreviations,
    Stopwords,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Emojis => write!(f, "emojis"),
            Self::Abbreviations => write!(f, "abbreviations"),
            Self::Stopwords => write!(f, "stopwords"),
        }
    }
}

/// Faults raised while loading a preprocessing table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Error reading {table} table at {}: {source}", path.display())]
    Unreadable {
        table: TableKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {table} table row {line}: expected at least {expected} fields")]
    Malformed {
        table: TableKind,
        line: usize,
        expected: usize,
    },

    #[error("Failed to compile {table} matcher: {source}")]
    Pattern {
        table: TableKind,
        #[source]
        source: regex::Error,
    },
}

#[derive(Error, Debug)]
pub enum SentimentError {
    /// A preprocessing table could not be loaded. Callers decide whether this is fatal.
    #[error("Configuration error: {0}")]
    Configuration(#[from] TableError),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Translation error: {0}")]
    TranslationError(String),

    #[error("Classification error: {0}")]
    ClassificationError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl SentimentError {
    /// True for faults that come from the deployment (tables, config) rather than a single post
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::ConfigError(_) | Self::TomlParsing(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SentimentError>;
