use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// What the consumer does with each post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    /// Write raw and cleaned text to the training CSV
    CollectData,
    /// Classify cleaned text and write it with its emotions to the output CSV
    SentimentAnalysis,
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CollectData => write!(f, "collect-data"),
            Self::SentimentAnalysis => write!(f, "sentiment-analysis"),
        }
    }
}

/// When the preprocessing tables are read from disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableReload {
    /// Load once when the normalizer is built
    #[default]
    Once,
    /// Re-read the three files before every transform
    PerCall,
}

/// What happens to an emoji that has no entry in the emoji table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmojiMissPolicy {
    /// Leave the glyph in the text unchanged
    #[default]
    Keep,
    /// Replace the glyph with a space
    Drop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
    #[serde(default = "default_log_directory")]
    pub directory: String,
}

fn default_log_directory() -> String {
    "logs".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    #[serde(default = "default_emojis_path")]
    pub emojis_path: PathBuf,
    #[serde(default = "default_abbreviations_path")]
    pub abbreviations_path: PathBuf,
    #[serde(default = "default_stopwords_path")]
    pub stopwords_path: PathBuf,
    #[serde(default)]
    pub table_reload: TableReload,
    #[serde(default)]
    pub emoji_miss: EmojiMissPolicy,
}

pub(crate) fn default_emojis_path() -> PathBuf {
    PathBuf::from("data/preprocessing/emojis.csv")
}

pub(crate) fn default_abbreviations_path() -> PathBuf {
    PathBuf::from("data/preprocessing/abbreviations.txt")
}

pub(crate) fn default_stopwords_path() -> PathBuf {
    PathBuf::from("data/preprocessing/stopwords.txt")
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            emojis_path: default_emojis_path(),
            abbreviations_path: default_abbreviations_path(),
            stopwords_path: default_stopwords_path(),
            table_reload: TableReload::Once,
            emoji_miss: EmojiMissPolicy::Keep,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Base URL shared by the translator and emotion endpoints
    #[serde(default = "default_services_host")]
    pub host: String,
    pub translator: String,
    pub translator_api_key: String,
    pub ml_tool: String,
    pub ml_tool_api_key: String,
    /// Language the classifier expects; posts in other languages are translated to it
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

pub(crate) fn default_services_host() -> String {
    "http://localhost:8080/api".to_string()
}

pub(crate) fn default_source_lang() -> String {
    "es".to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub goal: Goal,
    pub topic: String,
    pub group_id: String,
    /// JSON-lines file to consume; `-` reads stdin
    #[serde(default = "default_source")]
    pub source: String,
}

pub(crate) fn default_source() -> String {
    "-".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_training_csv")]
    pub training_csv: PathBuf,
    #[serde(default = "default_output_csv")]
    pub output_csv: PathBuf,
}

fn default_training_csv() -> PathBuf {
    PathBuf::from("data/twitter/training-tweets.csv")
}

fn default_output_csv() -> PathBuf {
    PathBuf::from("data/twitter/output-tweets.csv")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            training_csv: default_training_csv(),
            output_csv: default_output_csv(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,
    pub services: ServicesConfig,
    pub ingest: IngestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::SentimentError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Reject settings that would only fail later, mid-stream
    pub fn validate(&self) -> crate::Result<()> {
        let tables = [
            ("emojis_path", &self.preprocessing.emojis_path),
            ("abbreviations_path", &self.preprocessing.abbreviations_path),
            ("stopwords_path", &self.preprocessing.stopwords_path),
        ];
        for (name, path) in tables {
            if path.as_os_str().is_empty() {
                return Err(crate::SentimentError::ConfigError(format!(
                    "preprocessing.{name} must not be empty"
                )));
            }
        }

        if self.ingest.source.trim().is_empty() {
            return Err(crate::SentimentError::ConfigError(
                "ingest.source must not be empty (use \"-\" for stdin)".to_string(),
            ));
        }

        if self.services.source_lang.trim().is_empty() {
            return Err(crate::SentimentError::ConfigError(
                "services.source_lang must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get configured run goal
    pub fn goal(&self) -> Goal {
        self.ingest.goal
    }

    /// Get the language posts are translated into before classification
    pub fn source_lang(&self) -> &str {
        &self.services.source_lang
    }

    /// Get services base URL
    pub fn services_host(&self) -> &str {
        &self.services.host
    }

    /// Get the CSV file the given goal writes to
    pub fn output_path(&self, goal: Goal) -> &Path {
        match goal {
            Goal::CollectData => &self.output.training_csv,
            Goal::SentimentAnalysis => &self.output.output_csv,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
                directory: default_log_directory(),
            },
            preprocessing: PreprocessingConfig::default(),
            services: ServicesConfig {
                host: default_services_host(),
                translator: "deepl".to_string(),
                translator_api_key: String::new(),
                ml_tool: "huggingface".to_string(),
                ml_tool_api_key: String::new(),
                source_lang: default_source_lang(),
                timeout_secs: default_timeout_secs(),
            },
            ingest: IngestConfig {
                goal: Goal::SentimentAnalysis,
                topic: "tweets".to_string(),
                group_id: "sentiflow".to_string(),
                source: default_source(),
            },
            output: OutputConfig::default(),
        }
    }
}
