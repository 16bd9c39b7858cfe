//! Text normalization for social posts
//!
//! [`Normalizer`] maps raw post text to normalized text through twelve ordered
//! stages. The order matters: URLs go before special characters (which would
//! break them apart), and emoji descriptions are inserted before abbreviation,
//! stopword and short-token removal so those stages see them too.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sentiflow::preprocessing::Normalizer;
//!
//! let normalizer = Normalizer::from_paths(
//!     "data/preprocessing/emojis.csv",
//!     "data/preprocessing/abbreviations.txt",
//!     "data/preprocessing/stopwords.txt",
//! )?;
//! let cleaned = normalizer.transform("Holaaaa @amiga!!! mira esto 😀 https://t.co/x");
//! # Ok::<(), sentiflow::SentimentError>(())
//! ```

pub mod stages;
pub mod tables;

use std::path::PathBuf;

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

pub use tables::AbbreviationTable;
pub use tables::EmojiTable;
pub use tables::StopwordSet;
pub use tables::Tables;

use crate::config::EmojiMissPolicy;
use crate::config::PreprocessingConfig;
use crate::config::TableReload;
use crate::errors::Result;
use crate::errors::SentimentError;

/// Normalization stages in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CaseFold,
    EscapeSequences,
    Urls,
    Mentions,
    Digits,
    SpecialCharacters,
    RepeatedCharacters,
    Emojis,
    Abbreviations,
    Stopwords,
    ShortTokens,
    Whitespace,
}

impl Stage {
    pub const ALL: [Stage; 12] = [
        Stage::CaseFold,
        Stage::EscapeSequences,
        Stage::Urls,
        Stage::Mentions,
        Stage::Digits,
        Stage::SpecialCharacters,
        Stage::RepeatedCharacters,
        Stage::Emojis,
        Stage::Abbreviations,
        Stage::Stopwords,
        Stage::ShortTokens,
        Stage::Whitespace,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::CaseFold => "case-fold",
            Stage::EscapeSequences => "escape-sequences",
            Stage::Urls => "urls",
            Stage::Mentions => "mentions",
            Stage::Digits => "digits",
            Stage::SpecialCharacters => "special-characters",
            Stage::RepeatedCharacters => "repeated-characters",
            Stage::Emojis => "emojis",
            Stage::Abbreviations => "abbreviations",
            Stage::Stopwords => "stopwords",
            Stage::ShortTokens => "short-tokens",
            Stage::Whitespace => "whitespace",
        }
    }

    fn apply(self, text: &str, tables: &Tables, emoji_miss: EmojiMissPolicy) -> String {
        match self {
            Stage::CaseFold => stages::case_fold(text),
            Stage::EscapeSequences => stages::scrub_escape_sequences(text),
            Stage::Urls => stages::remove_urls(text),
            Stage::Mentions => stages::remove_mentions(text),
            Stage::Digits => stages::remove_digits(text),
            Stage::SpecialCharacters => stages::strip_special_characters(text),
            Stage::RepeatedCharacters => stages::collapse_repeated_characters(text),
            Stage::Emojis => replace_emojis(text, &tables.emojis, emoji_miss),
            Stage::Abbreviations => tables.abbreviations.expand(text).into_owned(),
            Stage::Stopwords => tables.stopwords.remove(text).into_owned(),
            Stage::ShortTokens => stages::remove_short_tokens(text),
            Stage::Whitespace => stages::collapse_whitespace(text),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Replace each emoji grapheme with its table description in one pass
fn replace_emojis(text: &str, table: &EmojiTable, miss: EmojiMissPolicy) -> String {
    let mut out = String::with_capacity(text.len());

    for grapheme in text.graphemes(true) {
        if grapheme.is_ascii() {
            out.push_str(grapheme);
            continue;
        }

        if let Some(description) = table.lookup(grapheme) {
            out.push_str(description);
        } else if stages::is_emoji(grapheme) {
            debug!("Emoji {grapheme:?} missing from emoji table");
            match miss {
                EmojiMissPolicy::Keep => out.push_str(grapheme),
                EmojiMissPolicy::Drop => out.push(' '),
            }
        } else {
            out.push_str(grapheme);
        }
    }

    out
}

/// Where a normalizer's tables came from, kept for reloads
#[derive(Debug, Clone)]
struct TableSources {
    emojis: PathBuf,
    abbreviations: PathBuf,
    stopwords: PathBuf,
}

impl TableSources {
    fn load(&self) -> Result<Tables> {
        Ok(Tables::load_paths(
            &self.emojis,
            &self.abbreviations,
            &self.stopwords,
        )?)
    }
}

/// Deterministic raw-text to normalized-text pipeline.
///
/// Owns its tables; `transform` only reads them, so one instance can be
/// shared across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Normalizer {
    tables: Tables,
    sources: Option<TableSources>,
    reload: TableReload,
    emoji_miss: EmojiMissPolicy,
}

impl Normalizer {
    /// Build from in-memory tables. `reload` is unavailable on such a normalizer.
    pub fn with_tables(tables: Tables) -> Self {
        Self {
            tables,
            sources: None,
            reload: TableReload::Once,
            emoji_miss: EmojiMissPolicy::default(),
        }
    }

    /// Load the three tables from disk.
    ///
    /// # Errors
    /// `SentimentError::Configuration` when a file is missing, unreadable or malformed.
    pub fn from_paths(
        emojis: impl Into<PathBuf>,
        abbreviations: impl Into<PathBuf>,
        stopwords: impl Into<PathBuf>,
    ) -> Result<Self> {
        let sources = TableSources {
            emojis: emojis.into(),
            abbreviations: abbreviations.into(),
            stopwords: stopwords.into(),
        };
        let tables = sources.load()?;
        debug!(
            "Normalizer ready: {} emojis, {} abbreviations, {} stopwords",
            tables.emojis.len(),
            tables.abbreviations.len(),
            tables.stopwords.len()
        );
        Ok(Self {
            tables,
            sources: Some(sources),
            reload: TableReload::Once,
            emoji_miss: EmojiMissPolicy::default(),
        })
    }

    pub fn from_config(config: &PreprocessingConfig) -> Result<Self> {
        Ok(Self::from_paths(
            &config.emojis_path,
            &config.abbreviations_path,
            &config.stopwords_path,
        )?
        .with_reload(config.table_reload)
        .with_emoji_miss(config.emoji_miss))
    }

    #[must_use]
    pub fn with_emoji_miss(mut self, policy: EmojiMissPolicy) -> Self {
        self.emoji_miss = policy;
        self
    }

    #[must_use]
    pub fn with_reload(mut self, reload: TableReload) -> Self {
        self.reload = reload;
        self
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    /// Re-read the table files this normalizer was built from.
    /// On failure the previous tables stay in place.
    pub fn reload(&mut self) -> Result<()> {
        let sources = self.sources.as_ref().ok_or_else(|| {
            SentimentError::ConfigError("normalizer was built from in-memory tables".to_string())
        })?;
        self.tables = sources.load()?;
        debug!("Preprocessing tables reloaded");
        Ok(())
    }

    /// Normalize `text` with the loaded tables
    pub fn transform(&self, text: &str) -> String {
        run_stages(text, &self.tables, self.emoji_miss, |_, _| {})
    }

    /// Re-read the table files, then normalize with the fresh tables
    pub fn transform_fresh(&self, text: &str) -> Result<String> {
        let tables = match &self.sources {
            Some(sources) => sources.load()?,
            None => return Ok(self.transform(text)),
        };
        Ok(run_stages(text, &tables, self.emoji_miss, |_, _| {}))
    }

    /// Normalize following the configured table reload policy
    pub fn normalize(&self, text: &str) -> Result<String> {
        match self.reload {
            TableReload::Once => Ok(self.transform(text)),
            TableReload::PerCall => self.transform_fresh(text),
        }
    }

    /// Text after every stage, in pipeline order
    pub fn transform_traced(&self, text: &str) -> Vec<(Stage, String)> {
        let mut trace = Vec::with_capacity(Stage::ALL.len());
        run_stages(text, &self.tables, self.emoji_miss, |stage, out| {
            trace.push((stage, out.to_string()));
        });
        trace
    }
}

fn run_stages(
    text: &str,
    tables: &Tables,
    emoji_miss: EmojiMissPolicy,
    mut observe: impl FnMut(Stage, &str),
) -> String {
    let mut current = text.to_string();
    for stage in Stage::ALL {
        current = stage.apply(&current, tables, emoji_miss);
        observe(stage, &current);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::with_tables(Tables {
            emojis: EmojiTable::from_entries([
                ("😀", "cara sonriente"),
                ("😂", "cara llorando de risa"),
                ("🙈", "the"),
            ]),
            abbreviations: AbbreviationTable::from_entries([
                ("xq", "porque"),
                ("tqm", "te quiero mucho"),
            ])
            .unwrap(),
            stopwords: StopwordSet::from_words(["the", "que", "porque", "muy"]).unwrap(),
        })
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalizer().transform(""), "");
    }

    #[test]
    fn test_reference_example() {
        let out = normalizer().transform("Hello world!!! 123 @user http://x.co");
        assert_eq!(out.trim(), "hello world");
    }

    #[test]
    fn test_emoji_description_goes_through_later_stages() {
        let out = normalizer().transform("genial 😀");
        // "de" from the description is a short token
        assert_eq!(out, "genial cara sonriente");

        let out = normalizer().transform("risa 😂");
        assert_eq!(out, "risa cara llorando risa");
    }

    #[test]
    fn test_emoji_description_that_is_a_stopword_disappears() {
        let out = normalizer().transform("mirando 🙈 cosas");
        assert_eq!(out, "mirando cosas");
    }

    #[test]
    fn test_emoji_adjacent_to_word() {
        assert_eq!(normalizer().transform("hola😀"), "holacara sonriente");
    }

    #[test]
    fn test_emoji_miss_policies() {
        let keep = normalizer().transform("fiesta 🎉");
        assert_eq!(keep, "fiesta 🎉");

        let drop = normalizer()
            .with_emoji_miss(EmojiMissPolicy::Drop)
            .transform("fiesta 🎉 hoy");
        assert_eq!(drop, "fiesta hoy");
    }

    #[test]
    fn test_abbreviation_expanded_everywhere_then_stopwords_apply() {
        // "te" from the expansion is a short token; the leading gap is not trimmed
        let out = normalizer().transform("tqm amiga, tqm");
        assert_eq!(out, " quiero mucho amiga quiero mucho");

        // expansion "porque" is itself a stopword
        assert_eq!(normalizer().transform("vine xq si"), "vine ");
    }

    #[test]
    fn test_repeated_characters_and_case() {
        assert_eq!(
            normalizer().transform("HOLAAAA amigooo"),
            "hola amigo"
        );
    }

    #[test]
    fn test_accents_are_folded() {
        assert_eq!(normalizer().transform("Canción increíble"), "cancion increible");
    }

    #[test]
    fn test_json_escapes_are_scrubbed() {
        assert_eq!(
            normalizer().transform(r#""primera\nsegunda\tlinea""#),
            " primera segunda linea "
        );
    }

    #[test]
    fn test_non_latin_text_survives() {
        assert_eq!(normalizer().transform("東京 大好き"), "東京 大好き");
    }

    #[test]
    fn test_traced_stages_match_transform() {
        let n = normalizer();
        let input = "Holaaa @ana!! xq 😀 http://t.co/a 2024";
        let trace = n.transform_traced(input);
        assert_eq!(trace.len(), Stage::ALL.len());
        assert_eq!(trace[0].0, Stage::CaseFold);
        assert_eq!(trace.last().unwrap().1, n.transform(input));
        assert!(!trace[2].1.contains("http"));
        assert!(!trace[3].1.contains("@ana"));
    }

    #[test]
    fn test_deterministic() {
        let n = normalizer();
        let input = "Que díaaaa!!! 😂😂 #feliz @yo https://x.y/z?a=1";
        assert_eq!(n.transform(input), n.transform(input));
    }

    #[test]
    fn test_reload_without_sources() {
        let mut n = normalizer();
        assert!(matches!(n.reload(), Err(SentimentError::ConfigError(_))));
        assert_eq!(n.transform_fresh("hola").unwrap(), "hola");
    }

    #[test]
    fn test_normalizer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Normalizer>();
    }

    #[test]
    fn test_stage_names() {
        let names: Vec<&str> = Stage::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names[0], "case-fold");
        assert_eq!(names[11], "whitespace");
        assert_eq!(Stage::Emojis.to_string(), "emojis");
    }
}
