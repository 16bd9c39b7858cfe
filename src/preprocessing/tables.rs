//! Lookup tables driving the table-based normalization stages
//!
//! All three tables are plain text, one record per line:
//! - emojis: comma-separated, glyph in the first field, description in the seventh;
//!   an optional header row is skipped
//! - abbreviations: `key,expansion`
//! - stopwords: one word per line
//!
//! Every line is lower-cased before it is parsed. Tables are immutable once built.

use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;

use regex::Captures;
use regex::Regex;
use regex::RegexBuilder;
use tracing::debug;

use crate::config::PreprocessingConfig;
use crate::errors::TableError;
use crate::errors::TableKind;

/// Field holding the textual description in an emoji table row
pub const EMOJI_DESCRIPTION_FIELD: usize = 6;

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Compiled alternations get large with real stopword lists
const MATCHER_SIZE_LIMIT: usize = 64 * (1 << 20);

fn read_table(table: TableKind, path: &Path) -> Result<String, TableError> {
    std::fs::read_to_string(path).map_err(|source| TableError::Unreadable {
        table,
        path: path.to_path_buf(),
        source,
    })
}

/// Lower-cased, non-blank lines with their 1-based line numbers
fn records(content: &str) -> impl Iterator<Item = (usize, String)> + '_ {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line.to_lowercase()))
}

/// Build one `\b(?:w1|w2|...)\b` matcher, longest alternative first so that
/// overlapping keys prefer the longer whole word.
fn whole_word_matcher<'a>(
    table: TableKind,
    words: impl Iterator<Item = &'a String>,
) -> Result<Option<Regex>, TableError> {
    let mut words: Vec<&String> = words.collect();
    if words.is_empty() {
        return Ok(None);
    }
    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
        .size_limit(MATCHER_SIZE_LIMIT)
        .build()
        .map(Some)
        .map_err(|source| TableError::Pattern { table, source })
}

/// Emoji glyph to lower-case textual description
#[derive(Debug, Clone, Default)]
pub struct EmojiTable {
    descriptions: HashMap<String, String>,
}

impl EmojiTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let table = Self::parse(&read_table(TableKind::Emojis, path)?)?;
        debug!("Loaded {} emojis from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn parse(content: &str) -> Result<Self, TableError> {
        let mut descriptions = HashMap::new();
        for (idx, (line, record)) in records(content).enumerate() {
            let fields: Vec<&str> = record.split(',').collect();
            // A leading row whose glyph column is plain ASCII is a header
            if idx == 0 && fields[0].is_ascii() {
                continue;
            }
            if fields.len() <= EMOJI_DESCRIPTION_FIELD {
                return Err(TableError::Malformed {
                    table: TableKind::Emojis,
                    line,
                    expected: EMOJI_DESCRIPTION_FIELD + 1,
                });
            }
            descriptions.insert(
                fields[0].to_string(),
                fields[EMOJI_DESCRIPTION_FIELD].to_string(),
            );
        }
        Ok(Self { descriptions })
    }

    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            descriptions: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into().to_lowercase()))
                .collect(),
        }
    }

    /// Description for a glyph; tolerates a missing or extra emoji presentation selector.
    pub fn lookup(&self, glyph: &str) -> Option<&str> {
        if let Some(description) = self.descriptions.get(glyph) {
            return Some(description);
        }
        let bare: String = glyph
            .chars()
            .filter(|c| *c != VARIATION_SELECTOR_16)
            .collect();
        if let Some(description) = self.descriptions.get(&bare) {
            return Some(description);
        }
        let mut qualified = bare;
        qualified.push(VARIATION_SELECTOR_16);
        self.descriptions.get(&qualified).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

/// Abbreviation to full form, applied on whole-word matches in a single pass
#[derive(Debug, Clone, Default)]
pub struct AbbreviationTable {
    expansions: HashMap<String, String>,
    matcher: Option<Regex>,
}

impl AbbreviationTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let table = Self::parse(&read_table(TableKind::Abbreviations, path)?)?;
        debug!("Loaded {} abbreviations from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn parse(content: &str) -> Result<Self, TableError> {
        let mut expansions = HashMap::new();
        for (line, record) in records(content) {
            let mut fields = record.split(',');
            let key = fields.next().map(str::trim).unwrap_or_default();
            let Some(expansion) = fields.next() else {
                return Err(TableError::Malformed {
                    table: TableKind::Abbreviations,
                    line,
                    expected: 2,
                });
            };
            if key.is_empty() {
                return Err(TableError::Malformed {
                    table: TableKind::Abbreviations,
                    line,
                    expected: 2,
                });
            }
            expansions.insert(key.to_string(), expansion.trim().to_string());
        }
        Self::build(expansions)
    }

    pub fn from_entries<K, V>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, TableError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::build(
            entries
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v.into().to_lowercase()))
                .collect(),
        )
    }

    fn build(expansions: HashMap<String, String>) -> Result<Self, TableError> {
        let matcher = whole_word_matcher(TableKind::Abbreviations, expansions.keys())?;
        Ok(Self {
            expansions,
            matcher,
        })
    }

    /// Replace every whole-word abbreviation with its expansion.
    /// Inserted expansions are not scanned again.
    pub fn expand<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let Some(matcher) = &self.matcher else {
            return Cow::Borrowed(text);
        };
        matcher.replace_all(text, |caps: &Captures<'_>| {
            let word = &caps[0];
            self.expansions
                .get(word)
                .cloned()
                .unwrap_or_else(|| word.to_string())
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.expansions.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }
}

/// Words elided from normalized text
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
    matcher: Option<Regex>,
}

impl StopwordSet {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let set = Self::parse(&read_table(TableKind::Stopwords, path)?)?;
        debug!("Loaded {} stopwords from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn parse(content: &str) -> Result<Self, TableError> {
        Self::build(
            records(content)
                .map(|(_, word)| word.trim().to_string())
                .collect(),
        )
    }

    pub fn from_words<W: Into<String>>(
        words: impl IntoIterator<Item = W>,
    ) -> Result<Self, TableError> {
        Self::build(
            words
                .into_iter()
                .map(|w| w.into().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        )
    }

    fn build(words: HashSet<String>) -> Result<Self, TableError> {
        let matcher = whole_word_matcher(TableKind::Stopwords, words.iter())?;
        Ok(Self { words, matcher })
    }

    /// Replace every whole-word stopword with a single space
    pub fn remove<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match &self.matcher {
            Some(matcher) => matcher.replace_all(text, " "),
            None => Cow::Borrowed(text),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// The three tables a normalizer runs with
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub emojis: EmojiTable,
    pub abbreviations: AbbreviationTable,
    pub stopwords: StopwordSet,
}

impl Tables {
    pub fn load(config: &PreprocessingConfig) -> Result<Self, TableError> {
        Self::load_paths(
            &config.emojis_path,
            &config.abbreviations_path,
            &config.stopwords_path,
        )
    }

    pub fn load_paths(
        emojis: impl AsRef<Path>,
        abbreviations: impl AsRef<Path>,
        stopwords: impl AsRef<Path>,
    ) -> Result<Self, TableError> {
        Ok(Self {
            emojis: EmojiTable::load(emojis)?,
            abbreviations: AbbreviationTable::load(abbreviations)?,
            stopwords: StopwordSet::load(stopwords)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const EMOJI_ROWS: &str = "\
😀,1F600,smileys,face-smiling,E1.0,fully-qualified,Grinning Face
❤️,2764 FE0F,smileys,heart,E0.6,fully-qualified,Red Heart
👍🏽,1F44D 1F3FD,people,hand,E1.0,fully-qualified,thumbs up medium skin tone
";

    #[test]
    fn test_emoji_table_parse() {
        let table = EmojiTable::parse(EMOJI_ROWS).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("😀"), Some("grinning face"));
        assert_eq!(table.lookup("👍🏽"), Some("thumbs up medium skin tone"));
    }

    #[test]
    fn test_emoji_lookup_ignores_presentation_selector() {
        let table = EmojiTable::parse(EMOJI_ROWS).unwrap();
        assert_eq!(table.lookup("❤"), Some("red heart"));
        assert_eq!(table.lookup("❤\u{FE0F}"), Some("red heart"));

        let bare = EmojiTable::from_entries([("☺", "smiling face")]);
        assert_eq!(bare.lookup("☺\u{FE0F}"), Some("smiling face"));
    }

    #[test]
    fn test_emoji_table_short_row_is_malformed() {
        let err = EmojiTable::parse("😀,1F600,smileys\n").unwrap_err();
        assert!(matches!(
            err,
            TableError::Malformed {
                table: TableKind::Emojis,
                line: 1,
                expected: 7
            }
        ));
    }

    #[test]
    fn test_emoji_table_skips_header_row() {
        let table = EmojiTable::parse(
            "emoji,codepoint,occurrences,position,negative,positive,description\n\
             😀,0x1f600,1,0.5,0,1,cara sonriente\n",
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("emoji"), None);
        assert_eq!(table.lookup("😀"), Some("cara sonriente"));
    }

    #[test]
    fn test_emoji_table_short_header_is_skipped() {
        let table = EmojiTable::parse("emoji,description\n😀,a,b,c,d,e,feliz\n").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_emoji_table_skips_blank_lines() {
        let content = format!("\n{EMOJI_ROWS}\n\n");
        assert_eq!(EmojiTable::parse(&content).unwrap().len(), 3);
    }

    #[test]
    fn test_abbreviation_parse_lowercases_and_trims() {
        let table = AbbreviationTable::parse("Q,Que\nxq, porque,extra\n").unwrap();
        assert_eq!(table.get("q"), Some("que"));
        assert_eq!(table.get("xq"), Some("porque"));
    }

    #[test]
    fn test_abbreviation_missing_expansion_is_malformed() {
        let err = AbbreviationTable::parse("q,que\ntb\n").unwrap_err();
        assert!(matches!(
            err,
            TableError::Malformed {
                table: TableKind::Abbreviations,
                line: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_abbreviation_whole_words_only() {
        let table = AbbreviationTable::from_entries([("no", "negativo")]).unwrap();
        assert_eq!(table.expand("no nothing no"), "negativo nothing negativo");
    }

    #[test]
    fn test_abbreviation_expansions_not_rescanned() {
        let table =
            AbbreviationTable::from_entries([("q", "que tq"), ("tq", "te quiero")]).unwrap();
        assert_eq!(table.expand("q"), "que tq");
        assert_eq!(table.expand("tq"), "te quiero");
    }

    #[test]
    fn test_abbreviation_prefers_longer_key() {
        let table =
            AbbreviationTable::from_entries([("x", "por"), ("x fa", "por favor")]).unwrap();
        assert_eq!(table.expand("x fa ya"), "por favor ya");
    }

    #[test]
    fn test_abbreviation_expansion_is_literal() {
        let table = AbbreviationTable::from_entries([("usd", "$1 dollars")]).unwrap();
        assert_eq!(table.expand("usd"), "$1 dollars");
    }

    #[test]
    fn test_empty_tables_are_identity() {
        let abbreviations = AbbreviationTable::default();
        let stopwords = StopwordSet::from_words(Vec::<String>::new()).unwrap();
        assert!(matches!(abbreviations.expand("hola"), Cow::Borrowed(_)));
        assert!(matches!(stopwords.remove("hola"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_stopwords_parse_and_remove() {
        let set = StopwordSet::parse("de\nLa\n\n  que \n").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains("la"));
        assert!(set.contains("que"));
        assert_eq!(
            set.remove("casa de la playa"),
            format!("casa{}playa", " ".repeat(5))
        );
        assert_eq!(set.remove("delante"), "delante");
    }

    #[test]
    fn test_stopwords_with_regex_metacharacters() {
        let set = StopwordSet::from_words(["c++", "a.b"]).unwrap();
        assert_eq!(set.remove("axb"), "axb");
    }

    #[test]
    fn test_tables_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let emojis = dir.path().join("emojis.csv");
        let abbreviations = dir.path().join("abbreviations.txt");
        let stopwords = dir.path().join("stopwords.txt");
        std::fs::File::create(&emojis)
            .unwrap()
            .write_all(EMOJI_ROWS.as_bytes())
            .unwrap();
        std::fs::write(&abbreviations, "q,que\n").unwrap();
        std::fs::write(&stopwords, "de\n").unwrap();

        let tables = Tables::load_paths(&emojis, &abbreviations, &stopwords).unwrap();
        assert_eq!(tables.emojis.len(), 3);
        assert_eq!(tables.abbreviations.len(), 1);
        assert_eq!(tables.stopwords.len(), 1);
    }

    #[test]
    fn test_missing_table_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StopwordSet::load(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(
            err,
            TableError::Unreadable {
                table: TableKind::Stopwords,
                ..
            }
        ));
    }
}
