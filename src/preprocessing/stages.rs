//! Table-free normalization stages
//!
//! Each function is total over arbitrary Unicode input and returns the input
//! unchanged when its target construct is absent.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Characters blanked by [`strip_special_characters`]
pub const SPECIAL_CHARACTERS: &[char] = &[
    '.', '/', '-', ';', '!', ':', '¿', '?', ',', '(', ')', '[', ']', '"', '\'', '#', '&', '=', '|',
    '>', '<', '*', '_', '%', '@', '\\', '{', '}', '^', '$', '+', '~', '`',
];

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

lazy_static! {
    // The trailing class mirrors the historical one, including the `+` to `=` range
    static ref URL: Regex = Regex::new(
        r"(?i)(?:https?|ftp|gopher|telnet|file|unsure):(?://|\\)+[A-Za-z0-9_:#@%/;$()~?+,\-.<=\\&]*"
    )
    .expect("URL pattern is valid");
    static ref MENTION: Regex = Regex::new(r"@[A-Za-z0-9_]+").expect("mention pattern is valid");
    static ref SHORT_TOKEN: Regex = Regex::new(r"\b[a-z]{1,2}\b").expect("short token pattern is valid");
    // ASCII whitespace only; NBSP and other Unicode spaces are left alone
    static ref WHITESPACE_RUN: Regex =
        Regex::new(r"[ \t\n\x0B\x0C\r]{2,}").expect("whitespace pattern is valid");
}

pub fn case_fold(text: &str) -> String {
    text.to_lowercase()
}

/// JSON escapes that survived upstream parsing arrive as literal backslash sequences
pub fn scrub_escape_sequences(text: &str) -> String {
    text.replace("\\n", " ")
        .replace("\\t", " ")
        .replace('\\', " ")
}

/// Blank `?` and `&` everywhere, then remove URLs until none remain.
///
/// The string is trimmed when at least one URL was removed.
pub fn remove_urls(text: &str) -> String {
    let mut text = text.replace(['?', '&'], " ");
    let mut removed = false;

    // Every pass shortens the text, so this terminates
    while URL.is_match(&text) {
        text = URL.replace_all(&text, " ").into_owned();
        removed = true;
    }

    if removed {
        text.trim().to_string()
    } else {
        text
    }
}

pub fn remove_mentions(text: &str) -> String {
    MENTION.replace_all(text, " ").into_owned()
}

pub fn remove_digits(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_digit() { ' ' } else { c })
        .collect()
}

/// Blank every special character, then fold accented letters to their base form
pub fn strip_special_characters(text: &str) -> String {
    let blanked: String = text
        .chars()
        .map(|c| if SPECIAL_CHARACTERS.contains(&c) { ' ' } else { c })
        .collect();
    fold_accents(&blanked)
}

/// Canonical decomposition with the combining diacritical marks block removed.
/// `ł` has no decomposition and is mapped explicitly.
pub fn fold_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
        .map(|c| match c {
            'ł' => 'l',
            'Ł' => 'L',
            other => other,
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Collapse runs of three or more identical ASCII word characters to one; shorter
/// runs and non-Latin runs stay.
pub fn collapse_repeated_characters(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }

        if run >= 3 && is_word_char(c) {
            out.push(c);
        } else {
            out.extend(std::iter::repeat(c).take(run));
        }
    }

    out
}

/// Whether a grapheme cluster is an emoji, multi-codepoint sequences included
pub fn is_emoji(grapheme: &str) -> bool {
    if grapheme.is_ascii() {
        return false;
    }
    if emojis::get(grapheme).is_some() {
        return true;
    }

    let bare: String = grapheme
        .chars()
        .filter(|c| *c != VARIATION_SELECTOR_16)
        .collect();
    if emojis::get(&bare).is_some() {
        return true;
    }

    let mut qualified = bare;
    qualified.push(VARIATION_SELECTOR_16);
    emojis::get(&qualified).is_some()
}

pub fn remove_short_tokens(text: &str) -> String {
    SHORT_TOKEN.replace_all(text, " ").into_owned()
}

/// Runs of two or more whitespace characters become one space; ends are not trimmed
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}
