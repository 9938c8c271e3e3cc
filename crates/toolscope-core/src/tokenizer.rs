//! Text tokenizer for tool relevance scoring
//!
//! Turns free text and tool names into a set of lowercase stems:
//!
//! 1. separate an uppercase run from a following capitalized word
//!    (`JSONSchema` → `JSON Schema`)
//! 2. split on whitespace
//! 3. split on case changes, letter/digit boundaries and punctuation
//!    (`getRecipeSchema` → `get Recipe Schema`, `send_email` → `send email`)
//! 4. lowercase
//! 5. drop English stop words
//! 6. stem (Snowball English: `recipes` → `recip`, `enabling` → `enabl`)
//!
//! The stemmer is immutable and shared, so `tokenize` is safe to call from
//! any number of concurrent orchestrations.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};

/// Ordered, deduplicated set of stems
pub type TokenSet = BTreeSet<String>;

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "am", "an", "and", "any", "are", "as", "at", "be", "been", "being", "but",
        "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
        "her", "him", "his", "i", "if", "in", "into", "is", "it", "its", "me", "my", "no", "not",
        "of", "on", "or", "our", "please", "she", "should", "so", "such", "that", "the", "their",
        "them", "then", "there", "these", "they", "this", "those", "to", "us", "was", "we",
        "were", "what", "when", "where", "which", "who", "will", "with", "would", "you", "your",
    ]
    .into_iter()
    .collect()
});

/// Check whether a lowercase word is a stop word
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Tokenize text into its set of stems.
///
/// Empty or whitespace-only input yields an empty set.
pub fn tokenize(text: &str) -> TokenSet {
    let separated = separate_acronyms(text);

    separated
        .split_whitespace()
        .flat_map(split_word_parts)
        .map(|part| part.to_lowercase())
        .filter(|word| !is_stop_word(word))
        .map(|word| STEMMER.stem(&word).into_owned())
        .filter(|stem| !stem.is_empty())
        .collect()
}

/// Insert a space where an uppercase run meets a capitalized word.
fn separate_acronyms(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        // Boundary before `c` when: prev is upper, c is upper, next is lower.
        if i > 0
            && c.is_uppercase()
            && chars[i - 1].is_uppercase()
            && chars.get(i + 1).is_some_and(|n| n.is_lowercase())
        {
            out.push(' ');
        }
        out.push(c);
    }

    out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_lowercase() {
        CharClass::Lower
    } else if c.is_uppercase() {
        CharClass::Upper
    } else if c.is_numeric() {
        CharClass::Digit
    } else if c.is_alphabetic() {
        // Caseless letters (CJK etc.) behave like lowercase
        CharClass::Lower
    } else {
        CharClass::Other
    }
}

/// Split one whitespace-free word on case, digit and punctuation boundaries.
fn split_word_parts(word: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start: Option<usize> = None;
    let mut prev = CharClass::Other;

    for (idx, c) in word.char_indices() {
        let class = classify(c);

        if class == CharClass::Other {
            if let Some(s) = start.take() {
                parts.push(&word[s..idx]);
            }
            prev = class;
            continue;
        }

        let boundary = match (prev, class) {
            (CharClass::Lower, CharClass::Upper) => true,
            (CharClass::Digit, CharClass::Lower | CharClass::Upper) => true,
            (CharClass::Lower | CharClass::Upper, CharClass::Digit) => true,
            _ => false,
        };

        match start {
            Some(s) if boundary => {
                parts.push(&word[s..idx]);
                start = Some(idx);
            }
            None => start = Some(idx),
            _ => {}
        }
        prev = class;
    }

    if let Some(s) = start {
        parts.push(&word[s..]);
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> TokenSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_camel_case_split() {
        assert_eq!(tokenize("getRecipeSchema"), set(&["get", "recip", "schema"]));
    }

    #[test]
    fn test_acronym_split() {
        let compound = tokenize("JSONSchema");
        let spaced = tokenize("json schema");
        assert_eq!(compound, set(&["json", "schema"]));
        assert!(compound.intersection(&spaced).next().is_some());
    }

    #[test]
    fn test_stemming() {
        assert_eq!(tokenize("recipes"), set(&["recip"]));
        assert_eq!(tokenize("enabling"), set(&["enabl"]));
    }

    #[test]
    fn test_stop_words_removed() {
        assert_eq!(tokenize("I need to email the report"), set(&["need", "email", "report"]));
    }

    #[test]
    fn test_case_insensitive_and_deduplicated() {
        assert_eq!(tokenize("Email EMAIL email"), set(&["email"]));
    }

    #[test]
    fn test_digit_and_punctuation_boundaries() {
        assert_eq!(split_word_parts("utf8Decode"), vec!["utf", "8", "Decode"]);
        assert_eq!(split_word_parts("send_email"), vec!["send", "email"]);
        assert_eq!(split_word_parts("--"), Vec::<&str>::new());
        assert_eq!(tokenize("send_email"), set(&["send", "email"]));
    }

    #[test]
    fn test_separate_acronyms() {
        assert_eq!(separate_acronyms("JSONSchema"), "JSON Schema");
        assert_eq!(separate_acronyms("parseHTTPResponse"), "parseHTTP Response");
        assert_eq!(separate_acronyms("ABC"), "ABC");
    }

    #[test]
    fn test_concurrent_use() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| tokenize("listCalendarEvents for tomorrow")))
            .collect();

        for handle in handles {
            assert_eq!(
                handle.join().unwrap(),
                set(&["list", "calendar", "event", "tomorrow"])
            );
        }
    }
}
