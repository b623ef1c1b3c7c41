use std::collections::HashMap;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lexicon_lib::LexiconEntry;
use crate::segmenter::Token;

/// Inputs at or above this many bytes convert token-parallel.
pub(crate) const PARALLEL_THRESHOLD: usize = 500;

static S2T_PUNCT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[“”‘’]"#).unwrap());
static T2S_PUNCT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[「」『』]").unwrap());
static S2T_PUNCT_MAP: Lazy<HashMap<char, char>> = Lazy::new(|| {
    [('“', '「'), ('”', '」'), ('‘', '『'), ('’', '』')]
        .into_iter()
        .collect()
});
static T2S_PUNCT_MAP: Lazy<HashMap<char, char>> = Lazy::new(|| {
    [('「', '“'), ('」', '”'), ('『', '‘'), ('』', '’')]
        .into_iter()
        .collect()
});

/// Simplified ↔ traditional mappings, two tiers per direction.
///
/// Phrase maps are consulted first because character-by-character
/// conversion is provably wrong for words whose correct form depends on
/// context (one simplified character mapping to several traditional ones).
/// A phrase whose target equals its source is meaningful: it pins a word
/// whose characters must *not* be converted individually. Characters with
/// no mapping pass through unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptConversionTable {
    pub st_characters: HashMap<String, String>,
    pub st_phrases: HashMap<String, String>,
    pub ts_characters: HashMap<String, String>,
    pub ts_phrases: HashMap<String, String>,
}

impl ScriptConversionTable {
    /// Builds both directions from explicit conversion records. Within each
    /// direction the first record for a source form wins, so callers supply
    /// records in preference order.
    pub fn from_records<I, J>(s2t: I, t2s: J) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
        J: IntoIterator<Item = (String, String)>,
    {
        let mut table = Self::default();
        for (from, to) in s2t {
            table.insert_s2t(from, to);
        }
        for (from, to) in t2s {
            table.insert_t2s(from, to);
        }
        table
    }

    /// Derives both directions from the lexicon itself. Single-character
    /// entries whose forms differ feed the character maps; longer entries
    /// feed the phrase maps, including identity phrases that guard against
    /// per-character conversion. Lowest preference rank wins.
    pub fn from_entries(entries: &[LexiconEntry]) -> Self {
        let mut ordered: Vec<&LexiconEntry> = entries.iter().collect();
        ordered.sort_by_key(|entry| entry.preference_rank);

        let mut table = Self::default();
        for entry in ordered {
            let simp_len = entry.simplified.chars().count();
            let trad_len = entry.traditional.chars().count();
            if simp_len == 1 && trad_len == 1 {
                if entry.simplified != entry.traditional {
                    table.insert_s2t(entry.simplified.clone(), entry.traditional.clone());
                    table.insert_t2s(entry.traditional.clone(), entry.simplified.clone());
                }
            } else if simp_len > 0 {
                table.insert_s2t(entry.simplified.clone(), entry.traditional.clone());
                table.insert_t2s(entry.traditional.clone(), entry.simplified.clone());
            }
        }
        table
    }

    fn insert_s2t(&mut self, from: String, to: String) {
        let map = if from.chars().count() == 1 {
            &mut self.st_characters
        } else {
            &mut self.st_phrases
        };
        map.entry(from).or_insert(to);
    }

    fn insert_t2s(&mut self, from: String, to: String) {
        let map = if from.chars().count() == 1 {
            &mut self.ts_characters
        } else {
            &mut self.ts_phrases
        };
        map.entry(from).or_insert(to);
    }

    /// Converts segmented tokens to simplified script.
    pub fn to_simplified(&self, tokens: &[Token]) -> String {
        self.convert(tokens, &self.ts_phrases, &self.ts_characters)
    }

    /// Converts segmented tokens to traditional script.
    pub fn to_traditional(&self, tokens: &[Token]) -> String {
        self.convert(tokens, &self.st_phrases, &self.st_characters)
    }

    /// Simplified form of a single token (phrase tier first).
    pub fn simplified_of(&self, token: &Token) -> String {
        convert_token(token, &self.ts_phrases, &self.ts_characters)
    }

    /// Traditional form of a single token (phrase tier first).
    pub fn traditional_of(&self, token: &Token) -> String {
        convert_token(token, &self.st_phrases, &self.st_characters)
    }

    fn convert(
        &self,
        tokens: &[Token],
        phrases: &HashMap<String, String>,
        characters: &HashMap<String, String>,
    ) -> String {
        let total_bytes: usize = tokens.iter().map(|t| t.surface.len()).sum();
        if total_bytes >= PARALLEL_THRESHOLD {
            String::from_par_iter(
                tokens
                    .par_iter()
                    .map(|token| convert_token(token, phrases, characters)),
            )
        } else {
            tokens
                .iter()
                .map(|token| convert_token(token, phrases, characters))
                .collect()
        }
    }
}

fn convert_token(
    token: &Token,
    phrases: &HashMap<String, String>,
    characters: &HashMap<String, String>,
) -> String {
    // Phrase tier first, then per-character fallback.
    if let Some(translation) = phrases.get(token.surface.as_str()) {
        return translation.clone();
    }
    token
        .surface
        .chars()
        .map(|ch| translate_char(ch, characters))
        .collect()
}

fn translate_char(ch: char, characters: &HashMap<String, String>) -> String {
    let mut buf = [0u8; 4];
    let ch_str = ch.encode_utf8(&mut buf);
    match characters.get(ch_str) {
        Some(translation) => translation.clone(),
        None => ch_str.to_owned(),
    }
}

/// Converts curly quotes to corner brackets (simplified → traditional
/// typography) or back.
pub fn convert_punctuation(text: &str, to_traditional: bool) -> String {
    let (regex, mapping) = if to_traditional {
        (&*S2T_PUNCT_REGEX, &*S2T_PUNCT_MAP)
    } else {
        (&*T2S_PUNCT_REGEX, &*T2S_PUNCT_MAP)
    };

    regex
        .replace_all(text, |caps: &regex::Captures| {
            let ch = caps.get(0).unwrap().as_str().chars().next().unwrap();
            mapping.get(&ch).unwrap().to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_punctuation_round_trip() {
        assert_eq!(convert_punctuation("“你好”", true), "「你好」");
        assert_eq!(convert_punctuation("「你好」", false), "“你好”");
    }

    #[test]
    fn identity_phrase_guards_characters() {
        let table = ScriptConversionTable::from_records(
            [
                ("里".to_string(), "裏".to_string()),
                ("公里".to_string(), "公里".to_string()),
            ],
            [("裏".to_string(), "里".to_string())],
        );
        assert_eq!(table.st_characters.get("里").map(String::as_str), Some("裏"));
        assert_eq!(
            table.st_phrases.get("公里").map(String::as_str),
            Some("公里")
        );
    }
}
