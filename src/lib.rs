//! Lexicon-driven Chinese text processing: segmentation, pinyin/jyutping
//! transliteration, simplified↔traditional conversion and script guessing.
//!
//! All state is built once at startup ([`SinoParser::from_xml_paths`] or
//! [`SinoParser::from_entries`]) and is strictly read-only afterwards, so a
//! single parser can serve any number of concurrent queries without locking.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

pub mod errors;
pub mod lexicon_lib;
mod query_config;
pub mod script_convert;
pub mod script_guess;
pub mod segmenter;
pub mod transliterate;

pub use crate::errors::{Result, SinoParserError};
pub use crate::lexicon_lib::{Lexicon, LexiconEntry};
pub use crate::query_config::QueryConfig;
pub use crate::script_convert::{convert_punctuation, ScriptConversionTable};
pub use crate::script_guess::{ScriptGuess, ScriptGuessResult, ScriptGuesser};
pub use crate::segmenter::Token;
pub use crate::transliterate::Romanization;

use crate::script_convert::PARALLEL_THRESHOLD;

/// One row of the `all` query. Record *i* is aligned with token *i* of the
/// segmentation: same span, same surface.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRecord {
    /// Char offset of the span in the original text.
    pub start: usize,
    /// Span length in chars.
    pub len: usize,
    pub surface: String,
    pub pinyin: String,
    pub jyutping: String,
    pub simplified: String,
    pub traditional: String,
}

/// Result of the `all` query: token-aligned records plus one overall script
/// guess for the full input.
#[derive(Debug, Clone, Serialize)]
pub struct AllResult {
    pub records: Vec<TokenRecord>,
    pub guessed_script: ScriptGuessResult,
}

/// The query engine. Owns the loaded lexicon, conversion table and script
/// guesser; every operation takes `&self` and is side-effect free.
pub struct SinoParser {
    lexicon: Arc<Lexicon>,
    conversion: ScriptConversionTable,
    guesser: ScriptGuesser,
}

impl SinoParser {
    /// Builds from already-loaded parts. The guesser's reference sets are
    /// derived from the conversion table's character maps.
    pub fn new(lexicon: Lexicon, conversion: ScriptConversionTable) -> Self {
        let guesser = ScriptGuesser::from_table(&conversion);
        SinoParser {
            lexicon: Arc::new(lexicon),
            conversion,
            guesser,
        }
    }

    /// Builds from lexicon entries alone, deriving the conversion table
    /// from the entries' script forms.
    pub fn from_entries(entries: Vec<LexiconEntry>) -> Result<Self> {
        let conversion = ScriptConversionTable::from_entries(&entries);
        let lexicon = Lexicon::load(entries)?;
        Ok(Self::new(lexicon, conversion))
    }

    /// Loads Mandarin and/or Cantonese XML dictionaries from disk. At least
    /// one path should be given for the parser to be useful.
    pub fn from_xml_paths(mandarin: Option<&Path>, cantonese: Option<&Path>) -> Result<Self> {
        let entries = lexicon_lib::entries_from_xml_paths(mandarin, cantonese)?;
        Self::from_entries(entries)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn conversion_table(&self) -> &ScriptConversionTable {
        &self.conversion
    }

    /// Greedy longest-match tokenization of `input`.
    pub fn segment(&self, input: &str) -> Vec<Token> {
        segmenter::segment(&self.lexicon, input)
    }

    /// Token-aligned Mandarin readings (preferred reading per token).
    pub fn pinyin(&self, input: &str) -> Vec<String> {
        transliterate::transliterate(&self.segment(input), Romanization::Pinyin)
    }

    /// Token-aligned Cantonese readings (preferred reading per token).
    pub fn jyutping(&self, input: &str) -> Vec<String> {
        transliterate::transliterate(&self.segment(input), Romanization::Jyutping)
    }

    /// All reading alternatives per token, preferred first.
    pub fn readings_all(&self, input: &str, system: Romanization) -> Vec<Vec<String>> {
        transliterate::transliterate_all(&self.segment(input), system)
    }

    /// Converts to simplified script, optionally including quote punctuation.
    pub fn to_simplified(&self, input: &str, punctuation: bool) -> String {
        let converted = self.conversion.to_simplified(&self.segment(input));
        if punctuation {
            convert_punctuation(&converted, false)
        } else {
            converted
        }
    }

    /// Converts to traditional script, optionally including quote punctuation.
    pub fn to_traditional(&self, input: &str, punctuation: bool) -> String {
        let converted = self.conversion.to_traditional(&self.segment(input));
        if punctuation {
            convert_punctuation(&converted, true)
        } else {
            converted
        }
    }

    /// Classifies the input's script. Operates on the raw text, independent
    /// of segmentation.
    pub fn guess_script(&self, input: &str) -> ScriptGuessResult {
        self.guesser.guess(input)
    }

    /// The combined query: one record per token, aligned with
    /// [`segment`](Self::segment), plus an overall script guess.
    pub fn all(&self, input: &str) -> AllResult {
        let tokens = self.segment(input);
        let records = if input.len() >= PARALLEL_THRESHOLD {
            tokens
                .par_iter()
                .map(|token| self.record_for(token))
                .collect()
        } else {
            tokens.iter().map(|token| self.record_for(token)).collect()
        };
        AllResult {
            records,
            guessed_script: self.guesser.guess(input),
        }
    }

    fn record_for(&self, token: &Token) -> TokenRecord {
        TokenRecord {
            start: token.start,
            len: token.len,
            surface: token.surface.clone(),
            pinyin: transliterate::preferred_reading(token, Romanization::Pinyin),
            jyutping: transliterate::preferred_reading(token, Romanization::Jyutping),
            simplified: self.conversion.simplified_of(token),
            traditional: self.conversion.traditional_of(token),
        }
    }
}
