use crate::lexicon_lib::LexiconEntry;
use crate::segmenter::Token;

/// Romanization system selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Romanization {
    /// Mandarin (hanyu pinyin with tone numbers).
    Pinyin,
    /// Cantonese (jyutping).
    Jyutping,
}

/// Token-aligned readings, one display string per token.
///
/// Tokens without a matched entry, and entries without a reading in the
/// requested system, yield the literal surface text as the fallback marker —
/// a single unknown character never aborts the rest of the sentence. For
/// homographs the preferred (first) reading is returned; use
/// [`transliterate_all`] when every alternative is wanted.
pub fn transliterate(tokens: &[Token], system: Romanization) -> Vec<String> {
    tokens
        .iter()
        .map(|token| preferred_reading(token, system))
        .collect()
}

/// All reading alternatives per token, preferred first. Tokens with no
/// reading yield a one-element list holding the surface fallback.
pub fn transliterate_all(tokens: &[Token], system: Romanization) -> Vec<Vec<String>> {
    tokens
        .iter()
        .map(|token| {
            let readings = token
                .entry
                .as_deref()
                .map(|entry| readings_of(entry, system))
                .unwrap_or(&[]);
            if readings.is_empty() {
                vec![token.surface.clone()]
            } else {
                readings.to_vec()
            }
        })
        .collect()
}

/// The preferred reading for one token, or its surface as fallback.
pub fn preferred_reading(token: &Token, system: Romanization) -> String {
    token
        .entry
        .as_deref()
        .and_then(|entry| readings_of(entry, system).first())
        .cloned()
        .unwrap_or_else(|| token.surface.clone())
}

#[inline]
fn readings_of(entry: &LexiconEntry, system: Romanization) -> &[String] {
    match system {
        Romanization::Pinyin => &entry.pinyin,
        Romanization::Jyutping => &entry.jyutping,
    }
}
