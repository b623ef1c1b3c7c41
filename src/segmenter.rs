use std::sync::Arc;

use crate::lexicon_lib::{Lexicon, LexiconEntry};

/// A contiguous span of the original text. Offsets and lengths count chars,
/// not bytes, so spans stay correct under multi-byte encodings.
#[derive(Debug, Clone)]
pub struct Token {
    pub start: usize,
    pub len: usize,
    /// The original text of the span.
    pub surface: String,
    /// The lexicon entry this span matched, or `None` for an unmatched
    /// single character (punctuation, digits, foreign script, unknown hanzi).
    pub entry: Option<Arc<LexiconEntry>>,
}

impl Token {
    #[inline]
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.len)
    }
}

/// Forward greedy longest-match segmentation.
///
/// At each offset, take the longest lexicon match and advance past it;
/// otherwise emit the single character as an unmatched token and advance by
/// one. A single left-to-right pass with no backtracking: locally longest
/// choices can occasionally give a globally suboptimal segmentation, which
/// is accepted behavior. The result is deterministic for a fixed lexicon,
/// and the returned spans partition the input exactly.
///
/// Whitespace and punctuation get no special treatment; they fall out as
/// unmatched tokens unless the lexicon happens to contain them.
pub fn segment(lexicon: &Lexicon, input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut offset = 0;
    while offset < chars.len() {
        match lexicon.longest_match_at(&chars, offset) {
            Some(entry) => {
                let len = entry.char_len();
                tokens.push(Token {
                    start: offset,
                    len,
                    surface: entry.text.clone(),
                    entry: Some(Arc::clone(entry)),
                });
                offset += len;
            }
            None => {
                tokens.push(Token {
                    start: offset,
                    len: 1,
                    surface: chars[offset].to_string(),
                    entry: None,
                });
                offset += 1;
            }
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon_lib::LexiconEntry;

    fn entry(text: &str) -> LexiconEntry {
        LexiconEntry {
            text: text.to_string(),
            pinyin: Vec::new(),
            jyutping: Vec::new(),
            simplified: text.to_string(),
            traditional: text.to_string(),
            preference_rank: 0,
            ambiguous: false,
        }
    }

    #[test]
    fn greedy_match_with_single_char_fallback() {
        let lexicon = Lexicon::load(vec![entry("你好"), entry("世界")]).unwrap();
        let tokens = segment(&lexicon, "你好吗，世界");
        let surfaces: Vec<&str> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["你好", "吗", "，", "世界"]);
        assert!(tokens[0].entry.is_some());
        assert!(tokens[1].entry.is_none());
        assert!(tokens[2].entry.is_none());
    }

    #[test]
    fn spans_partition_the_input() {
        let lexicon = Lexicon::load(vec![entry("你好"), entry("世界")]).unwrap();
        let input = "abc 你好世界 123 你好！";
        let tokens = segment(&lexicon, input);
        let mut next = 0;
        for token in &tokens {
            assert_eq!(token.start, next);
            assert_eq!(token.surface.chars().count(), token.len);
            next += token.len;
        }
        assert_eq!(next, input.chars().count());
        let rebuilt: String = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn greedy_choice_is_local_not_global() {
        // 中国 swallows the first two chars even though 国人 would then
        // also have matched; no backtracking by contract.
        let lexicon = Lexicon::load(vec![entry("中国"), entry("国人")]).unwrap();
        let surfaces: Vec<String> = segment(&lexicon, "中国人")
            .into_iter()
            .map(|t| t.surface)
            .collect();
        assert_eq!(surfaces, vec!["中国", "人"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        let lexicon = Lexicon::load(vec![entry("你好")]).unwrap();
        assert!(segment(&lexicon, "").is_empty());
    }
}
