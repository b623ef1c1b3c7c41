use std::collections::HashSet;

use serde::Serialize;

use crate::script_convert::ScriptConversionTable;

/// Script classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScriptGuess {
    Simplified,
    Traditional,
    Mixed,
    Unknown,
}

/// Classification plus the counts that produced it, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScriptGuessResult {
    pub guess: ScriptGuess,
    pub simplified_count: usize,
    pub traditional_count: usize,
}

/// Heuristic script classifier over raw text, independent of segmentation.
///
/// Holds two disjoint reference sets: characters that exist only in
/// simplified script and characters that exist only in traditional script.
pub struct ScriptGuesser {
    simplified_only: HashSet<char>,
    traditional_only: HashSet<char>,
}

impl ScriptGuesser {
    /// Derives the exclusive sets from the character-level conversion maps:
    /// any character whose mapping target differs from itself is particular
    /// to the side of the table it appears on. Characters claimed by both
    /// directions are script-neutral and belong to neither set.
    pub fn from_table(table: &ScriptConversionTable) -> Self {
        let mut simplified_only = HashSet::new();
        let mut traditional_only = HashSet::new();
        for (from, to) in &table.st_characters {
            if from != to {
                if let Some(ch) = single_char(from) {
                    simplified_only.insert(ch);
                }
            }
        }
        for (from, to) in &table.ts_characters {
            if from != to {
                if let Some(ch) = single_char(from) {
                    traditional_only.insert(ch);
                }
            }
        }
        let shared: Vec<char> = simplified_only
            .intersection(&traditional_only)
            .copied()
            .collect();
        for ch in shared {
            simplified_only.remove(&ch);
            traditional_only.remove(&ch);
        }
        ScriptGuesser {
            simplified_only,
            traditional_only,
        }
    }

    /// Counts occurrences from each exclusive set and classifies.
    ///
    /// Presence on both sides is definitive evidence of mixing, never
    /// broken by magnitude; text with no distinguishing characters at all
    /// (pure punctuation, shared-form hanzi, foreign script) is `Unknown`.
    pub fn guess(&self, text: &str) -> ScriptGuessResult {
        let mut simplified_count = 0;
        let mut traditional_count = 0;
        for ch in text.chars() {
            if self.simplified_only.contains(&ch) {
                simplified_count += 1;
            } else if self.traditional_only.contains(&ch) {
                traditional_count += 1;
            }
        }
        let guess = match (simplified_count, traditional_count) {
            (0, 0) => ScriptGuess::Unknown,
            (_, 0) => ScriptGuess::Simplified,
            (0, _) => ScriptGuess::Traditional,
            _ => ScriptGuess::Mixed,
        };
        ScriptGuessResult {
            guess,
            simplified_count,
            traditional_count,
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guesser() -> ScriptGuesser {
        let table = ScriptConversionTable::from_records(
            [
                ("龙".to_string(), "龍".to_string()),
                ("马".to_string(), "馬".to_string()),
            ],
            [
                ("龍".to_string(), "龙".to_string()),
                ("馬".to_string(), "马".to_string()),
            ],
        );
        ScriptGuesser::from_table(&table)
    }

    #[test]
    fn classifies_each_side_and_mixture() {
        let guesser = guesser();
        assert_eq!(guesser.guess("龙马").guess, ScriptGuess::Simplified);
        assert_eq!(guesser.guess("龍馬").guess, ScriptGuess::Traditional);
        assert_eq!(guesser.guess("龙馬").guess, ScriptGuess::Mixed);
        assert_eq!(guesser.guess("你好。ABC").guess, ScriptGuess::Unknown);
    }

    #[test]
    fn equal_nonzero_counts_are_mixed_not_tied() {
        let result = guesser().guess("龙龍");
        assert_eq!(result.guess, ScriptGuess::Mixed);
        assert_eq!(result.simplified_count, 1);
        assert_eq!(result.traditional_count, 1);
    }

    #[test]
    fn counts_are_reported() {
        let result = guesser().guess("龙马龙，好");
        assert_eq!(result.simplified_count, 3);
        assert_eq!(result.traditional_count, 0);
        assert_eq!(result.guess, ScriptGuess::Simplified);
    }
}
