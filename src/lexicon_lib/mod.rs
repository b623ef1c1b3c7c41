use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zstd::stream::read::Decoder;
use zstd::Encoder;

use crate::errors::{Result, SinoParserError};

mod char_index;
pub mod xml;

pub use char_index::CharIndex;

/// One dictionary entry: a surface form with its readings, script forms and
/// preference metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// The surface form matched against input text.
    pub text: String,
    /// Mandarin readings, preferred first. Each reading is one display
    /// string of space-separated syllables.
    #[serde(default)]
    pub pinyin: Vec<String>,
    /// Cantonese readings, preferred first.
    #[serde(default)]
    pub jyutping: Vec<String>,
    pub simplified: String,
    pub traditional: String,
    /// Lower wins when entries of equal match length compete.
    #[serde(default)]
    pub preference_rank: u32,
    /// Set when the source dictionary listed conflicting variants that
    /// needed manual preference resolution.
    #[serde(default)]
    pub ambiguous: bool,
}

impl LexiconEntry {
    #[inline]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Immutable, load-once lexicon with longest-match lookup.
///
/// Built single-threaded at startup, then shared read-only for the process
/// lifetime; lookups take `&self` and never mutate, so concurrent queries
/// need no locking. A hot-reload would build a fresh `Lexicon` and swap the
/// shared `Arc`.
#[derive(Debug)]
pub struct Lexicon {
    entries: Vec<Arc<LexiconEntry>>,
    index: CharIndex,
}

impl Lexicon {
    /// Indexes the given entries. Fails with
    /// [`SinoParserError::Configuration`] when two entries share text and
    /// preference rank but disagree on readings or script forms — an
    /// unresolved ambiguity that must be caught here, not at query time.
    pub fn load(records: Vec<LexiconEntry>) -> Result<Self> {
        let mut seen: HashMap<(String, u32), usize> = HashMap::new();
        for (i, entry) in records.iter().enumerate() {
            let key = (entry.text.clone(), entry.preference_rank);
            match seen.get(&key) {
                Some(&j) => {
                    let other = &records[j];
                    if other.pinyin != entry.pinyin
                        || other.jyutping != entry.jyutping
                        || other.simplified != entry.simplified
                        || other.traditional != entry.traditional
                    {
                        return Err(SinoParserError::Configuration(format!(
                            "conflicting entries for {:?} at preference rank {}",
                            entry.text, entry.preference_rank
                        )));
                    }
                }
                None => {
                    seen.insert(key, i);
                }
            }
        }

        let entries: Vec<Arc<LexiconEntry>> = records.into_iter().map(Arc::new).collect();
        let mut index = CharIndex::default();
        for (i, entry) in entries.iter().enumerate() {
            let first = match entry.text.chars().next() {
                Some(c) => c,
                None => {
                    eprintln!("Skipping lexicon entry with empty text");
                    continue;
                }
            };
            let len = entry.char_len().min(u16::MAX as usize) as u16;
            index.insert(first, i as u32, len);
        }
        index.finish(|id| entries[id as usize].preference_rank);
        Ok(Lexicon { entries, index })
    }

    /// Longest entry matching `chars[offset..]`; among equal-length
    /// candidates, the one with the lowest preference rank. `None` when
    /// nothing in the lexicon matches at this offset.
    pub fn longest_match_at(&self, chars: &[char], offset: usize) -> Option<&Arc<LexiconEntry>> {
        let first = *chars.get(offset)?;
        let remaining = chars.len() - offset;
        if remaining < self.index.min_len as usize {
            return None;
        }
        for &(id, len) in self.index.candidates(first) {
            let len = len as usize;
            if len > remaining {
                continue;
            }
            let entry = &self.entries[id as usize];
            if entry
                .text
                .chars()
                .eq(chars[offset..offset + len].iter().copied())
            {
                return Some(entry);
            }
        }
        None
    }

    pub fn entries(&self) -> &[Arc<LexiconEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the entry set as zstd-compressed JSON.
    pub fn save_compressed<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        let mut encoder = Encoder::new(writer, 19)?;
        let records: Vec<&LexiconEntry> = self.entries.iter().map(|e| e.as_ref()).collect();
        serde_json::to_writer(&mut encoder, &records)?;
        encoder.finish()?;
        Ok(())
    }

    /// Loads an entry set written by [`save_compressed`](Self::save_compressed).
    pub fn load_compressed<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let decoder = Decoder::new(BufReader::new(file))?;
        let records: Vec<LexiconEntry> = serde_json::from_reader(decoder)?;
        Self::load(records)
    }
}

/// Reads and merges XML dictionaries from disk. Either path may be absent;
/// `.zst` files are decompressed transparently.
pub fn entries_from_xml_paths(
    mandarin: Option<&Path>,
    cantonese: Option<&Path>,
) -> Result<Vec<LexiconEntry>> {
    let mandarin_items = match mandarin {
        Some(path) => xml::parse_dict(&read_dict_file(path)?, "pinyin", &path.display().to_string())?,
        None => Vec::new(),
    };
    let cantonese_items = match cantonese {
        Some(path) => {
            xml::parse_dict(&read_dict_file(path)?, "jyutping", &path.display().to_string())?
        }
        None => Vec::new(),
    };
    Ok(xml::merge_varieties(&mandarin_items, &cantonese_items))
}

fn read_dict_file(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut content = String::new();
    if path.extension().map_or(false, |ext| ext == "zst") {
        let mut decoder = Decoder::new(BufReader::new(file))?;
        decoder.read_to_string(&mut content)?;
    } else {
        BufReader::new(file).read_to_string(&mut content)?;
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, pinyin: &[&str], rank: u32) -> LexiconEntry {
        LexiconEntry {
            text: text.to_string(),
            pinyin: pinyin.iter().map(|s| s.to_string()).collect(),
            jyutping: Vec::new(),
            simplified: text.to_string(),
            traditional: text.to_string(),
            preference_rank: rank,
            ambiguous: false,
        }
    }

    #[test]
    fn longest_match_prefers_length_then_rank() {
        let lexicon = Lexicon::load(vec![
            entry("中", &["zhong1"], 0),
            entry("中国", &["Zhong1 guo2"], 1),
            entry("中国", &["Zhong1 guo2"], 0),
            entry("中国人", &["Zhong1 guo2 ren2"], 0),
        ])
        .unwrap();

        let chars: Vec<char> = "中国人民".chars().collect();
        let hit = lexicon.longest_match_at(&chars, 0).unwrap();
        assert_eq!(hit.text, "中国人");

        let chars: Vec<char> = "中国".chars().collect();
        let hit = lexicon.longest_match_at(&chars, 0).unwrap();
        assert_eq!(hit.text, "中国");
        assert_eq!(hit.preference_rank, 0);

        let chars: Vec<char> = "人民".chars().collect();
        assert!(lexicon.longest_match_at(&chars, 0).is_none());
    }

    #[test]
    fn load_rejects_conflicting_duplicates() {
        let mut a = entry("行", &["xing2"], 0);
        a.ambiguous = true;
        let b = entry("行", &["hang2"], 0);
        let err = Lexicon::load(vec![a, b]).unwrap_err();
        assert!(matches!(err, SinoParserError::Configuration(_)));
    }

    #[test]
    fn load_accepts_identical_duplicates_and_distinct_ranks() {
        let lexicon = Lexicon::load(vec![
            entry("行", &["xing2"], 0),
            entry("行", &["xing2"], 0),
            entry("行", &["hang2"], 1),
        ])
        .unwrap();
        assert_eq!(lexicon.len(), 3);
    }
}
