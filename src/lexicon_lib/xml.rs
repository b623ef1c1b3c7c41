//! Parsing of sinoparser-style XML dictionaries.
//!
//! Dictionaries are flat files of `<item .../>` lines, one entry per line:
//!
//! ```xml
//! <item id="42" simp="里" trad="裏" pinyin="li3"/>
//! ```
//!
//! Mandarin files carry the reading in a `pinyin` attribute, Cantonese files
//! in a `jyutping` attribute. Anything that is not an `<item/>` line (the
//! `<root>` wrapper, license comments) is ignored. Malformed items are
//! reported to stderr and skipped; a file with no items at all is rejected.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, SinoParserError};
use crate::lexicon_lib::LexiconEntry;

static ITEM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<item\s+([^>]*?)/?>").unwrap());
static ATTR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"([A-Za-z_]+)="([^"]*)""#).unwrap());

/// One raw `<item/>` record, before merging into lexicon entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub simplified: String,
    pub traditional: String,
    /// Space-separated syllables of the file's romanization system.
    pub reading: String,
}

/// Parses all `<item/>` lines of a dictionary file. `reading_attr` names the
/// attribute carrying the romanization (`"pinyin"` or `"jyutping"`);
/// `source` is the file name used in diagnostics.
pub fn parse_dict(content: &str, reading_attr: &str, source: &str) -> Result<Vec<RawItem>> {
    let mut items = Vec::new();
    for line in content.lines() {
        let attrs_text = match ITEM_REGEX.captures(line) {
            Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(""),
            None => continue,
        };
        let attrs: HashMap<&str, &str> = ATTR_REGEX
            .captures_iter(attrs_text)
            .map(|c| (c.get(1).unwrap().as_str(), c.get(2).unwrap().as_str()))
            .collect();
        match (attrs.get("simp"), attrs.get("trad")) {
            (Some(simp), Some(trad)) if !simp.is_empty() && !trad.is_empty() => {
                items.push(RawItem {
                    simplified: (*simp).to_string(),
                    traditional: (*trad).to_string(),
                    reading: attrs.get(reading_attr).copied().unwrap_or("").to_string(),
                });
            }
            _ => eprintln!("Invalid item in {}: {}", source, line.trim()),
        }
    }
    if items.is_empty() && !content.trim().is_empty() {
        return Err(SinoParserError::InvalidFormat {
            path: source.to_string(),
            msg: "no <item/> records found".to_string(),
        });
    }
    Ok(items)
}

/// Merges Mandarin and Cantonese item sets into lexicon entries.
///
/// Every distinct surface form becomes one entry: an item whose simplified
/// and traditional forms differ yields an entry for each, so segmentation
/// matches input in either script. Repeated readings for a surface form are
/// kept in source order as alternatives and mark the entry ambiguous;
/// Cantonese readings attach to existing entries where the surface matches.
pub fn merge_varieties(mandarin: &[RawItem], cantonese: &[RawItem]) -> Vec<LexiconEntry> {
    let mut entries: Vec<LexiconEntry> = Vec::new();
    let mut by_text: HashMap<String, usize> = HashMap::new();

    absorb(mandarin, true, &mut entries, &mut by_text);
    absorb(cantonese, false, &mut entries, &mut by_text);
    entries
}

fn absorb(
    items: &[RawItem],
    is_mandarin: bool,
    entries: &mut Vec<LexiconEntry>,
    by_text: &mut HashMap<String, usize>,
) {
    for item in items {
        let mut surfaces = vec![item.traditional.as_str()];
        if item.simplified != item.traditional {
            surfaces.push(item.simplified.as_str());
        }
        for surface in surfaces {
            match by_text.get(surface) {
                Some(&i) => {
                    let entry = &mut entries[i];
                    let readings = if is_mandarin {
                        &mut entry.pinyin
                    } else {
                        &mut entry.jyutping
                    };
                    if !item.reading.is_empty() && !readings.contains(&item.reading) {
                        if !readings.is_empty() {
                            entry.ambiguous = true;
                        }
                        readings.push(item.reading.clone());
                    }
                }
                None => {
                    let reading = if item.reading.is_empty() {
                        Vec::new()
                    } else {
                        vec![item.reading.clone()]
                    };
                    let (pinyin, jyutping) = if is_mandarin {
                        (reading, Vec::new())
                    } else {
                        (Vec::new(), reading)
                    };
                    by_text.insert(surface.to_string(), entries.len());
                    entries.push(LexiconEntry {
                        text: surface.to_string(),
                        pinyin,
                        jyutping,
                        simplified: item.simplified.clone(),
                        traditional: item.traditional.clone(),
                        preference_rank: 0,
                        ambiguous: false,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dict_reads_items_and_skips_noise() {
        let content = "<root>\n\
                       <!-- generated from CC-CEDICT -->\n\
                       <item id=\"1\" simp=\"里\" trad=\"裏\" pinyin=\"li3\"/>\n\
                       <item id=\"2\" simp=\"你好\" trad=\"你好\" pinyin=\"ni3 hao3\"/>\n\
                       <item id=\"3\" trad=\"無\"/>\n\
                       </root>\n";
        let items = parse_dict(content, "pinyin", "mandarin.xml").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].traditional, "裏");
        assert_eq!(items[0].reading, "li3");
        assert_eq!(items[1].reading, "ni3 hao3");
    }

    #[test]
    fn parse_dict_rejects_non_dictionary_content() {
        let err = parse_dict("just some text", "pinyin", "bogus.xml").unwrap_err();
        assert!(matches!(
            err,
            crate::SinoParserError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn merge_splits_forms_and_attaches_jyutping() {
        let mandarin = vec![RawItem {
            simplified: "里".to_string(),
            traditional: "裏".to_string(),
            reading: "li3".to_string(),
        }];
        let cantonese = vec![RawItem {
            simplified: "里".to_string(),
            traditional: "裏".to_string(),
            reading: "leoi5".to_string(),
        }];
        let entries = merge_varieties(&mandarin, &cantonese);
        assert_eq!(entries.len(), 2);
        let trad = entries.iter().find(|e| e.text == "裏").unwrap();
        let simp = entries.iter().find(|e| e.text == "里").unwrap();
        assert_eq!(trad.pinyin, vec!["li3"]);
        assert_eq!(trad.jyutping, vec!["leoi5"]);
        assert_eq!(simp.jyutping, vec!["leoi5"]);
        assert_eq!(simp.traditional, "裏");
    }

    #[test]
    fn merge_keeps_homograph_readings_in_order() {
        let mandarin = vec![
            RawItem {
                simplified: "行".to_string(),
                traditional: "行".to_string(),
                reading: "xing2".to_string(),
            },
            RawItem {
                simplified: "行".to_string(),
                traditional: "行".to_string(),
                reading: "hang2".to_string(),
            },
        ];
        let entries = merge_varieties(&mandarin, &[]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pinyin, vec!["xing2", "hang2"]);
        assert!(entries[0].ambiguous);
    }
}
