//! Regenerates `mandarin.xml` from CC-CEDICT.
//!
//! Reads a plain-text CC-CEDICT export (local file or download), keeps the
//! first three fields of each entry, joins pinyin syllables into words,
//! drops adverbial-prefix compounds and emits the `<item/>` XML format the
//! lexicon loader expects. Entries whose traditional or simplified form is
//! shared with another entry are ordered first and carry no implied
//! preference beyond their position.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::time::Duration;

use clap::{Arg, Command};
use ureq::Agent;

const CEDICT_URL: &str =
    "https://raw.githubusercontent.com/skishore/makemeahanzi/master/cedict_ts.u8";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct CedictEntry {
    traditional: String,
    simplified: String,
    pinyin: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const BLUE: &str = "\x1B[1;34m"; // Bold Blue
    const RESET: &str = "\x1B[0m"; // Reset color

    let matches = Command::new("Dictionary Generator")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("file")
                .help("Read a local CC-CEDICT export instead of downloading."),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("url")
                .default_value(CEDICT_URL)
                .help("Download URL for a plain-text CC-CEDICT export."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("filename")
                .default_value("mandarin.xml")
                .help("Write the generated dictionary to <filename>."),
        )
        .about(format!(
            "{BLUE}Dict Generator: Command Line Mandarin Dictionary Generator for sinoparser-rs{RESET}"
        ))
        .get_matches();

    let data = match matches.get_one::<String>("input") {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let url = matches.get_one::<String>("url").unwrap();
            eprintln!("{BLUE}Downloading CC-CEDICT from {url}...{RESET}");
            let agent: Agent = ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(60))
                .build();
            let mut body = String::new();
            agent
                .get(url)
                .call()?
                .into_reader()
                .read_to_string(&mut body)?;
            body
        }
    };

    let mut entries: HashSet<CedictEntry> = HashSet::new();
    let mut comments: Vec<String> = vec![
        "This file was generated from CC-CEDICT.".to_string(),
        "The original copyright notice follows below.".to_string(),
        String::new(),
    ];
    let mut skipped = 0usize;
    for line in data.lines() {
        if let Some(comment) = line.strip_prefix('#') {
            comments.push(comment.trim().to_string());
            continue;
        }
        match parse_entry(line) {
            Some(entry) => {
                // The XML attributes are double-quoted.
                if entry.traditional.contains('"')
                    || entry.simplified.contains('"')
                    || entry.pinyin.contains('"')
                {
                    skipped += 1;
                    continue;
                }
                entries.insert(entry);
            }
            None => {
                if !line.trim().is_empty() {
                    skipped += 1;
                }
            }
        }
    }

    let entries = remove_prefixes(&entries);
    let entries = sorted_entries(entries);

    let output_path = matches.get_one::<String>("output").unwrap();
    let mut out = BufWriter::new(File::create(output_path)?);
    writeln!(out, "<root>")?;
    writeln!(out, "<!--\n{}\n-->", comments.join("\n"))?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "<item id=\"{}\" simp=\"{}\" trad=\"{}\" pinyin=\"{}\"/>",
            i + 1,
            entry.simplified,
            entry.traditional,
            join_pinyin(&entry.pinyin)
        )?;
    }
    writeln!(out, "</root>")?;
    out.flush()?;

    eprintln!(
        "{BLUE}Wrote {} entries to {} ({} lines skipped).{RESET}",
        entries.len(),
        output_path,
        skipped
    );
    Ok(())
}

/// Turns `traditional simplified [pin1 yin1] /meaning/` into an entry,
/// ignoring the meanings. `u:` is normalized to `v` (two representations
/// of ü).
fn parse_entry(line: &str) -> Option<CedictEntry> {
    let (traditional, rest) = line.split_once(' ')?;
    let (simplified, rest) = rest.split_once(' ')?;
    let rest = rest.strip_prefix('[')?;
    let (pinyin, _) = rest.split_once(']')?;
    Some(CedictEntry {
        traditional: traditional.to_string(),
        simplified: simplified.to_string(),
        pinyin: pinyin.replace("u:", "v"),
    })
}

/// Joins pinyin syllables into words. Capitalized syllables start a new
/// part (multi-part names), commas keep a trailing space, and a/e/o
/// syllables inside a word get the dividing apostrophe.
fn join_pinyin(pinyin: &str) -> String {
    let mut joined = String::new();
    for syllable in pinyin.split(' ') {
        if syllable.is_empty() {
            continue;
        }
        let first = syllable.chars().next().unwrap();
        if first.is_uppercase() {
            joined.push(' ');
        } else if matches!(first, 'a' | 'e' | 'o')
            && !joined.is_empty()
            && !joined.ends_with(' ')
        {
            joined.push('\'');
        }
        joined.push_str(syllable);
        if syllable.ends_with(',') {
            joined.push(' ');
        }
    }
    joined.trim().to_string()
}

/// Drops entries that are an adverbial prefix plus another entry, so the
/// combination is not treated as a single unit.
/// 《汉语拼音正词法基本规则》(GB/T 16159-2012) 6.1.6.
fn remove_prefixes(entries: &HashSet<CedictEntry>) -> HashSet<CedictEntry> {
    const PREFIXES: [(&str, &str, &str); 5] = [
        ("不", "不", "bu4 "),
        ("很", "很", "hen3 "),
        ("更", "更", "geng4 "),
        ("最", "最", "zui4 "),
        ("非常", "非常", "fei1 chang2 "),
    ];
    entries
        .iter()
        .filter(|entry| {
            !PREFIXES.iter().any(|&(pt, ps, pp)| {
                entry.traditional.starts_with(pt)
                    && entry.simplified.starts_with(ps)
                    && entry.pinyin.starts_with(pp)
                    && entries.contains(&CedictEntry {
                        traditional: entry.traditional[pt.len()..].to_string(),
                        simplified: entry.simplified[ps.len()..].to_string(),
                        pinyin: entry.pinyin[pp.len()..].to_string(),
                    })
            })
        })
        .cloned()
        .collect()
}

/// Ambiguous entries (shared traditional or simplified form) first, each
/// group in a deterministic order. Position in the file becomes the
/// loader's preference order.
fn sorted_entries(entries: HashSet<CedictEntry>) -> Vec<CedictEntry> {
    let mut trad_count: HashMap<&str, usize> = HashMap::new();
    let mut simp_count: HashMap<&str, usize> = HashMap::new();
    for entry in &entries {
        *trad_count.entry(entry.traditional.as_str()).or_default() += 1;
        *simp_count.entry(entry.simplified.as_str()).or_default() += 1;
    }

    let mut ambiguous = Vec::new();
    let mut unambiguous = Vec::new();
    for entry in entries.iter().cloned() {
        if trad_count[entry.traditional.as_str()] > 1 || simp_count[entry.simplified.as_str()] > 1
        {
            ambiguous.push(entry);
        } else {
            unambiguous.push(entry);
        }
    }
    ambiguous.sort();
    unambiguous.sort();
    ambiguous.extend(unambiguous);
    ambiguous
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_first_three_fields() {
        let entry = parse_entry(
            "往初 往初 [wang3 chu1] /(literary) former times/in olden days/",
        )
        .unwrap();
        assert_eq!(entry.traditional, "往初");
        assert_eq!(entry.simplified, "往初");
        assert_eq!(entry.pinyin, "wang3 chu1");
    }

    #[test]
    fn normalizes_umlaut_notation() {
        let entry = parse_entry("鑢 鑢 [Lu:4] /surname Lü/").unwrap();
        assert_eq!(entry.pinyin, "Lv4");
    }

    #[test]
    fn joins_plain_words_and_names() {
        assert_eq!(join_pinyin("qin2 wu4 yuan2"), "qin2wu4yuan2");
        assert_eq!(
            join_pinyin("Sheng4 He4 le4 na2 Dao3"),
            "Sheng4 He4le4na2 Dao3"
        );
        assert_eq!(
            join_pinyin("you3 jie4 you3 huan2 , zai4 jie4 bu4 nan2"),
            "you3jie4you3huan2, zai4jie4bu4nan2"
        );
    }

    #[test]
    fn inserts_dividing_apostrophe() {
        assert_eq!(join_pinyin("da2 an4"), "da2'an4");
    }

    #[test]
    fn removes_prefixed_compounds() {
        let mut entries = HashSet::new();
        for (trad, simp, pinyin) in [
            ("好", "好", "hao3"),
            ("不好", "不好", "bu4 hao3"),
            ("不錯", "不错", "bu4 cuo4"),
        ] {
            entries.insert(CedictEntry {
                traditional: trad.to_string(),
                simplified: simp.to_string(),
                pinyin: pinyin.to_string(),
            });
        }
        let kept = remove_prefixes(&entries);
        // 不好 decomposes into 不 + 好 only if 好 is an entry; 不錯 has no
        // standalone 錯 entry, so it stays.
        assert!(!kept.iter().any(|e| e.traditional == "不好"));
        assert!(kept.iter().any(|e| e.traditional == "不錯"));
        assert!(kept.iter().any(|e| e.traditional == "好"));
    }

    #[test]
    fn ambiguous_entries_come_first() {
        let mut entries = HashSet::new();
        for (trad, simp, pinyin) in [
            ("著", "着", "zhe5"),
            ("著", "著", "zhu4"),
            ("好", "好", "hao3"),
        ] {
            entries.insert(CedictEntry {
                traditional: trad.to_string(),
                simplified: simp.to_string(),
                pinyin: pinyin.to_string(),
            });
        }
        let ordered = sorted_entries(entries);
        assert_eq!(ordered.len(), 3);
        assert_eq!(ordered[0].traditional, "著");
        assert_eq!(ordered[1].traditional, "著");
        assert_eq!(ordered[2].traditional, "好");
    }
}
