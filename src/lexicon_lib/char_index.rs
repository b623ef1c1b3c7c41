use std::collections::{HashMap, HashSet};

/// First-character candidate index over lexicon entries.
///
/// Each bucket holds `(entry id, length in chars)` pairs. After [`finish`],
/// buckets are ordered by descending length then ascending preference rank,
/// so a forward scan yields the longest, most preferred match first.
///
/// Length statistics are tracked incrementally so lookups can rule out
/// lengths the lexicon does not contain without touching a bucket.
///
/// [`finish`]: CharIndex::finish
#[derive(Debug, Clone, Default)]
pub struct CharIndex {
    buckets: HashMap<char, Vec<(u32, u16)>>,

    pub min_len: u16,
    pub max_len: u16,
    pub key_len_mask: u64,          // lengths 1..=64 → bit n-1
    pub long_lengths: HashSet<u16>, // >64
}

impl CharIndex {
    /// Insert an entry id under its first character and update stats
    /// *incrementally* (no rescans).
    #[inline]
    pub fn insert(&mut self, first: char, id: u32, len_chars: u16) {
        if len_chars != 0 {
            if len_chars <= 64 {
                self.key_len_mask |= 1u64 << (len_chars - 1);
            } else {
                self.long_lengths.insert(len_chars);
            }
            if self.min_len == 0 || len_chars < self.min_len {
                self.min_len = len_chars;
            }
            if len_chars > self.max_len {
                self.max_len = len_chars;
            }
        }
        self.buckets.entry(first).or_default().push((id, len_chars));
    }

    /// Fix candidate ordering after all inserts. `rank` maps an entry id to
    /// its preference rank (lower = preferred).
    pub fn finish<F>(&mut self, rank: F)
    where
        F: Fn(u32) -> u32,
    {
        for bucket in self.buckets.values_mut() {
            bucket.sort_by(|&(a, la), &(b, lb)| lb.cmp(&la).then(rank(a).cmp(&rank(b))));
        }
    }

    /// Candidates starting with `first`, longest first.
    #[inline]
    pub fn candidates(&self, first: char) -> &[(u32, u16)] {
        self.buckets.get(&first).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn has_key_len(&self, n: u16) -> bool {
        if n == 0 {
            return false;
        }
        if n <= 64 {
            (self.key_len_mask & (1u64 << (n - 1))) != 0
        } else {
            self.long_lengths.contains(&n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_ordered_longest_first_then_rank() {
        let mut index = CharIndex::default();
        // ids 0..4 with (len, rank): 0:(1,0) 1:(3,1) 2:(3,0) 3:(2,0)
        let ranks = [0u32, 1, 0, 0];
        index.insert('中', 0, 1);
        index.insert('中', 1, 3);
        index.insert('中', 2, 3);
        index.insert('中', 3, 2);
        index.finish(|id| ranks[id as usize]);

        let ids: Vec<u32> = index.candidates('中').iter().map(|&(id, _)| id).collect();
        assert_eq!(ids, vec![2, 1, 3, 0]);
        assert!(index.candidates('外').is_empty());
    }

    #[test]
    fn length_stats() {
        let mut index = CharIndex::default();
        index.insert('你', 0, 2);
        index.insert('好', 1, 1);
        index.insert('你', 2, 70);
        assert_eq!(index.min_len, 1);
        assert_eq!(index.max_len, 70);
        assert!(index.has_key_len(1));
        assert!(index.has_key_len(2));
        assert!(!index.has_key_len(3));
        assert!(index.has_key_len(70));
        assert!(!index.has_key_len(0));
    }
}
