//! Ratcliff/Obershelp sequence similarity over characters.
//!
//! The query is the indexed sequence (`b`); every candidate is compared
//! against it in turn, so the index is built once per lookup.

use std::collections::HashMap;

pub const DEFAULT_CUTOFF: f64 = 0.6;

/// 查詢字串長度達到此值才啟用 popular 字元過濾
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    b: Vec<char>,
    b2j: HashMap<char, Vec<usize>>,
    full_b_count: HashMap<char, usize>,
}

impl SequenceMatcher {
    pub fn new(query: &str) -> Self {
        let b: Vec<char> = query.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        let mut full_b_count: HashMap<char, usize> = HashMap::new();
        for (j, ch) in b.iter().enumerate() {
            b2j.entry(*ch).or_default().push(j);
            *full_b_count.entry(*ch).or_insert(0) += 1;
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let threshold = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= threshold);
        }

        Self {
            b,
            b2j,
            full_b_count,
        }
    }

    /// Upper bound from lengths alone.
    pub fn real_quick_ratio(&self, candidate: &[char]) -> f64 {
        let la = candidate.len();
        let lb = self.b.len();
        ratio_of(la.min(lb), la + lb)
    }

    /// Upper bound from the multiset intersection of characters.
    pub fn quick_ratio(&self, candidate: &[char]) -> f64 {
        let mut available: HashMap<char, isize> = HashMap::new();
        let mut matches = 0;
        for ch in candidate {
            let remaining = available
                .entry(*ch)
                .or_insert_with(|| self.full_b_count.get(ch).copied().unwrap_or(0) as isize);
            if *remaining > 0 {
                matches += 1;
            }
            *remaining -= 1;
        }
        ratio_of(matches, candidate.len() + self.b.len())
    }

    pub fn ratio(&self, candidate: &[char]) -> f64 {
        ratio_of(
            self.matching_characters(candidate),
            candidate.len() + self.b.len(),
        )
    }

    /// Total size of the matching blocks, found by recursing on either side of
    /// the longest common run.
    fn matching_characters(&self, a: &[char]) -> usize {
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        let mut total = 0;
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        // j2len[j] = 以 a[i-1] 和 b[j] 結尾的最長共同子字串長度
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_j2len = HashMap::new();
            if let Some(indices) = self.b2j.get(ch) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // popular 字元不會出現在 b2j，這裡把它們補回兩端
        while best_i > alo && best_j > blo && a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

fn ratio_of(matches: usize, length: usize) -> f64 {
    if length == 0 {
        1.0
    } else {
        2.0 * matches as f64 / length as f64
    }
}

/// Similarity between two strings in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let candidate: Vec<char> = a.chars().collect();
    SequenceMatcher::new(b).ratio(&candidate)
}

/// Index and score of the single best candidate whose similarity to `query`
/// is at least `cutoff`. Ties keep the earliest candidate.
pub fn best_match<'a, I>(query: &str, candidates: I, cutoff: f64) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let matcher = SequenceMatcher::new(query);
    let mut best: Option<(usize, f64)> = None;

    for (index, candidate) in candidates.into_iter().enumerate() {
        let chars: Vec<char> = candidate.chars().collect();
        if matcher.real_quick_ratio(&chars) < cutoff || matcher.quick_ratio(&chars) < cutoff {
            continue;
        }
        let score = matcher.ratio(&chars);
        if score < cutoff {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best
}
