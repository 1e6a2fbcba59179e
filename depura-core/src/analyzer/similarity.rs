//! Token similarity scoring.
//!
//! Scores are integers on a 0..=100 scale. The default metric is the indel
//! ratio: edit distance counting only insertions and deletions, normalized by
//! the combined length of both strings. Equivalently,
//! `200 * LCS(a, b) / (len(a) + len(b))`, rounded half to even.

use depura_types::{Score, MAX_SCORE};
use smallvec::SmallVec;

/// Character buffer sized for typical Spanish words.
type CharBuf = SmallVec<[char; 32]>;

/// Indel similarity ratio between two strings, over characters.
///
/// Two empty strings are identical and score 100.
///
/// # Example
///
/// ```
/// use depura_core::analyzer::similarity::ratio;
///
/// assert_eq!(ratio("esta", "esta"), 100);
/// assert_eq!(ratio("economia", "economica"), 94);
/// ```
#[inline]
pub fn ratio(a: &str, b: &str) -> Score {
    if a == b {
        return MAX_SCORE;
    }

    let a: CharBuf = a.chars().collect();
    let b: CharBuf = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return MAX_SCORE;
    }

    let lcs = lcs_len(&a, &b);
    round_half_even(200 * lcs, total) as Score
}

/// Longest common subsequence length with a single rolling row.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let mut row: SmallVec<[usize; 32]> = SmallVec::from_elem(0, short.len() + 1);

    for &lc in long {
        let mut diag = 0usize;
        for (j, &sc) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if lc == sc {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }

    row[short.len()]
}

#[inline(always)]
fn round_half_even(num: usize, den: usize) -> usize {
    let q = num / den;
    let twice_rem = 2 * (num % den);
    if twice_rem > den || (twice_rem == den && q % 2 == 1) {
        q + 1
    } else {
        q
    }
}

/// Trait for token similarity metrics.
///
/// Lets the reducer run with a different metric without changing its
/// greedy algorithm.
pub trait Similarity {
    /// Scores two tokens on a 0..=100 scale; identical tokens score 100.
    fn score(&self, a: &str, b: &str) -> Score;
}

/// Indel edit-distance ratio, see [`ratio`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

impl Similarity for IndelRatio {
    #[inline(always)]
    fn score(&self, a: &str, b: &str) -> Score {
        ratio(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_max() {
        assert_eq!(ratio("esta", "esta"), 100);
        assert_eq!(ratio("", ""), 100);
        assert_eq!(ratio("señor", "señor"), 100);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(ratio("abc", "xyz"), 0);
        assert_eq!(ratio("hola", ""), 0);
    }

    #[test]
    fn single_insertion() {
        // lcs 8 over 17 chars
        assert_eq!(ratio("economia", "economica"), 94);
    }

    #[test]
    fn single_substitution_counts_twice() {
        // one substitution = delete + insert, lcs 9 over 20 chars
        assert_eq!(ratio("complicada", "complicado"), 90);
    }

    #[test]
    fn symmetric() {
        let pairs = [("economia", "economica"), ("casa", "cosas"), ("año", "ano")];
        for (a, b) in pairs {
            assert_eq!(ratio(a, b), ratio(b, a));
        }
    }

    #[test]
    fn counts_characters_not_bytes() {
        // "año" vs "ano": lcs 2 over 6 chars
        assert_eq!(ratio("año", "ano"), 67);
    }

    #[test]
    fn rounds_half_to_even() {
        // 200 * 1 / 16 = 12.5
        assert_eq!(ratio("a", &format!("a{}", "b".repeat(14))), 12);
        // 200 * 3 / 16 = 37.5
        assert_eq!(ratio("aaa", &format!("aaa{}", "b".repeat(10))), 38);
    }

    #[test]
    fn lcs_handles_long_tokens() {
        let a = "a".repeat(100);
        let b = format!("{}b", a);
        // lcs 100 over 201 chars rounds up to a perfect score
        assert_eq!(ratio(&a, &b), 100);
        assert_eq!(ratio(&a, &"b".repeat(100)), 0);
    }

    #[test]
    fn indel_ratio_trait_matches_function() {
        let s = IndelRatio;
        assert_eq!(s.score("casa", "cosa"), ratio("casa", "cosa"));
    }
}
