//! Greedy near-duplicate token reduction.
//!
//! Transcribed speech repeats and mispronounces words ("economia economica",
//! "esta esta"). The reducer walks a record's tokens in order and drops every
//! token that is too similar to one it already kept.
//!
//! ## Algorithm
//!
//! ```text
//! kept = []
//! for t in tokens:
//!     if t in kept or max(score(t, k) for k in kept) > threshold:
//!         drop t
//!     else:
//!         kept.push(t)
//! ```
//!
//! The decision for a token depends only on tokens accepted before it and is
//! never revisited, so the result depends on input order: of two similar
//! tokens, whichever comes first is the one kept. Two similar tokens can
//! both survive when neither exceeds the threshold against the other.
//!
//! ## Cost
//!
//! O(n²) similarity computations per record, where n is the record's
//! filtered token count. Fine for transcript paragraphs; very long records
//! should be split upstream rather than switching to clustering, which would
//! change the output.

use depura_types::{Score, DEFAULT_FUZZY_THRESHOLD, DEFAULT_NEAR_DUPLICATE_THRESHOLD, MAX_SCORE};

use crate::analyzer::similarity::{IndelRatio, Similarity};

/// Drops tokens that are near-duplicates of an earlier kept token.
///
/// # Example
///
/// ```
/// use depura_core::reducer::NearDuplicateReducer;
///
/// let reducer = NearDuplicateReducer::default();
/// let kept = reducer.reduce(&["economia", "economica", "complicada", "economia"]);
/// assert_eq!(kept, ["economia", "complicada"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NearDuplicateReducer<S = IndelRatio> {
    threshold: Score,
    similarity: S,
}

impl Default for NearDuplicateReducer {
    fn default() -> Self {
        Self::new(DEFAULT_NEAR_DUPLICATE_THRESHOLD)
    }
}

impl NearDuplicateReducer {
    /// Creates a reducer using the indel ratio.
    ///
    /// Thresholds above 100 are clamped to 100.
    pub fn new(threshold: Score) -> Self {
        Self::with_similarity(threshold, IndelRatio)
    }
}

impl<S: Similarity> NearDuplicateReducer<S> {
    /// Creates a reducer with a custom similarity metric.
    pub fn with_similarity(threshold: Score, similarity: S) -> Self {
        Self {
            threshold: threshold.min(MAX_SCORE),
            similarity,
        }
    }

    /// Score a token must exceed to be dropped.
    #[inline(always)]
    pub fn threshold(&self) -> Score {
        self.threshold
    }

    /// Returns `true` if `token` repeats or is too similar to any of `kept`.
    #[inline]
    pub fn is_near_duplicate(&self, token: &str, kept: &[&str]) -> bool {
        kept.iter()
            .any(|k| *k == token || self.similarity.score(token, k) > self.threshold)
    }

    /// Returns the kept tokens, in input order.
    pub fn reduce<'t>(&self, tokens: &[&'t str]) -> Vec<&'t str> {
        let mut kept = Vec::with_capacity(tokens.len());
        self.reduce_into(tokens, &mut kept);
        kept
    }

    /// Like [`reduce`](Self::reduce), writing into a reused buffer.
    pub fn reduce_into<'t>(&self, tokens: &[&'t str], kept: &mut Vec<&'t str>) {
        kept.clear();
        for &token in tokens {
            if !self.is_near_duplicate(token, kept.as_slice()) {
                kept.push(token);
            }
        }
    }

    /// Reduces `tokens` and joins the survivors with single spaces.
    pub fn reduce_to_string(&self, tokens: &[&str]) -> String {
        self.reduce(tokens).join(" ")
    }
}

/// Reduces `tokens` with the indel ratio and joins the survivors with spaces.
pub fn reduce_near_duplicates(tokens: &[&str], threshold: Score) -> String {
    NearDuplicateReducer::new(threshold).reduce_to_string(tokens)
}

/// Drops similar words from whitespace-separated text.
///
/// General-purpose helper; `None` uses [`DEFAULT_FUZZY_THRESHOLD`] (70).
/// The cleaning pipeline does not go through here and always reduces at
/// its configured near-duplicate threshold.
pub fn dedupe_similar_words(text: &str, threshold: Option<Score>) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    reduce_near_duplicates(&tokens, threshold.unwrap_or(DEFAULT_FUZZY_THRESHOLD))
}
