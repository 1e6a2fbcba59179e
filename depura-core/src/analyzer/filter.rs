//! Lexical filter: drops stopwords, fillers and short tokens.

use std::sync::Arc;

use depura_types::DEFAULT_MIN_TOKEN_LEN;

use crate::analyzer::tokenizer::Tokenizer;
use crate::lexicon::Lexicon;

/// Tokenizes normalized text and keeps only content-bearing tokens.
///
/// A token survives if it is not a stopword, not a single-word discourse
/// filler, and has at least `min_len` characters. Order is preserved and
/// exact repeats are left for the reducer.
#[derive(Debug, Clone)]
pub struct LexicalFilter {
    lexicon: Arc<Lexicon>,
    tokenizer: Tokenizer,
    min_len: usize,
}

impl LexicalFilter {
    /// Creates a filter with the default minimum token length.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_min_len(lexicon, DEFAULT_MIN_TOKEN_LEN)
    }

    /// Creates a filter with a custom minimum token length.
    pub fn with_min_len(lexicon: Arc<Lexicon>, min_len: usize) -> Self {
        Self {
            lexicon,
            tokenizer: Tokenizer::new(),
            min_len,
        }
    }

    /// Minimum token length, in characters.
    #[inline(always)]
    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// The shared lexicon.
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Returns `true` if `token` carries content.
    #[inline]
    pub fn keeps(&self, token: &str) -> bool {
        // byte length is an upper bound on char length
        if token.len() < self.min_len || token.chars().count() < self.min_len {
            return false;
        }
        !self.lexicon.is_stopword(token) && !self.lexicon.is_filler(token)
    }

    /// Tokenizes `normalized` and returns the surviving tokens in order.
    ///
    /// `normalized` must be normalizer output.
    pub fn filter_tokens<'n>(&self, normalized: &'n str) -> Vec<&'n str> {
        let mut kept = Vec::new();
        self.filter_into(normalized, &mut kept);
        kept
    }

    /// Like [`filter_tokens`](Self::filter_tokens), writing into a reused buffer.
    pub fn filter_into<'n>(&self, normalized: &'n str, out: &mut Vec<&'n str>) {
        out.clear();
        self.tokenizer.tokenize(normalized, |token, _| {
            if self.keeps(token) {
                out.push(token);
            }
        });
    }
}
