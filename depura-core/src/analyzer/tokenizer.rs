//! Streaming tokenizer.
//!
//! Splits normalized text into tokens without allocating. It is the second
//! stage of the cleaning pipeline: the normalizer has already removed every
//! character that is not a letter or a space, so a token is simply a run of
//! bytes between ASCII spaces.
//!
//! Given `"economia esta complicada"` it emits:
//!
//! ```ignore
//! ("economia", 0)
//! ("esta", 1)
//! ("complicada", 2)
//! ```
//!
//! ## The Input Contract
//!
//! The tokenizer expects the normalizer's output:
//! - No leading or trailing whitespace
//! - No consecutive spaces between words
//!
//! Violations panic in debug builds. Non-ASCII letters such as `ñ` are fine,
//! since a UTF-8 continuation byte is never 0x20.

use core::str;
use memchr::memchr_iter;

/// Streaming tokenizer: splits normalized text on ASCII spaces.
///
/// Tokens are slices of the input, so no heap allocation happens during
/// tokenization.
///
/// ```
/// use depura_core::analyzer::tokenizer::Tokenizer;
///
/// let mut tokens = Vec::new();
/// Tokenizer::new().tokenize("año nuevo", |text, _pos| tokens.push(text));
///
/// assert_eq!(tokens, ["año", "nuevo"]);
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes normalized input and emits `(text, position)`.
    ///
    /// Position is `u32`. After emitting a token at position `u32::MAX`,
    /// further emissions stop.
    #[inline(always)]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, u32),
    {
        let bytes = normalized.as_bytes();

        debug_assert!(
            bytes.first().is_none_or(|&b| b != b' '),
            "tokenizer: leading whitespace (normalizer contract violated)"
        );

        debug_assert!(
            bytes.last().is_none_or(|&b| b != b' '),
            "tokenizer: trailing whitespace (normalizer contract violated)"
        );

        debug_assert!(
            !normalized.contains("  "),
            "tokenizer: consecutive spaces (normalizer contract violated)"
        );

        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;
        let mut pos = 0u32;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                // SAFETY: `normalized` is valid UTF-8 and 0x20 is never part of a
                // multi-byte sequence, so `start..i` falls on char boundaries.
                let text = unsafe { str::from_utf8_unchecked(&bytes[start..i]) };
                emit(text, pos);
                if pos == u32::MAX {
                    return;
                }
                pos += 1;
            }
            start = i + 1;
        }

        if start < bytes.len() {
            // SAFETY: `start` is one past an ASCII space, hence a char boundary.
            let text = unsafe { str::from_utf8_unchecked(&bytes[start..]) };
            emit(text, pos);
        }
    }

    /// Collects every token of `normalized` into a vector.
    pub fn tokens<'n>(&self, normalized: &'n str) -> Vec<&'n str> {
        let mut out = Vec::new();
        self.tokenize(normalized, |text, _| out.push(text));
        out
    }
}
