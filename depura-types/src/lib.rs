//! Core types and configuration for the depura transcript cleaner.
//!
//! This crate holds the values that cross the boundary between the
//! cleaning pipeline, the parallel dispatcher and the table I/O layer.
//! It has no dependencies so that any front end can share them:
//!
//! - **Identifiers**: records are addressed by their row index
//! - **Outcomes**: every dispatched record yields exactly one [`CleanOutcome`]
//! - **Configuration**: thresholds and lengths live in [`CleanerConfig`]

#![warn(missing_docs)]

use core::fmt;

/// Record identifier.
///
/// A record is identified by its zero-based position in the input
/// collection. The dispatcher uses it to restore input order after
/// results arrive in completion order.
pub type RecordId = usize;

/// Similarity score between two tokens, on a 0..=100 scale.
pub type Score = u8;

/// Highest possible similarity score (identical strings).
pub const MAX_SCORE: Score = 100;

/// Near-duplicate threshold applied by the cleaning pipeline.
pub const DEFAULT_NEAR_DUPLICATE_THRESHOLD: Score = 90;

/// Default threshold of the general-purpose fuzzy word dedup helper.
///
/// The cleaning pipeline always overrides it with
/// [`DEFAULT_NEAR_DUPLICATE_THRESHOLD`].
pub const DEFAULT_FUZZY_THRESHOLD: Score = 70;

/// Tokens shorter than this many characters are dropped by the filter.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 4;

/// Why a single record could not be cleaned.
///
/// These errors are scoped to one record; the rest of the batch is
/// unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The text cell was absent for this row.
    MissingText,
    /// The text cell could not be decoded as UTF-8.
    InvalidEncoding {
        /// Byte offset of the first invalid sequence.
        valid_up_to: usize,
    },
    /// The pipeline panicked while processing the record.
    Panicked {
        /// Panic payload, when it was a string.
        message: String,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::MissingText => write!(f, "record has no text"),
            RecordError::InvalidEncoding { valid_up_to } => {
                write!(
                    f,
                    "record text is not valid UTF-8 (valid up to byte {})",
                    valid_up_to
                )
            }
            RecordError::Panicked { message } => {
                write!(f, "cleaning panicked: {}", message)
            }
        }
    }
}

impl core::error::Error for RecordError {}

/// Result of cleaning one record.
///
/// Outcomes are ordered by `id` only, so sorting a batch of outcomes
/// restores input order regardless of the order workers finished in.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    /// Position of the record in the input collection.
    pub id: RecordId,
    /// Cleaned text, or why the record was skipped.
    pub result: Result<String, RecordError>,
}

impl CleanOutcome {
    /// Creates a successful outcome.
    #[inline(always)]
    pub const fn cleaned(id: RecordId, text: String) -> Self {
        Self { id, result: Ok(text) }
    }

    /// Creates a failed outcome.
    #[inline(always)]
    pub const fn failed(id: RecordId, error: RecordError) -> Self {
        Self {
            id,
            result: Err(error),
        }
    }

    /// Returns `true` if the record was cleaned.
    #[inline(always)]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Cleaned text, or the empty string for a failed record.
    pub fn text_or_empty(&self) -> &str {
        match &self.result {
            Ok(text) => text,
            Err(_) => "",
        }
    }

    /// Consumes the outcome and returns the cleaned text, or the empty
    /// string for a failed record.
    pub fn into_text(self) -> String {
        self.result.unwrap_or_default()
    }
}

impl PartialEq for CleanOutcome {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CleanOutcome {}

impl PartialOrd for CleanOutcome {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CleanOutcome {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for CleanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(text) => {
                let tokens = text.split(' ').filter(|t| !t.is_empty()).count();
                write!(f, "record={} tokens={}", self.id, tokens)
            }
            Err(e) => write!(f, "record={} error={}", self.id, e),
        }
    }
}

/// Cleaning configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanerConfig {
    /// Minimum token length, in characters, kept by the lexical filter.
    /// Default: 4
    pub min_token_len: usize,
    /// A token is dropped when its similarity to an already kept token
    /// exceeds this score. Exact repeats are always dropped.
    /// Default: 90
    pub near_duplicate_threshold: Score,
    /// Default threshold for standalone fuzzy word dedup.
    ///
    /// Not consulted by the cleaning pipeline, which uses
    /// `near_duplicate_threshold`.
    /// Default: 70
    pub fuzzy_threshold: Score,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            near_duplicate_threshold: DEFAULT_NEAR_DUPLICATE_THRESHOLD,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl CleanerConfig {
    /// Configuration that only collapses exact repeats.
    pub const fn exact() -> Self {
        Self {
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            near_duplicate_threshold: MAX_SCORE,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    /// Returns a copy with a different near-duplicate threshold,
    /// clamped to [`MAX_SCORE`].
    pub const fn with_threshold(mut self, threshold: Score) -> Self {
        self.near_duplicate_threshold = if threshold > MAX_SCORE {
            MAX_SCORE
        } else {
            threshold
        };
        self
    }
}
