//! Text analysis stages.
//!
//! This module provides the per-token building blocks of the cleaner:
//! - **Normalizer**: Lowercases, strips accents and punctuation, collapses whitespace
//! - **Tokenizer**: Splits normalized text into tokens
//! - **Filter**: Drops stopwords, fillers and short tokens
//! - **Similarity**: Scores how alike two tokens are (0..=100)

pub mod filter;
pub mod normalizer;
pub mod similarity;
pub mod tokenizer;

pub use filter::LexicalFilter;
pub use normalizer::{NormalizerConfig, TextNormalizer};
pub use similarity::{IndelRatio, Similarity};
pub use tokenizer::Tokenizer;
