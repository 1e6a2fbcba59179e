//! Cleaning pipeline for Spanish speech transcripts.
//!
//! Turns noisy transcribed text into a compact sequence of content words:
//!
//! ```text
//! "Eh, bueno, la economía económica está, está muy complicada!!"
//!   → normalize  "eh bueno la economia economica esta esta muy complicada"
//!   → filter     ["economia", "economica", "complicada"]
//!   → reduce     "economia complicada"
//! ```
//!
//! ## Layout
//!
//! - [`analyzer`]: normalizer, tokenizer, lexical filter, token similarity
//! - [`lexicon`]: stopword lists and discourse fillers
//! - [`reducer`]: greedy near-duplicate removal
//! - [`pipeline`]: the per-record [`Cleaner`]
//! - [`dispatch`]: parallel batch cleaning
//! - [`table`]: CSV input and output
//! - [`observability`]: tracing setup for binaries

pub mod analyzer;
pub mod dispatch;
pub mod error;
pub mod lexicon;
pub mod observability;
pub mod pipeline;
pub mod reducer;
pub mod table;

pub use dispatch::{DispatchConfig, Dispatcher, RecordText};
pub use error::{Error, Result};
pub use lexicon::{Lexicon, LexiconBuilder, StopwordSource};
pub use pipeline::Cleaner;
pub use reducer::NearDuplicateReducer;
pub use table::{read_table, write_table, Table};

pub use depura_types::{CleanOutcome, CleanerConfig, RecordError, RecordId, Score};
