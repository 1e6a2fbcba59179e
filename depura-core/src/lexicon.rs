//! Stopword and discourse-filler lexicons.
//!
//! A [`Lexicon`] is built once at startup from three independently sourced
//! stopword lists plus a fixed list of discourse fillers, then shared
//! read-only (usually behind an `Arc`) by every worker.
//!
//! Every entry goes through the same [`TextNormalizer`] as the tokens it is
//! matched against, so `"está"` in a list matches the token `"esta"`.
//!
//! ## Inert fillers
//!
//! The filler list contains multi-word phrases such as `"por ejemplo"`.
//! Filtering works on single tokens, so those phrases can never match.
//! They are kept as-is and reported by [`Lexicon::inert_fillers`].

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::analyzer::normalizer::{NormalizerConfig, TextNormalizer};
use crate::error::{Error, Result};

/// Discourse connectors and spoken-language fillers.
pub const DISCOURSE_FILLERS: &[&str] = &[
    // connectors
    "ademas",
    "tambien",
    "por eso",
    "por lo tanto",
    "asi que",
    "sin embargo",
    "no obstante",
    "entonces",
    "de hecho",
    "por ejemplo",
    "en cambio",
    "aunque",
    "es decir",
    "en resumen",
    "por consiguiente",
    "por ende",
    "por otra parte",
    "por un lado",
    "por otro lado",
    "por supuesto",
    "en conclusion",
    "al contrario",
    "en realidad",
    "en efecto",
    "por tanto",
    // spoken fillers
    "eh",
    "este",
    "pues",
    "o sea",
    "verdad",
    "bueno",
    "miren",
    "imaginense",
    "fijense",
    "digamos",
    "como tal",
    "claro",
    "ok",
    "a ver",
    "vean",
    "nada mas",
    "eso si",
    "ahora bien",
    "asi como",
    "mas bien",
    "si claro",
    "me explico",
    "vale",
    "ya saben",
    // empty repetitions
    "y bueno",
    "entonces bueno",
    "entonces este",
    "y este",
    "bueno pues",
    "o sea que",
    "lo que pasa",
    "como que",
    "este pues",
    "pues bueno",
];

/// One of the three stopword lists unioned into a lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StopwordSource {
    /// Stopwords observed in news and conference corpora.
    Corpus = 0,
    /// General-purpose linguistic function words.
    Linguistic = 1,
    /// The ISO stopword collection.
    Iso = 2,
}

impl StopwordSource {
    /// All sources, in load order.
    pub const ALL: [StopwordSource; 3] = [
        StopwordSource::Corpus,
        StopwordSource::Linguistic,
        StopwordSource::Iso,
    ];

    /// Short name used in logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            StopwordSource::Corpus => "corpus",
            StopwordSource::Linguistic => "linguistic",
            StopwordSource::Iso => "iso",
        }
    }

    /// The list shipped with the crate.
    #[must_use]
    pub const fn builtin(self) -> &'static str {
        match self {
            StopwordSource::Corpus => include_str!("../data/lexicon/spacy_es.txt"),
            StopwordSource::Linguistic => include_str!("../data/lexicon/nltk_es.txt"),
            StopwordSource::Iso => include_str!("../data/lexicon/iso_es.txt"),
        }
    }
}

/// Yields the entries of a one-word-per-line list, skipping blanks and
/// `#` comments.
fn list_entries(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Process-wide, read-only stopword and filler sets.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    stopwords: FxHashSet<String>,
    fillers: FxHashSet<String>,
}

impl Lexicon {
    /// Builds the lexicon from the lists shipped with the crate.
    ///
    /// Infallible: the lists are compiled in.
    pub fn builtin() -> Self {
        Self::builtin_with(NormalizerConfig::default())
    }

    /// Like [`builtin`](Self::builtin), normalizing entries with `config`.
    ///
    /// Use the same config as the cleaner's normalizer, otherwise entries
    /// spelled with `ñ` cannot match folded tokens.
    pub fn builtin_with(config: NormalizerConfig) -> Self {
        let normalizer = TextNormalizer::new(config);
        let mut lexicon = Self::default();
        for source in StopwordSource::ALL {
            lexicon.extend_stopwords(&normalizer, source.builtin());
        }
        lexicon.extend_fillers(&normalizer, DISCOURSE_FILLERS.iter().copied());
        lexicon
    }

    /// Returns a builder for replacing individual lists with files.
    pub fn builder() -> LexiconBuilder {
        LexiconBuilder::default()
    }

    fn extend_stopwords(&mut self, normalizer: &TextNormalizer, text: &str) {
        for entry in list_entries(text) {
            let word = normalizer.normalize(entry);
            if !word.is_empty() {
                self.stopwords.insert(word);
            }
        }
    }

    fn extend_fillers<'a>(
        &mut self,
        normalizer: &TextNormalizer,
        entries: impl IntoIterator<Item = &'a str>,
    ) {
        for entry in entries {
            let phrase = normalizer.normalize(entry);
            if !phrase.is_empty() {
                self.fillers.insert(phrase);
            }
        }
    }

    /// Returns `true` if `token` is in the stopword union.
    #[inline(always)]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Returns `true` if `token` is a single-word discourse filler.
    #[inline(always)]
    pub fn is_filler(&self, token: &str) -> bool {
        self.fillers.contains(token)
    }

    /// Filler phrases that contain a space and therefore never match a token.
    pub fn inert_fillers(&self) -> impl Iterator<Item = &str> {
        self.fillers
            .iter()
            .map(String::as_str)
            .filter(|phrase| phrase.contains(' '))
    }

    /// Number of distinct stopwords.
    #[must_use]
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// Number of distinct filler entries, inert ones included.
    #[must_use]
    pub fn filler_count(&self) -> usize {
        self.fillers.len()
    }
}

/// Builds a [`Lexicon`], optionally reading some stopword lists from disk.
///
/// ```no_run
/// use depura_core::lexicon::{Lexicon, StopwordSource};
///
/// let lexicon = Lexicon::builder()
///     .with_file(StopwordSource::Corpus, "corpus_stopwords.txt")
///     .build()?;
/// # Ok::<(), depura_core::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LexiconBuilder {
    overrides: [Option<PathBuf>; 3],
    extra_fillers: Vec<String>,
    normalizer: NormalizerConfig,
}

impl LexiconBuilder {
    /// Reads `source` from `path` instead of the shipped list.
    pub fn with_file(mut self, source: StopwordSource, path: impl Into<PathBuf>) -> Self {
        self.overrides[source as usize] = Some(path.into());
        self
    }

    /// Reads `source` from `path` when one is given.
    pub fn with_optional_file(self, source: StopwordSource, path: Option<&Path>) -> Self {
        match path {
            Some(path) => self.with_file(source, path),
            None => self,
        }
    }

    /// Normalizes entries with `config`; must match the cleaner's normalizer.
    pub fn with_normalizer(mut self, config: NormalizerConfig) -> Self {
        self.normalizer = config;
        self
    }

    /// Adds filler entries on top of [`DISCOURSE_FILLERS`].
    pub fn with_fillers<I, S>(mut self, fillers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_fillers.extend(fillers.into_iter().map(Into::into));
        self
    }

    /// Loads every list and builds the lexicon.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lexicon`] if an override file cannot be read and
    /// [`Error::EmptyLexicon`] if it has no entries.
    pub fn build(self) -> Result<Lexicon> {
        let normalizer = TextNormalizer::new(self.normalizer);
        let mut lexicon = Lexicon::default();

        for source in StopwordSource::ALL {
            match &self.overrides[source as usize] {
                Some(path) => {
                    let text = fs::read_to_string(path).map_err(|error| Error::Lexicon {
                        source_name: source.name(),
                        path: path.clone(),
                        error,
                    })?;
                    if list_entries(&text).next().is_none() {
                        return Err(Error::EmptyLexicon {
                            source_name: source.name(),
                            path: path.clone(),
                        });
                    }
                    debug!(source = source.name(), path = %path.display(), "loaded stopword file");
                    lexicon.extend_stopwords(&normalizer, &text);
                }
                None => lexicon.extend_stopwords(&normalizer, source.builtin()),
            }
        }

        lexicon.extend_fillers(&normalizer, DISCOURSE_FILLERS.iter().copied());
        lexicon.extend_fillers(&normalizer, self.extra_fillers.iter().map(String::as_str));

        info!(
            stopwords = lexicon.stopword_count(),
            fillers = lexicon.filler_count(),
            inert_fillers = lexicon.inert_fillers().count(),
            "lexicon built"
        );

        Ok(lexicon)
    }
}
