//! Per-record cleaning pipeline.
//!
//! Composes the stages in a fixed order:
//!
//! ```text
//! raw text → TextNormalizer → LexicalFilter (tokenize + drop) → NearDuplicateReducer → cleaned text
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use depura_types::{CleanOutcome, CleanerConfig, RecordError, RecordId};

use crate::analyzer::filter::LexicalFilter;
use crate::analyzer::normalizer::{NormalizerConfig, TextNormalizer};
use crate::lexicon::Lexicon;
use crate::reducer::NearDuplicateReducer;

/// The full cleaning transformation for one record.
///
/// Holds only read-only state, so one `Cleaner` can be shared by every
/// worker of a batch.
///
/// ```
/// use std::sync::Arc;
/// use depura_core::lexicon::Lexicon;
/// use depura_core::pipeline::Cleaner;
///
/// let cleaner = Cleaner::new(Arc::new(Lexicon::builtin()));
/// let out = cleaner.clean("Eh, bueno, la economía económica está, está muy complicada!!");
/// assert_eq!(out, "economia complicada");
/// ```
#[derive(Debug, Clone)]
pub struct Cleaner {
    normalizer: TextNormalizer,
    filter: LexicalFilter,
    reducer: NearDuplicateReducer,
    config: CleanerConfig,
}

impl Cleaner {
    /// Creates a cleaner with the default configuration.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_config(lexicon, CleanerConfig::default())
    }

    /// Creates a cleaner with a custom configuration.
    pub fn with_config(lexicon: Arc<Lexicon>, config: CleanerConfig) -> Self {
        Self::with_normalizer(lexicon, config, NormalizerConfig::default())
    }

    /// Creates a cleaner with custom cleaning and normalizer settings.
    pub fn with_normalizer(
        lexicon: Arc<Lexicon>,
        config: CleanerConfig,
        normalizer: NormalizerConfig,
    ) -> Self {
        Self {
            normalizer: TextNormalizer::new(normalizer),
            filter: LexicalFilter::with_min_len(lexicon, config.min_token_len),
            reducer: NearDuplicateReducer::new(config.near_duplicate_threshold),
            config,
        }
    }

    /// Active configuration.
    #[inline(always)]
    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Cleans one text.
    ///
    /// Total: any string yields a (possibly empty) string of lowercase
    /// tokens separated by single spaces.
    pub fn clean(&self, text: &str) -> String {
        let normalized = self.normalizer.normalize(text);
        let tokens = self.filter.filter_tokens(&normalized);
        self.reducer.reduce_to_string(&tokens)
    }

    /// Cleans one record, isolating failures.
    ///
    /// A missing text becomes [`RecordError::MissingText`] and a panic inside
    /// the pipeline becomes [`RecordError::Panicked`]; neither affects other
    /// records.
    pub fn clean_record(&self, id: RecordId, text: Option<&str>) -> CleanOutcome {
        let Some(text) = text else {
            return CleanOutcome::failed(id, RecordError::MissingText);
        };

        isolate(id, || self.clean(text))
    }
}

/// Runs `clean` for record `id`, turning a panic into
/// [`RecordError::Panicked`] carrying the panic message.
pub(crate) fn isolate(id: RecordId, clean: impl FnOnce() -> String) -> CleanOutcome {
    match panic::catch_unwind(AssertUnwindSafe(clean)) {
        Ok(cleaned) => CleanOutcome::cleaned(id, cleaned),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_owned());
            CleanOutcome::failed(id, RecordError::Panicked { message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> Cleaner {
        Cleaner::new(Arc::new(Lexicon::builtin()))
    }

    #[test]
    fn transcript_sentence() {
        let out = cleaner().clean("Eh, bueno, la economía económica está, está muy complicada!!");
        assert_eq!(out, "economia complicada");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(cleaner().clean(""), "");
        assert_eq!(cleaner().clean("   "), "");
        assert_eq!(cleaner().clean("123 ¡¿?!"), "");
    }

    #[test]
    fn only_stopwords_yields_empty_output() {
        assert_eq!(cleaner().clean("Eh, bueno, pues... o sea, la de que"), "");
    }

    #[test]
    fn result_has_no_exact_duplicates() {
        let out = cleaner().clean("Inflación, inflación, INFLACIÓN y salarios, salarios.");
        let tokens: Vec<&str> = out.split(' ').collect();
        assert_eq!(tokens, ["inflacion", "salarios"]);
    }

    #[test]
    fn result_is_never_longer_than_filtered_tokens() {
        let c = cleaner();
        let n = TextNormalizer::default();
        let samples = [
            "La política política de salud pública, públicas, digamos, es clave",
            "Miren, imagínense: el presupuesto presupuestal del año 2024",
            "",
        ];
        for s in samples {
            let normalized = n.normalize(s);
            let filtered = c.filter.filter_tokens(&normalized);
            let out = c.clean(s);
            let cleaned = out.split(' ').filter(|t| !t.is_empty()).count();
            assert!(cleaned <= filtered.len());
        }
    }

    #[test]
    fn output_uses_clean_alphabet() {
        let out = cleaner().clean("Señoras y señores: ¡BIENVENIDOS a la 3ª conferencia!");
        assert!(out.chars().all(|c| c.is_ascii_lowercase() || c == 'ñ' || c == ' '));
        assert!(out.contains("señoras"));
        assert!(out.contains("conferencia"));
    }

    #[test]
    fn exact_config_keeps_similar_tokens() {
        let c = Cleaner::with_config(Arc::new(Lexicon::builtin()), CleanerConfig::exact());
        assert_eq!(c.clean("economía económica economía"), "economia economica");
    }

    #[test]
    fn legacy_normalizer_folds_enye() {
        let folded = NormalizerConfig {
            preserve_enye: false,
        };
        let c = Cleaner::with_normalizer(
            Arc::new(Lexicon::builtin_with(folded)),
            CleanerConfig::default(),
            folded,
        );
        assert_eq!(c.clean("montaña"), "montana");
    }

    #[test]
    fn enye_stopwords_match_in_both_modes() {
        let text = "Señaló que añadió reformas";
        assert_eq!(cleaner().clean(text), "reformas");

        let folded = NormalizerConfig {
            preserve_enye: false,
        };
        let c = Cleaner::with_normalizer(
            Arc::new(Lexicon::builtin_with(folded)),
            CleanerConfig::default(),
            folded,
        );
        assert_eq!(c.clean(text), "reformas");
    }

    #[test]
    fn clean_record_success() {
        let outcome = cleaner().clean_record(3, Some("la economía"));
        assert_eq!(outcome.id, 3);
        assert_eq!(outcome.result, Ok("economia".to_owned()));
    }

    #[test]
    fn clean_record_missing_text() {
        let outcome = cleaner().clean_record(9, None);
        assert_eq!(outcome.id, 9);
        assert_eq!(outcome.result, Err(RecordError::MissingText));
    }

    fn panicked(outcome: &CleanOutcome) -> Option<&str> {
        match &outcome.result {
            Err(RecordError::Panicked { message }) => Some(message),
            _ => None,
        }
    }

    #[test]
    fn isolate_keeps_str_panic_message() {
        let outcome = isolate(4, || panic!("tabla corrupta"));
        assert_eq!(outcome.id, 4);
        assert_eq!(panicked(&outcome), Some("tabla corrupta"));
    }

    #[test]
    fn isolate_keeps_formatted_panic_message() {
        let row = 12;
        let outcome = isolate(5, || panic!("fila {row} ilegible"));
        assert_eq!(panicked(&outcome), Some("fila 12 ilegible"));

        let outcome = isolate(6, || std::panic::panic_any(String::from("texto roto")));
        assert_eq!(panicked(&outcome), Some("texto roto"));
    }

    #[test]
    fn isolate_handles_non_string_payload() {
        let outcome = isolate(7, || std::panic::panic_any(42_u32));
        assert_eq!(panicked(&outcome), Some("non-string panic payload"));
    }

    #[test]
    fn panicking_record_does_not_affect_batch() {
        let c = cleaner();
        let texts = ["la economía", "inflación alta", "salarios bajos", "reformas"];

        let outcomes: Vec<CleanOutcome> = texts
            .iter()
            .enumerate()
            .map(|(id, text)| {
                isolate(id, || {
                    if id == 2 {
                        panic!("fallo en el registro {id}");
                    }
                    c.clean(text)
                })
            })
            .collect();

        assert_eq!(outcomes.len(), texts.len());
        assert_eq!(panicked(&outcomes[2]), Some("fallo en el registro 2"));
        for (id, outcome) in outcomes.iter().enumerate().filter(|(id, _)| *id != 2) {
            assert_eq!(outcome.id, id);
            assert_eq!(outcome.result, Ok(c.clean(texts[id])));
        }
        assert_eq!(outcomes[0].result, Ok("economia".to_owned()));
    }

    #[test]
    fn cleaner_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Cleaner>();
    }
}
