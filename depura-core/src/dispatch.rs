//! Parallel batch cleaning.
//!
//! A [`Dispatcher`] owns a fixed-size rayon pool and one shared [`Cleaner`].
//! Every record of a batch is submitted at once and tagged with its
//! position ([`RecordId`](depura_types::RecordId)) before it leaves the caller's thread.
//!
//! ## Ordering
//!
//! Workers finish in arbitrary order. [`Dispatcher::dispatch_unordered`]
//! returns outcomes as they complete; [`Dispatcher::clean_outcomes`] and
//! [`Dispatcher::clean_all`] sort them back by id, so output `i` always
//! belongs to input `i`.

use std::num::NonZeroUsize;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;

use depura_types::{CleanOutcome, RecordError};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error;
use crate::pipeline::Cleaner;

/// Worker pool settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Number of worker threads. `None` uses the host's available
    /// parallelism.
    pub workers: Option<NonZeroUsize>,
}

impl DispatchConfig {
    /// Resolved worker count.
    pub fn worker_count(&self) -> usize {
        self.workers
            .or_else(|| thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }
}

/// Anything that can be handed to the dispatcher as a record.
pub trait RecordText {
    /// The record's raw text, or why it has none.
    fn text(&self) -> Result<&str, RecordError>;
}

impl RecordText for str {
    fn text(&self) -> Result<&str, RecordError> {
        Ok(self)
    }
}

impl RecordText for String {
    fn text(&self) -> Result<&str, RecordError> {
        Ok(self)
    }
}

impl<T: RecordText + ?Sized> RecordText for &T {
    fn text(&self) -> Result<&str, RecordError> {
        (**self).text()
    }
}

/// `None` marks a record with no text (an empty table cell).
impl<T: RecordText> RecordText for Option<T> {
    fn text(&self) -> Result<&str, RecordError> {
        self.as_ref().ok_or(RecordError::MissingText)?.text()
    }
}

impl<T: RecordText> RecordText for Result<T, RecordError> {
    fn text(&self) -> Result<&str, RecordError> {
        self.as_ref().map_err(Clone::clone)?.text()
    }
}

/// Cleans batches of records on a worker pool.
pub struct Dispatcher {
    pool: ThreadPool,
    cleaner: Arc<Cleaner>,
}

impl Dispatcher {
    /// Starts a pool sized by `config`.
    pub fn new(cleaner: Cleaner, config: DispatchConfig) -> error::Result<Self> {
        let workers = config.worker_count();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("depura-worker-{i}"))
            .build()?;

        tracing::debug!(workers, "worker pool started");

        Ok(Self {
            pool,
            cleaner: Arc::new(cleaner),
        })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// The shared cleaner.
    pub fn cleaner(&self) -> &Cleaner {
        &self.cleaner
    }

    /// Cleans every record and returns outcomes in completion order.
    pub fn dispatch_unordered<T>(&self, records: &[T]) -> Vec<CleanOutcome>
    where
        T: RecordText + Sync,
    {
        let (tx, rx) = mpsc::channel();
        let cleaner = &self.cleaner;

        self.pool.install(|| {
            records
                .par_iter()
                .enumerate()
                .for_each_with(tx, |tx, (id, record)| {
                    let outcome = match record.text() {
                        Ok(text) => cleaner.clean_record(id, Some(text)),
                        Err(error) => CleanOutcome::failed(id, error),
                    };
                    // the receiver outlives the pool scope
                    let _ = tx.send(outcome);
                });
        });

        rx.into_iter().collect()
    }

    /// Cleans every record and returns one outcome per record, in input order.
    pub fn clean_outcomes<T>(&self, records: &[T]) -> Vec<CleanOutcome>
    where
        T: RecordText + Sync,
    {
        let start = Instant::now();
        tracing::info!(
            records = records.len(),
            workers = self.workers(),
            "batch started"
        );

        let mut outcomes = self.dispatch_unordered(records);
        outcomes.sort_unstable_by_key(|o| o.id);
        debug_assert_eq!(outcomes.len(), records.len());

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        tracing::info!(
            records = outcomes.len(),
            failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch finished"
        );

        outcomes
    }

    /// Cleans every record; output `i` is the cleaned text of input `i`.
    ///
    /// Records that fail are logged and yield an empty string.
    pub fn clean_all<T>(&self, records: &[T]) -> Vec<String>
    where
        T: RecordText + Sync,
    {
        self.clean_outcomes(records)
            .into_iter()
            .map(|outcome| {
                if let Err(error) = &outcome.result {
                    tracing::warn!(record = outcome.id, %error, "record not cleaned");
                }
                outcome.into_text()
            })
            .collect()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("workers", &self.workers())
            .field("cleaner", &self.cleaner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use depura_types::RecordId;

    fn dispatcher(workers: usize) -> Dispatcher {
        let cleaner = Cleaner::new(Arc::new(Lexicon::builtin()));
        let config = DispatchConfig {
            workers: NonZeroUsize::new(workers),
        };
        Dispatcher::new(cleaner, config).unwrap()
    }

    fn batch() -> Vec<String> {
        [
            "Eh, bueno, la economía económica está, está muy complicada!!",
            "",
            "La inflación, inflación, sigue subiendo en el mercado",
            "o sea, pues, este...",
            "Miren, la reforma educativa y la reforma energética",
            "Señoras y señores, bienvenidos a la conferencia",
        ]
        .iter()
        .cycle()
        .take(120)
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn output_matches_sequential_map() {
        let d = dispatcher(4);
        let records = batch();
        let expected: Vec<String> = records.iter().map(|r| d.cleaner().clean(r)).collect();
        assert_eq!(d.clean_all(&records), expected);
    }

    #[test]
    fn cardinality_preserved() {
        let d = dispatcher(3);
        let records = batch();
        assert_eq!(d.clean_all(&records).len(), records.len());
        assert_eq!(d.dispatch_unordered(&records).len(), records.len());
    }

    #[test]
    fn outcomes_sorted_by_id() {
        let d = dispatcher(4);
        let outcomes = d.clean_outcomes(&batch());
        let ids: Vec<RecordId> = outcomes.iter().map(|o| o.id).collect();
        assert_eq!(ids, (0..outcomes.len()).collect::<Vec<_>>());
    }

    #[test]
    fn unordered_contains_every_id_once() {
        let d = dispatcher(4);
        let mut ids: Vec<RecordId> = d.dispatch_unordered(&batch()).iter().map(|o| o.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..120).collect::<Vec<_>>());
    }

    #[test]
    fn empty_batch() {
        let d = dispatcher(2);
        let records: Vec<String> = Vec::new();
        assert!(d.clean_all(&records).is_empty());
    }

    #[test]
    fn missing_text_is_isolated() {
        let d = dispatcher(2);
        let records = vec![Some("la economía"), None, Some("el mercado")];
        let outcomes = d.clean_outcomes(&records);

        assert_eq!(outcomes[0].result, Ok("economia".to_owned()));
        assert_eq!(outcomes[1].result, Err(RecordError::MissingText));
        assert_eq!(outcomes[2].result, Ok("mercado".to_owned()));

        assert_eq!(d.clean_all(&records), ["economia", "", "mercado"]);
    }

    #[test]
    fn undecodable_record_is_isolated() {
        let d = dispatcher(2);
        let records: Vec<Result<&str, RecordError>> = vec![
            Ok("el mercado"),
            Err(RecordError::InvalidEncoding { valid_up_to: 3 }),
        ];
        let outcomes = d.clean_outcomes(&records);
        assert_eq!(outcomes[0].result, Ok("mercado".to_owned()));
        assert_eq!(
            outcomes[1].result,
            Err(RecordError::InvalidEncoding { valid_up_to: 3 })
        );
    }

    #[test]
    fn single_worker() {
        let d = dispatcher(1);
        assert_eq!(d.workers(), 1);
        assert_eq!(d.clean_all(&["la economía económica"]), ["economia"]);
    }

    #[test]
    fn default_config_uses_available_parallelism() {
        let config = DispatchConfig::default();
        assert!(config.worker_count() >= 1);
    }
}
