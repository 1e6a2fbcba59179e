//! `depura`: cleans the transcript column of a CSV file.
//!
//! ```bash
//! depura --input transcripciones.csv --output transcripciones_limpias.csv
//! RUST_LOG=debug depura --input in.csv --output out.csv --workers 4 --log-json
//! ```

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use depura_core::analyzer::NormalizerConfig;
use depura_core::observability::init_tracing;
use depura_core::table::{DEFAULT_OUTPUT_COLUMN, DEFAULT_TEXT_COLUMN};
use depura_core::{
    read_table, write_table, CleanerConfig, Cleaner, DispatchConfig, Dispatcher, Lexicon, Score,
    StopwordSource,
};
use depura_types::{DEFAULT_MIN_TOKEN_LEN, DEFAULT_NEAR_DUPLICATE_THRESHOLD};

#[derive(Parser, Debug)]
#[command(name = "depura", version, about = "Clean Spanish speech transcripts in a CSV file")]
struct Cli {
    /// Input CSV file with a header row
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    /// Output CSV file (input columns plus the cleaned column)
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Column holding the raw transcript text
    #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
    column: String,

    /// Name of the appended cleaned-text column
    #[arg(long, default_value = DEFAULT_OUTPUT_COLUMN)]
    output_column: String,

    /// Worker threads (default: available parallelism)
    #[arg(long)]
    workers: Option<NonZeroUsize>,

    /// Drop a token whose similarity to a kept token exceeds this score
    #[arg(long, default_value_t = DEFAULT_NEAR_DUPLICATE_THRESHOLD,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Score,

    /// Minimum token length in characters
    #[arg(long, default_value_t = DEFAULT_MIN_TOKEN_LEN)]
    min_token_len: usize,

    /// Replace the corpus stopword list with this file
    #[arg(long, value_name = "FILE")]
    stopwords_corpus: Option<PathBuf>,

    /// Replace the linguistic stopword list with this file
    #[arg(long, value_name = "FILE")]
    stopwords_linguistic: Option<PathBuf>,

    /// Replace the ISO stopword list with this file
    #[arg(long, value_name = "FILE")]
    stopwords_iso: Option<PathBuf>,

    /// Extra discourse filler to drop (repeatable)
    #[arg(long = "filler", value_name = "WORD")]
    fillers: Vec<String>,

    /// Fold ñ to n like the other accented letters
    #[arg(long, default_value_t = false)]
    fold_enye: bool,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "cleaning run failed");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> depura_core::Result<()> {
    let start = Instant::now();

    let normalizer = NormalizerConfig {
        preserve_enye: !cli.fold_enye,
    };

    let lexicon = Lexicon::builder()
        .with_normalizer(normalizer)
        .with_optional_file(StopwordSource::Corpus, cli.stopwords_corpus.as_deref())
        .with_optional_file(StopwordSource::Linguistic, cli.stopwords_linguistic.as_deref())
        .with_optional_file(StopwordSource::Iso, cli.stopwords_iso.as_deref())
        .with_fillers(cli.fillers)
        .build()?;

    let config = CleanerConfig {
        min_token_len: cli.min_token_len,
        ..CleanerConfig::default().with_threshold(cli.threshold)
    };
    let cleaner = Cleaner::with_normalizer(Arc::new(lexicon), config, normalizer);

    let dispatcher = Dispatcher::new(
        cleaner,
        DispatchConfig {
            workers: cli.workers,
        },
    )?;

    let table = read_table(&cli.input, &cli.column)?;
    let cleaned = dispatcher.clean_all(&table.texts());
    write_table(&cli.output, &table, &cleaned, &cli.output_column)?;

    tracing::info!(
        rows = table.len(),
        output = %cli.output.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "done"
    );
    Ok(())
}
