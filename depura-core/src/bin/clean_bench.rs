//! Transcript Cleaning Benchmark
//!
//! Measures the cleaning stages on a plain-text file where every line is
//! one record (for example, a dump of a transcript column).
//!
//! ## What It Benchmarks
//!
//! 1. **Normalize**: lowercasing, accent folding, punctuation removal
//! 2. **Filter**: tokenization plus stopword, filler and length filtering
//!    (input is normalized once up front)
//! 3. **Reduce**: near-duplicate reduction of the filtered tokens
//! 4. **Pipeline**: the three stages together, one record at a time
//! 5. **Batch**: the pipeline on the parallel dispatcher
//!
//! ## Usage
//!
//! ```bash
//! ./target/release/clean_bench /path/to/transcripts.txt
//! ./target/release/clean_bench /path/to/transcripts.txt 8   # batch workers
//! ```
//!
//! Run with `--release`. Larger inputs give steadier numbers.

use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use depura_core::analyzer::{LexicalFilter, TextNormalizer};
use depura_core::{Cleaner, DispatchConfig, Dispatcher, Lexicon, NearDuplicateReducer};

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: clean_bench <path> [workers]");
        std::process::exit(1);
    }

    let path = &args[1];
    let workers = args.get(2).and_then(|w| w.parse::<NonZeroUsize>().ok());

    println!("Loading file...");
    let input = fs::read_to_string(path)?;
    let records: Vec<&str> = input.lines().collect();

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("Records:   {}\n", fmt_count(records.len() as u64));

    let lexicon = Arc::new(Lexicon::builtin());

    let normalized = bench_normalize(&records);
    let filtered = bench_filter(&normalized, &lexicon, input.len());
    bench_reduce(&filtered, input.len());
    bench_pipeline(&records, &lexicon, input.len());
    bench_batch(&records, &lexicon, input.len(), workers)?;

    Ok(())
}

fn bench_normalize(records: &[&str]) -> Vec<String> {
    let normalizer = TextNormalizer::default();
    let bytes = records.iter().map(|r| r.len()).sum();
    let mut buf = String::new();

    println!("=== Normalize ===");

    let run = |buf: &mut String| {
        for r in records {
            normalizer.normalize_into(r, buf);
            std::hint::black_box(&*buf);
        }
    };

    warmup(|| run(&mut buf));
    let elapsed = measure(|| run(&mut buf));
    print_perf("Normalize", bytes, elapsed, 0);

    records.iter().map(|r| normalizer.normalize(r)).collect()
}

fn bench_filter<'n>(
    normalized: &'n [String],
    lexicon: &Arc<Lexicon>,
    bytes: usize,
) -> Vec<Vec<&'n str>> {
    let filter = LexicalFilter::new(Arc::clone(lexicon));
    let mut buf = Vec::new();

    println!("=== Filter ===");

    let mut tokens = 0u64;
    warmup(|| {
        for n in normalized {
            filter.filter_into(n, &mut buf);
            std::hint::black_box(&buf);
        }
    });
    let elapsed = measure(|| {
        let mut local = 0u64;
        for n in normalized {
            filter.filter_into(n, &mut buf);
            local += buf.len() as u64;
        }
        tokens = local;
        std::hint::black_box(tokens);
    });
    print_perf("Filter", bytes, elapsed, tokens);

    normalized.iter().map(|n| filter.filter_tokens(n)).collect()
}

fn bench_reduce(filtered: &[Vec<&str>], bytes: usize) {
    let reducer = NearDuplicateReducer::default();
    let tokens: u64 = filtered.iter().map(|f| f.len() as u64).sum();
    let mut buf = Vec::new();

    println!("=== Reduce ===");

    let mut run = || {
        for f in filtered {
            reducer.reduce_into(f, &mut buf);
            std::hint::black_box(&buf);
        }
    };

    warmup(&mut run);
    let elapsed = measure(&mut run);
    print_perf("Reduce", bytes, elapsed, tokens);
}

fn bench_pipeline(records: &[&str], lexicon: &Arc<Lexicon>, bytes: usize) {
    let cleaner = Cleaner::new(Arc::clone(lexicon));

    println!("=== Pipeline (sequential) ===");

    let run = || {
        for r in records {
            std::hint::black_box(cleaner.clean(r));
        }
    };

    warmup(run);
    let elapsed = measure(run);
    print_perf("Pipeline", bytes, elapsed, 0);
}

fn bench_batch(
    records: &[&str],
    lexicon: &Arc<Lexicon>,
    bytes: usize,
    workers: Option<NonZeroUsize>,
) -> depura_core::Result<()> {
    let cleaner = Cleaner::new(Arc::clone(lexicon));
    let dispatcher = Dispatcher::new(cleaner, DispatchConfig { workers })?;

    println!("=== Batch ({} workers) ===", dispatcher.workers());

    let run = || {
        std::hint::black_box(dispatcher.clean_all(records));
    };

    warmup(run);
    let elapsed = measure(run);
    print_perf("Batch", bytes, elapsed, 0);
    Ok(())
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, tokens: u64) {
    let secs = elapsed.as_secs_f64();
    let mib = input_bytes as f64 / (1024.0 * 1024.0);

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Throughput  : {:.2} MiB/s", mib / secs);

    if tokens > 0 {
        println!("Tokens      : {}", fmt_count(tokens));
        println!("Tokens/sec  : {}", fmt_count((tokens as f64 / secs) as u64));
    }

    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
