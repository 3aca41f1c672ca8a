//! Text Pipeline Benchmarking Tool
//!
//! Measures request-time text processing on a large text file (for example a
//! dump of app reviews, one per line) to estimate per-request overhead.
//!
//! ## What It Benchmarks
//!
//! 1. **Normalization**: lowercasing, accent removal, punctuation stripping
//! 2. **Tokenization**: splitting canonical text into word tokens
//! 3. **Vectorization**: normalization + TF-IDF transform, when an artifact is given
//!
//! ## Usage
//!
//! ```bash
//! # Normalization and tokenization
//! ./target/release/normalize_bench /path/to/reviews.txt
//!
//! # Also vectorize every line with a model artifact
//! ./target/release/normalize_bench /path/to/reviews.txt modelo_sentimento.json
//! ```
//!
//! Build with `--release`; use a file of several megabytes for stable numbers.

use std::env;
use std::fs;
use std::time::{Duration, Instant};

use senti_core::analyzer::{TextNormalizer, Tokenizer};
use senti_core::{ModelArtifact, Vectorizer};

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: normalize_bench <path> [artifact.json]");
        std::process::exit(1);
    }

    println!("Loading file...");
    let input = fs::read_to_string(&args[1])?;
    let lines: Vec<&str> = input.lines().collect();

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("Lines:     {}\n", fmt_count(lines.len() as u64));

    bench_normalize(&input);
    bench_tokenize(&input);

    if let Some(path) = args.get(2) {
        let artifact = ModelArtifact::load(path)?;
        bench_vectorize(&lines, input.len(), &artifact);
    }

    Ok(())
}

fn bench_normalize(input: &str) {
    let normalizer = TextNormalizer::default();
    let mut out = String::with_capacity(input.len());

    println!("=== Normalize ===");

    warmup(|| {
        normalizer.normalize_into(input, &mut out);
    });

    let elapsed = measure(|| {
        normalizer.normalize_into(input, &mut out);
    });

    print_perf("Normalize", input.len(), elapsed, 0);
}

fn bench_tokenize(input: &str) {
    let normalizer = TextNormalizer::default();
    let tokenizer = Tokenizer::default();
    let canonical = normalizer.normalize(input);

    println!("=== Tokenize ===");

    warmup(|| {
        let mut sink = 0u64;
        tokenizer.tokenize(&canonical, |_t, _p| {
            sink += 1;
        });
        std::hint::black_box(sink);
    });

    let mut tokens = 0u64;
    let elapsed = measure(|| {
        let mut local = 0u64;
        tokenizer.tokenize(&canonical, |_t, _p| {
            local += 1;
        });
        tokens = local;
        std::hint::black_box(tokens);
    });

    print_perf("Tokenize", canonical.len(), elapsed, tokens);
}

fn bench_vectorize(lines: &[&str], input_bytes: usize, artifact: &ModelArtifact) {
    let normalizer = TextNormalizer::default();
    let mut buf = String::new();

    println!("=== Normalize + Vectorize (per line) ===");

    let mut run = || {
        let mut nnz = 0u64;
        for line in lines {
            normalizer.normalize_into(line, &mut buf);
            if let Ok(x) = artifact.vectorizer.transform(&buf) {
                nnz += x.nnz() as u64;
            }
        }
        std::hint::black_box(nnz)
    };

    warmup(|| {
        run();
    });

    let mut features = 0u64;
    let elapsed = measure(|| {
        features = run();
    });

    print_perf("Vectorize", input_bytes, elapsed, features);

    let per_line = elapsed / (lines.len().max(1) as u32);
    println!("Per line    : {:?}\n", per_line);
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

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, items: u64) {
    let secs = elapsed.as_secs_f64();
    let mib = input_bytes as f64 / (1024.0 * 1024.0);

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Throughput  : {:.1} MiB/s", mib / secs);

    if items > 0 {
        println!("Items       : {}", fmt_count(items));
        println!("Items/sec   : {}", fmt_count((items as f64 / secs) as u64));
    }

    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
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
