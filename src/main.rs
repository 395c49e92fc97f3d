use std::io::Write;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use fmx::index::config::DEFAULT_STRIDE;
use fmx::index::sa::SaAlgorithm;
use fmx::index::ssa::SamplingPolicy;
use fmx::index::{FmIndex, IndexConfig, IndexMeta};
use fmx::io::fasta;
use fmx::util::alphabet::Alphabet;
use fmx::util::render;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEFAULT_REFERENCE: &str = "acgacaacgacgtttcgcgctgcgatcgactgcaacgacaacgacg";
const DEFAULT_QUERY: &str = "acga";

#[derive(Parser, Debug)]
#[command(name = "fmx", author, version, about = "FM-index exact substring locator", arg_required_else_help = true)]
struct Cli {
    /// Log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Locate every exact occurrence of the queries in the reference
    Search {
        #[command(flatten)]
        index: IndexArgs,
        /// Query sequences (defaults to a demo query when omitted)
        queries: Vec<String>,
        /// Sort offsets by reference position instead of suffix-array order
        #[arg(long)]
        sorted: bool,
        /// Draw each hit under the reference
        #[arg(long)]
        render: bool,
        #[arg(long)]
        json: bool,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
    /// Print the index tables (C table, checkpoint and sample counts)
    Stats {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct IndexArgs {
    /// Literal reference sequence
    #[arg(short = 'r', long, conflicts_with = "fasta")]
    reference: Option<String>,
    /// Reference FASTA file; the first record is indexed
    #[arg(short = 'f', long)]
    fasta: Option<String>,
    /// Rank checkpoint and suffix-array sampling stride
    #[arg(short = 'k', long, default_value_t = DEFAULT_STRIDE)]
    stride: usize,
    /// Alphabet symbols (terminator excluded)
    #[arg(long, default_value = "acgt")]
    alphabet: String,
    #[arg(long, default_value_t = '$')]
    terminator: char,
    #[arg(long = "sa", value_enum, default_value_t = SaArg::Doubling)]
    sa: SaArg,
    #[arg(long, value_enum, default_value_t = SamplingArg::Row)]
    sampling: SamplingArg,
    /// Lowercase reference and queries before use
    #[arg(long)]
    fold_case: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SaArg {
    Naive,
    Doubling,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SamplingArg {
    /// Keep rows whose index is a multiple of the stride
    Row,
    /// Keep rows whose text offset is a multiple of the stride
    Offset,
}

#[derive(Serialize, Debug)]
struct SearchReport<'a> {
    query: &'a str,
    count: usize,
    offsets: &'a [usize],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Search { index, queries, sorted, render, json, threads } => {
            run_search(&index, queries, sorted, render, json, threads)
        }
        Commands::Stats { index, json } => run_stats(&index, json),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn prepare(seq: &str, fold_case: bool) -> Vec<u8> {
    if fold_case {
        seq.to_ascii_lowercase().into_bytes()
    } else {
        seq.as_bytes().to_vec()
    }
}

/// Returns the index together with the reference bytes it was built from.
fn build_index(args: &IndexArgs) -> Result<(FmIndex, Vec<u8>)> {
    if !args.terminator.is_ascii() {
        anyhow::bail!("terminator '{}' must be a single ASCII character", args.terminator);
    }
    let symbols = prepare(&args.alphabet, args.fold_case);
    let alphabet = Alphabet::new(&symbols, args.terminator as u8)?;

    let (mut reference, source) = match (&args.reference, &args.fasta) {
        (Some(text), _) => (text.as_bytes().to_vec(), "literal".to_string()),
        (None, Some(path)) => {
            let rec = fasta::read_reference(path)?;
            log::info!("reference '{}' from {}: {} bp", rec.id, path, rec.seq.len());
            (rec.seq, path.clone())
        }
        (None, None) => {
            log::info!("no reference given, using the built-in demo sequence");
            (DEFAULT_REFERENCE.as_bytes().to_vec(), "builtin".to_string())
        }
    };
    if args.fold_case {
        reference.make_ascii_lowercase();
    }

    let config = IndexConfig {
        stride: args.stride,
        sa_algorithm: match args.sa {
            SaArg::Naive => SaAlgorithm::Naive,
            SaArg::Doubling => SaAlgorithm::PrefixDoubling,
        },
        sampling: match args.sampling {
            SamplingArg::Row => SamplingPolicy::Row,
            SamplingArg::Offset => SamplingPolicy::TextOffset,
        },
    };
    let mut fm = FmIndex::build(&reference, &alphabet, &config)
        .map_err(|e| anyhow::anyhow!("cannot build index from {} reference: {}", source, e))?;
    fm.set_meta(IndexMeta {
        reference_source: Some(source),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: None,
    });
    Ok((fm, reference))
}

fn run_search(
    args: &IndexArgs,
    queries: Vec<String>,
    sorted: bool,
    render: bool,
    json: bool,
    threads: usize,
) -> Result<()> {
    let (fm, reference) = build_index(args)?;
    let queries = if queries.is_empty() { vec![DEFAULT_QUERY.to_string()] } else { queries };
    let encoded: Vec<Vec<u8>> = queries.iter().map(|q| prepare(q, args.fold_case)).collect();

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?;
    let mut results = pool.install(|| fm.search_batch(&encoded));
    if sorted {
        results.iter_mut().for_each(|r| r.sort_unstable());
    }

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    if json {
        let reports: Vec<SearchReport<'_>> = queries
            .iter()
            .zip(&results)
            .map(|(q, offsets)| SearchReport { query: q, count: offsets.len(), offsets })
            .collect();
        serde_json::to_writer_pretty(&mut out, &reports)?;
        writeln!(out)?;
        return Ok(());
    }

    for ((q, query), offsets) in queries.iter().zip(&encoded).zip(&results) {
        if fm.alphabet().encode_query(query).is_none() {
            log::warn!("query '{}' has symbols outside the alphabet", q);
        }
        let list: Vec<String> = offsets.iter().map(ToString::to_string).collect();
        writeln!(out, "{}\t{}\t{}", q, offsets.len(), list.join(","))?;
        if render {
            for &p in offsets {
                render::write_alignment(&mut out, &reference, query, p)?;
            }
        }
    }
    Ok(())
}

fn run_stats(args: &IndexArgs, json: bool) -> Result<()> {
    let (fm, _) = build_index(args)?;
    let stats = fm.stats();
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    if json {
        serde_json::to_writer_pretty(&mut out, &stats)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "length:      {}", stats.len)?;
    writeln!(out, "alphabet:    {} (terminator '{}')", stats.alphabet, stats.terminator)?;
    writeln!(out, "stride:      {}", stats.config.stride)?;
    writeln!(out, "checkpoints: {} per symbol", stats.checkpoints_per_symbol)?;
    writeln!(out, "sampled SA:  {} rows", stats.sampled_rows)?;
    writeln!(out, "bwt:         {}", String::from_utf8_lossy(&fm.bwt()))?;
    writeln!(out, "symbol\ttotal\tC")?;
    for s in &stats.symbols {
        writeln!(out, "{}\t{}\t{}", s.symbol, s.total, s.c)?;
    }
    if let Some(ts) = &stats.meta.build_timestamp {
        writeln!(out, "built:       {}", ts)?;
    }
    Ok(())
}
