use std::path::PathBuf;

use clap::Args;

use crate::align::kmer::{DEFAULT_KMER_SIZE, DEFAULT_MIN_SEED_FRACTION};
use crate::align::KmerAligner;
use crate::classify::ReadClassifier;
use crate::cli;
use crate::cli::profile::with_suffix;
use crate::report;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Candidate references: a multi-FASTA file, or a genome directory with
    /// one FASTA per reference (requires --names)
    #[arg(short, long)]
    pub references: PathBuf,

    /// Line-separated reference name list restricting the candidates
    #[arg(long)]
    pub names: Option<PathBuf>,

    /// Query reads (FASTA, optionally gzipped)
    #[arg(long)]
    pub reads: PathBuf,

    /// Output file prefix
    #[arg(short, long)]
    pub output: PathBuf,

    /// Seed length for the built-in aligner
    #[arg(long, default_value_t = DEFAULT_KMER_SIZE)]
    pub kmer_size: usize,

    /// Minimum fraction of a read's seeds that must agree on one placement
    #[arg(long, default_value_t = DEFAULT_MIN_SEED_FRACTION)]
    pub min_seed_fraction: f64,

    /// Worker threads (0 = one per core)
    #[arg(short, long, default_value = "0")]
    pub threads: usize,

    /// Also dump per-reference mapping evidence as JSON
    #[arg(long)]
    pub evidence: bool,
}

/// Execute the classify subcommand: one raw pass, no filtering
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded, no reference survives index
/// construction, or an output file cannot be written.
pub fn run(args: &ClassifyArgs, verbose: bool) -> anyhow::Result<()> {
    cli::configure_threads(args.threads);

    let references = cli::load_references(&args.references, args.names.as_ref())?;
    let reads = cli::load_reads(&args.reads)?;

    if verbose {
        eprintln!(
            "Loaded {} candidate references and {} reads",
            references.len(),
            reads.len()
        );
    }

    let aligner = KmerAligner::new(args.kmer_size, args.min_seed_fraction);
    let mut classifier = ReadClassifier::from_references(&aligner, references)?;
    let table = classifier.classify_batch(&reads);

    report::write_abundance_csv(&with_suffix(&args.output, ".csv"), &table)?;
    if args.evidence {
        let evidence = classifier.into_evidence();
        report::write_evidence_json(&with_suffix(&args.output, "_evidence.json"), &evidence)?;
    }

    println!("Estimated abundances:");
    for (label, fraction) in table.fractions() {
        println!("  {label}\t{fraction:.4}");
    }

    Ok(())
}
