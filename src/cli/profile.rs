use std::path::PathBuf;

use clap::Args;

use crate::align::kmer::{DEFAULT_KMER_SIZE, DEFAULT_MIN_SEED_FRACTION};
use crate::align::KmerAligner;
use crate::cli;
use crate::refine::RefinementDriver;
use crate::report;

#[derive(Args)]
pub struct ProfileArgs {
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

/// Execute the profile subcommand
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded, no reference survives index
/// construction, or an output file cannot be written.
pub fn run(args: &ProfileArgs, verbose: bool) -> anyhow::Result<()> {
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
    let outcome = RefinementDriver::new(&aligner).run(&references, &reads)?;

    let prefix = args.output.display();
    report::write_abundance_csv(&with_suffix(&args.output, ".csv"), &outcome.raw)?;
    report::write_abundance_csv(&with_suffix(&args.output, "_refined.csv"), &outcome.refined)?;
    report::write_name_list(
        &with_suffix(&args.output, "_filtered_genomes.lsv"),
        &outcome.retained,
    )?;
    if args.evidence {
        report::write_evidence_json(&with_suffix(&args.output, "_evidence.json"), &outcome.evidence)?;
    }

    if outcome.refinement_applied {
        println!(
            "Refinement retained {}/{} references",
            outcome.retained.len(),
            references.len()
        );
    } else {
        println!("Refinement skipped; refined result equals raw");
    }
    println!("Refined abundances ({prefix}_refined.csv):");
    for (label, fraction) in outcome.refined.fractions() {
        println!("  {label}\t{fraction:.4}");
    }

    Ok(())
}

/// `prefix` + literal suffix, preserving the prefix's directory
pub(crate) fn with_suffix(prefix: &std::path::Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
