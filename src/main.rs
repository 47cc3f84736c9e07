use clap::Parser;
use tracing_subscriber::EnvFilter;

mod align;
mod classify;
mod cli;
mod core;
mod coverage;
mod filter;
mod parsing;
mod refine;
mod report;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("read_refine=debug,info")
    } else {
        EnvFilter::new("read_refine=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Profile(args) => {
            cli::profile::run(&args, cli.verbose)?;
        }
        cli::Commands::Classify(args) => {
            cli::classify::run(&args, cli.verbose)?;
        }
    }

    Ok(())
}
