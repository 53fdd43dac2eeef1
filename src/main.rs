use std::error::Error as _;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::Level;

use rangefix::config::GeneratorConfig;
use rangefix::corpus::DEFAULT_SEED;
use rangefix::fixture::verify_dir;
use rangefix::operation::file_stem;

/// Generates golden `.dat`/`.ans` fixtures for range counting data structures,
/// or checks fixtures that were generated earlier.
#[derive(Parser)]
#[clap(version, author = "Samedh G. & Thomas H.")]
struct ProgArgs {
    /// Log every fixture as it is written or checked
    #[clap(short, long, global = true)]
    verbose: bool,
    /// Only log warnings and errors
    #[clap(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Builds the corpus and writes every fixture pair
    Generate {
        /// Directory the fixtures are written to, created if missing
        #[clap(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Seed for the randomized test cases
        #[clap(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Number of threads writing fixtures, defaults to the number of CPUs
        #[clap(short, long)]
        jobs: Option<usize>,
    },
    /// Recomputes the answers of every fixture pair in a directory and
    /// compares them with its `.ans` file
    Verify {
        /// Directory holding the fixtures
        #[clap(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() {
    let args = ProgArgs::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(args.command) {
        Ok(true) => (),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            process::exit(1);
        }
    }
}

// Ok(false) when verification found a mismatch
fn run(command: Command) -> rangefix::Result<bool> {
    match command {
        Command::Generate { out_dir, seed, jobs } => {
            let defaults = GeneratorConfig::default();
            let config = GeneratorConfig {
                out_dir,
                seed,
                jobs: jobs.unwrap_or(defaults.jobs),
            };
            let summaries = config.run()?;
            for s in &summaries {
                println!("Generated test {}: {} operations", file_stem(s.id), s.operations);
            }
            let last = summaries.last().map_or(0, |s| s.id);
            println!(
                "Total: {} tests generated (001.dat/ans to {}.dat/ans)",
                summaries.len(),
                file_stem(last)
            );
            Ok(true)
        }
        Command::Verify { dir } => {
            let results = verify_dir(&dir)?;
            let mut failed = 0;
            for v in &results {
                match v.first_mismatch() {
                    None => println!("{}: ok ({} operations)", file_stem(v.id), v.operations),
                    Some(i) => {
                        failed += 1;
                        println!(
                            "{}: MISMATCH at query {} (expected {}, oracle {})",
                            file_stem(v.id),
                            i,
                            show(v.expected.get(i)),
                            show(v.actual.get(i))
                        );
                    }
                }
            }
            println!("Total: {} fixtures checked, {} mismatched", results.len(), failed);
            Ok(failed == 0)
        }
    }
}

fn show(answer: Option<&u64>) -> String {
    answer.map_or_else(|| "nothing".to_string(), u64::to_string)
}
