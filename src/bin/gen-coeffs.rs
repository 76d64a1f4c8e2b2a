use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use coeffstats::generator::{self, GeneratorConfig, Transform};
use coeffstats::DEFAULT_INPUT;

/// Write random polynomial coefficient pairs for coeffstats
#[derive(Parser)]
#[command(name = "gen-coeffs", version, about)]
struct Args {
    /// Degree of every generated polynomial
    #[arg(short = 'n', long, default_value_t = GeneratorConfig::default().degree)]
    degree: usize,

    /// Maximum bit width of root denominators
    #[arg(
        long,
        default_value_t = GeneratorConfig::default().bits,
        value_parser = clap::value_parser!(u32).range(2..=63)
    )]
    bits: u32,

    /// Seed for the random generator
    #[arg(long, default_value_t = GeneratorConfig::default().seed)]
    seed: u64,

    /// Number of records to write
    #[arg(short, long, default_value_t = GeneratorConfig::default().records)]
    records: usize,

    /// Variable change producing the "new" line
    #[arg(short, long, value_enum, default_value_t = Transform::default())]
    transform: Transform,

    /// Output file
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    output: PathBuf,

    /// Isolate the roots of every polynomial and check the known roots are covered
    #[arg(long)]
    check: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.degree == 0 {
        Args::command()
            .error(ErrorKind::ValueValidation, "degree must be > 0")
            .exit();
    }
    // 1/2, 1/3, ... are distinct, so this many roots always exist.
    if (args.degree as u64) > (1u64 << args.bits) - 2 {
        Args::command()
            .error(
                ErrorKind::ValueValidation,
                format!("{} bits cannot hold {} distinct roots", args.bits, args.degree),
            )
            .exit();
    }

    let config = GeneratorConfig {
        records: args.records,
        degree: args.degree,
        bits: args.bits,
        seed: args.seed,
        transform: args.transform,
    };

    if let Err(e) = generator::write_coeffs_file(&config, &args.output) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
    println!("Wrote {} records to {}", config.records, args.output.display());

    if args.check {
        let failures = generator::check_isolation(&config);
        for failure in &failures {
            for root in &failure.missing {
                println!(
                    "FAIL: record {}: root {:.17} not contained in any interval",
                    failure.record, root
                );
            }
        }
        if !failures.is_empty() {
            println!("FAIL: {} of {} records have missing roots", failures.len(), config.records);
            process::exit(1);
        }
        println!("PASS: all generated roots contained in returned intervals");
    }
}
