//! Coefficient growth statistics over pairs of polynomial coefficient lists.

use std::path::PathBuf;

use log::info;

pub mod arithmetic;
pub mod error;
pub mod generator;
pub mod isolate;
pub mod record_iterator;
pub mod stats;

pub use error::{Error, Result};
pub use stats::Summary;

pub const DEFAULT_INPUT: &str = "coeffs.txt";
pub const ITERATIONS: usize = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from(DEFAULT_INPUT),
            iterations: ITERATIONS,
        }
    }
}

/// Reads `config.iterations` records from `config.input` and averages their statistics.
///
/// Any malformed record aborts the run; records past the first
/// `iterations` are never read.
pub fn run(config: &Config) -> Result<Summary> {
    if config.iterations == 0 {
        return Err(Error::NoIterations);
    }
    info!(
        "reading {} records from {}",
        config.iterations,
        config.input.display()
    );

    let mut records = record_iterator::iter_file_records(&config.input)?;
    let mut acc = stats::Accumulator::new();
    for record in 1..=config.iterations {
        let record = records.next().ok_or(Error::UnexpectedEof {
            record,
            line: "old",
        })??;
        acc.push(&record)?;
    }

    info!("processed {} records", acc.count());
    let summary = acc.finish(config.iterations)?;
    Ok(summary)
}
