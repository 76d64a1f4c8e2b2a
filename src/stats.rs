use std::fmt;

use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::arithmetic;
use crate::error::{Error, Result, Side};
use crate::record_iterator::Record;

/// Values derived from a single record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStats {
    pub max_old: BigUint,
    pub max_new: BigUint,
    /// `max_new / max_old`, rounded down.
    pub ratio: BigUint,
    pub log_ratio: f64,
    pub gcd: BigUint,
    /// Sign changes in the signed "new" coefficients.
    pub variations: usize,
}

impl RecordStats {
    pub fn from_record(record: &Record) -> Result<Self> {
        let old: Vec<BigUint> = record.old.iter().map(|c| c.magnitude().clone()).collect();
        let new: Vec<BigUint> = record.new.iter().map(|c| c.magnitude().clone()).collect();

        let max_old = arithmetic::max_magnitude(&old)
            .ok_or(Error::EmptyList {
                record: record.index,
                side: Side::Old,
            })?
            .clone();
        let max_new = arithmetic::max_magnitude(&new)
            .ok_or(Error::EmptyList {
                record: record.index,
                side: Side::New,
            })?
            .clone();

        if max_old.is_zero() {
            return Err(Error::DivisionByZero {
                record: record.index,
            });
        }
        let ratio = &max_new / &max_old;
        if ratio.is_zero() {
            return Err(Error::LogOfZero {
                record: record.index,
            });
        }

        Ok(RecordStats {
            log_ratio: arithmetic::log2(&ratio),
            gcd: arithmetic::gcd_reduce(&new),
            variations: arithmetic::sign_variations(&record.new),
            max_old,
            max_new,
            ratio,
        })
    }
}

/// Running sums over the records of one run.
#[derive(Debug, Default)]
pub struct Accumulator {
    total_gcd: BigUint,
    total_log_ratio: f64,
    count: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: &Record) -> Result<()> {
        let stats = RecordStats::from_record(record)?;
        debug!(
            "record {}: max_old={} max_new={} ratio={} log2={} gcd={} variations={}",
            record.index,
            stats.max_old,
            stats.max_new,
            stats.ratio,
            stats.log_ratio,
            stats.gcd,
            stats.variations
        );
        self.total_gcd += stats.gcd;
        self.total_log_ratio += stats.log_ratio;
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Divides the running sums by `iterations`.
    pub fn finish(self, iterations: usize) -> Result<Summary> {
        if iterations == 0 {
            return Err(Error::NoIterations);
        }
        let average_gcd =
            arithmetic::div_to_f64(&self.total_gcd, &BigUint::from(iterations))
                .ok_or(Error::AverageOverflow)?;
        Ok(Summary {
            average_gcd,
            average_log_ratio: self.total_log_ratio / iterations as f64,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub average_gcd: f64,
    pub average_log_ratio: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average GCD = {}", float_repr(self.average_gcd))?;
        write!(f, "Average log Ratio = {}", float_repr(self.average_log_ratio))
    }
}

/// Shortest round-trip decimal form of `x`. Whole numbers keep a `.0`,
/// and exponents below -4 or from 16 up switch to `1.5e+16` / `1e-05` notation.
fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{x:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return format!("{x:?}");
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return format!("{x:?}");
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };

    if !(-4..16).contains(&exp) {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{:02}", exp.unsigned_abs());
    }

    let digits: String = mantissa.chars().filter(|&c| c != '.').collect();
    if exp < 0 {
        let zeros = "0".repeat(exp.unsigned_abs() as usize - 1);
        return format!("{sign}0.{zeros}{digits}");
    }
    let int_len = exp as usize + 1;
    if digits.len() <= int_len {
        let zeros = "0".repeat(int_len - digits.len());
        format!("{sign}{digits}{zeros}.0")
    } else {
        format!("{sign}{}.{}", &digits[..int_len], &digits[int_len..])
    }
}
