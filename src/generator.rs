//! Writes random coefficient pairs in the format read by the record iterator.
//!
//! Each record is a polynomial `P` with `degree` distinct rational roots in
//! (0, 1), followed by `P` after one of the variable changes a bisection
//! root isolator applies to it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use num_bigint::BigInt;
use num_integer::Integer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{arithmetic, isolate};

/// Variable change producing the "new" line of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Transform {
    /// `2^d P(x / 2)`: the left half (0, 1/2) mapped onto (0, 1).
    #[default]
    Halve,
    /// `2^d P((x + 1) / 2)`: the right half (1/2, 1) mapped onto (0, 1).
    HalveShift,
    /// `(x + 1)^d P(1 / (x + 1))`: (0, 1) mapped onto (0, +inf), the form
    /// whose sign variations bound the roots in (0, 1).
    ReverseShift,
}

impl Transform {
    pub fn apply(self, poly: &[BigInt]) -> Vec<BigInt> {
        match self {
            Transform::Halve => arithmetic::halve_variable(poly),
            Transform::HalveShift => {
                arithmetic::taylor_shift_one(&arithmetic::halve_variable(poly))
            }
            Transform::ReverseShift => {
                arithmetic::taylor_shift_one(&arithmetic::reverse_coeffs(poly))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub records: usize,
    pub degree: usize,
    /// Upper bound on the bit width of root denominators, at most 63.
    pub bits: u32,
    pub seed: u64,
    pub transform: Transform,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            records: 100,
            degree: 20,
            bits: 16,
            seed: 0,
            transform: Transform::default(),
        }
    }
}

/// A root `num / den` in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Root {
    pub num: u64,
    pub den: u64,
}

impl Root {
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

/// Picks `degree` distinct rationals in (0, 1) with denominators of at most `bits` bits.
/// Loops forever if `bits` is too small to hold `degree` distinct fractions.
pub fn random_roots<R: Rng>(rng: &mut R, degree: usize, bits: u32) -> Vec<Root> {
    let bits = bits.clamp(2, 63);
    let mut roots: Vec<Root> = Vec::with_capacity(degree);
    while roots.len() < degree {
        let den = rng.random_range(0..(1u64 << bits)).max(2);
        let num = rng.random_range(1..den);
        let g = num.gcd(&den);
        let root = Root {
            num: num / g,
            den: den / g,
        };
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}

/// Coefficients of `prod (den * x - num)` over the given roots.
pub fn poly_from_roots(roots: &[Root]) -> Vec<BigInt> {
    roots.iter().fold(vec![BigInt::from(1)], |poly, root| {
        let factor = [-BigInt::from(root.num), BigInt::from(root.den)];
        arithmetic::mul(&poly, &factor)
    })
}

fn write_line<W: Write>(out: &mut W, coeffs: &[BigInt]) -> io::Result<()> {
    for c in coeffs {
        write!(out, "{c},")?;
    }
    writeln!(out)
}

/// One generated record together with the roots it was built from.
#[derive(Debug, Clone)]
pub struct Sample {
    pub roots: Vec<Root>,
    pub old: Vec<BigInt>,
    pub new: Vec<BigInt>,
}

pub struct Samples {
    rng: StdRng,
    config: GeneratorConfig,
    remaining: usize,
}

impl Iterator for Samples {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let roots = random_roots(&mut self.rng, self.config.degree, self.config.bits);
        let old = poly_from_roots(&roots);
        let new = self.config.transform.apply(&old);
        Some(Sample { roots, old, new })
    }
}

/// The records described by `config`, reproducible from its seed.
pub fn samples(config: &GeneratorConfig) -> Samples {
    Samples {
        rng: StdRng::seed_from_u64(config.seed),
        config: config.clone(),
        remaining: config.records,
    }
}

/// Writes `config.records` records to `out`.
pub fn write_coeffs<W: Write>(config: &GeneratorConfig, out: &mut W) -> io::Result<()> {
    for (i, sample) in samples(config).enumerate() {
        debug!(
            "record {}: degree {} with {} sign variations after transform",
            i + 1,
            sample.old.len().saturating_sub(1),
            arithmetic::sign_variations(&sample.new)
        );
        write_line(out, &sample.old)?;
        write_line(out, &sample.new)?;
        writeln!(out)?;
    }
    Ok(())
}

/// A generated record whose known roots were not all isolated.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolationFailure {
    pub record: usize,
    pub missing: Vec<f64>,
}

/// Isolates the roots in (0, 1) of every "old" polynomial and checks that
/// each root it was built from lies in one of the returned intervals.
pub fn check_isolation(config: &GeneratorConfig) -> Vec<IsolationFailure> {
    samples(config)
        .enumerate()
        .filter_map(|(i, sample)| {
            let isolation = isolate::isolate_unit(&sample.old, 0.0, 1.0);
            let roots: Vec<f64> = sample.roots.iter().map(Root::to_f64).collect();
            let missing = isolation.uncovered(&roots);
            debug!(
                "record {}: {} intervals for {} roots",
                i + 1,
                isolation.intervals.len(),
                roots.len()
            );
            (!missing.is_empty()).then_some(IsolationFailure {
                record: i + 1,
                missing,
            })
        })
        .collect()
}

pub fn write_coeffs_file<P: AsRef<Path>>(config: &GeneratorConfig, path: P) -> io::Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write_coeffs(config, &mut out)?;
    out.flush()?;
    info!("wrote {} records to {}", config.records, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_iterator::iter_file_records;
    use num_traits::Zero;

    fn eval_scaled(poly: &[BigInt], root: Root) -> BigInt {
        // den^d * P(num / den), zero exactly when num / den is a root.
        let d = poly.len() - 1;
        let mut acc = BigInt::zero();
        for (i, c) in poly.iter().enumerate().rev() {
            let num_pow = BigInt::from(root.num).pow(i as u32);
            let den_pow = BigInt::from(root.den).pow((d - i) as u32);
            acc += c * num_pow * den_pow;
        }
        acc
    }

    #[test]
    fn roots_are_distinct_and_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let roots = random_roots(&mut rng, 30, 4);
        assert_eq!(roots.len(), 30);
        for (i, r) in roots.iter().enumerate() {
            assert!(r.num >= 1 && r.num < r.den);
            assert_eq!(r.num.gcd(&r.den), 1);
            assert!(!roots[..i].contains(r));
        }
    }

    #[test]
    fn polynomial_vanishes_at_its_roots() {
        let mut rng = StdRng::seed_from_u64(1);
        let roots = random_roots(&mut rng, 6, 10);
        let poly = poly_from_roots(&roots);
        assert_eq!(poly.len(), 7);
        for root in roots {
            assert!(eval_scaled(&poly, root).is_zero());
        }
    }

    #[test]
    fn halving_doubles_roots_and_never_shrinks_coefficients() {
        let mut rng = StdRng::seed_from_u64(11);
        let roots = random_roots(&mut rng, 6, 9);
        let old = poly_from_roots(&roots);
        let new = Transform::Halve.apply(&old);
        for (o, n) in old.iter().zip(&new) {
            assert!(n.magnitude() >= o.magnitude());
        }
        for root in roots {
            let image = Root {
                num: 2 * root.num,
                den: root.den,
            };
            assert!(eval_scaled(&new, image).is_zero());
        }
    }

    #[test]
    fn halve_shift_maps_right_half_onto_unit_interval() {
        // roots 1/4 and 3/4 -> 2r - 1 = -1/2 and 1/2
        let roots = [Root { num: 1, den: 4 }, Root { num: 3, den: 4 }];
        let new = Transform::HalveShift.apply(&poly_from_roots(&roots));
        assert!(eval_scaled(&new, Root { num: 1, den: 2 }).is_zero());
        // Root has no negative representation, so evaluate 2^d * P(-1/2) by hand.
        let d = new.len() - 1;
        let at_minus_half: BigInt = new
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let sign = if i % 2 == 0 { 1 } else { -1 };
                c * BigInt::from(sign) * BigInt::from(2).pow((d - i) as u32)
            })
            .sum();
        assert!(at_minus_half.is_zero());
    }

    #[test]
    fn reverse_shift_moves_roots_to_positive_axis() {
        // (2x - 1): root 1/2. Reversed: 2 - x, shifted: 1 - x, root 1 = 1/(1/2) - 1.
        let poly = vec![BigInt::from(-1), BigInt::from(2)];
        assert_eq!(
            Transform::ReverseShift.apply(&poly),
            vec![BigInt::from(1), BigInt::from(-1)]
        );

        let mut rng = StdRng::seed_from_u64(3);
        let roots = random_roots(&mut rng, 5, 8);
        let new = Transform::ReverseShift.apply(&poly_from_roots(&roots));
        // Every root lies in (0, 1), so the transformed polynomial has exactly
        // `degree` positive roots and Descartes' bound matches it in parity.
        assert_eq!(arithmetic::sign_variations(&new) % 2, 5 % 2);
        for root in roots {
            // 1/r - 1 = (den - num) / num
            let image = Root {
                num: root.den - root.num,
                den: root.num,
            };
            assert!(eval_scaled(&new, image).is_zero());
        }
    }

    #[test]
    fn output_is_deterministic_for_a_seed() {
        let config = GeneratorConfig {
            records: 3,
            degree: 4,
            bits: 8,
            seed: 42,
            transform: Transform::HalveShift,
        };
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_coeffs(&config, &mut first).unwrap();
        write_coeffs(&config, &mut second).unwrap();
        assert_eq!(first, second);

        let text = String::from_utf8(first).unwrap();
        assert_eq!(text.lines().count(), 9);
        assert!(text.lines().step_by(3).all(|l| l.ends_with(',')));
    }

    #[test]
    fn generated_roots_are_isolated() {
        let config = GeneratorConfig {
            records: 5,
            degree: 8,
            bits: 10,
            seed: 17,
            transform: Transform::Halve,
        };
        assert!(check_isolation(&config).is_empty());

        let sample = samples(&config).next().unwrap();
        let isolation = isolate::isolate_positive(&sample.old);
        assert_eq!(isolation.intervals.len(), 8);
    }

    #[test]
    fn samples_follow_the_written_records() -> crate::error::Result<()> {
        let config = GeneratorConfig {
            records: 2,
            degree: 3,
            bits: 8,
            seed: 4,
            transform: Transform::Halve,
        };
        let mut buf = Vec::new();
        write_coeffs(&config, &mut buf)?;
        let records = crate::record_iterator::RecordIterator::new(buf.as_slice())
            .collect::<crate::error::Result<Vec<_>>>()?;
        let samples: Vec<Sample> = samples(&config).collect();

        assert_eq!(records.len(), samples.len());
        for (record, sample) in records.iter().zip(&samples) {
            assert_eq!(record.old, sample.old);
            assert_eq!(record.new, sample.new);
        }
        Ok(())
    }

    #[test]
    fn written_file_reads_back() -> crate::error::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("coeffs.txt");
        let config = GeneratorConfig {
            records: 4,
            degree: 3,
            bits: 6,
            seed: 9,
            transform: Transform::ReverseShift,
        };
        write_coeffs_file(&config, &path)?;

        let records = iter_file_records(&path)?.collect::<crate::error::Result<Vec<_>>>()?;
        assert_eq!(records.len(), 4);
        for record in records {
            assert_eq!(record.old.len(), 4);
            assert_eq!(record.new.len(), 4);
        }
        Ok(())
    }
}
