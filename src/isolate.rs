//! Real root isolation by bisection and Descartes' rule of signs.
//!
//! A polynomial is searched on (0, 1). The number of sign variations of
//! `(x + 1)^d P(1 / (x + 1))` bounds the roots in that interval and has
//! the same parity. Zero variations means no root, one means exactly one.
//! Anything else splits the interval at 1/2 and recurses on
//! `2^d P(x / 2)` and `2^d P((x + 1) / 2)`.

use log::{debug, warn};
use num_bigint::BigInt;
use num_traits::Zero;

use crate::arithmetic;

/// Bisection stops here; dyadic endpoints stay exact in an `f64` up to this depth.
pub const MAX_DEPTH: usize = 52;

/// An open interval `(start, end)`, or the single point `start` when
/// `start == end`: a root found exactly at a bisection point. Roots at the
/// endpoints of an open interval are always reported as such points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn contains(&self, x: f64) -> bool {
        if self.start == self.end {
            x == self.start
        } else {
            self.start < x && x < self.end
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Isolation {
    /// Intervals holding exactly one root each, in increasing order.
    pub intervals: Vec<Interval>,
    /// Intervals still holding several variations at `MAX_DEPTH`, typically
    /// around a repeated root.
    pub unresolved: Vec<Interval>,
}

impl Isolation {
    /// The given roots that no interval contains.
    pub fn uncovered(&self, roots: &[f64]) -> Vec<f64> {
        roots
            .iter()
            .copied()
            .filter(|&r| !self.intervals.iter().any(|i| i.contains(r)))
            .collect()
    }
}

/// Upper bound on the number of roots of `poly` in (0, 1).
pub fn descartes_bound(poly: &[BigInt]) -> usize {
    arithmetic::sign_variations(&arithmetic::taylor_shift_one(&arithmetic::reverse_coeffs(poly)))
}

/// Isolates the roots of `poly` in (0, 1) and reports them mapped linearly onto (start, end).
pub fn isolate_unit(poly: &[BigInt], start: f64, end: f64) -> Isolation {
    let mut out = Isolation::default();
    bisect(poly, start, end, 0, &mut out);
    out
}

/// Isolates every positive real root of `poly`.
pub fn isolate_positive(poly: &[BigInt]) -> Isolation {
    let Some(k) = arithmetic::cauchy_bound_log2(poly) else {
        return Isolation::default();
    };
    // P(2^k x) has all its roots in (-1, 1).
    let scaled = arithmetic::scale_by_pow2(poly, k as i64);
    isolate_unit(&scaled, 0.0, 2f64.powi(k as i32))
}

fn bisect(poly: &[BigInt], start: f64, end: f64, depth: usize, out: &mut Isolation) {
    let variations = descartes_bound(poly);
    debug!("found {variations} variations in [{start}, {end}]");

    match variations {
        0 => return,
        1 => {
            out.intervals.push(Interval { start, end });
            return;
        }
        _ => {}
    }
    if depth == MAX_DEPTH {
        warn!("giving up on [{start}, {end}] with {variations} variations");
        out.unresolved.push(Interval { start, end });
        return;
    }

    let mid = (start + end) / 2.0;
    let left = arithmetic::halve_variable(poly);
    let right = arithmetic::taylor_shift_one(&left);

    bisect(&left, start, mid, depth + 1, out);
    // Constant term of the right half is 2^d P(1/2).
    if right.first().is_some_and(Zero::is_zero) {
        out.intervals.push(Interval {
            start: mid,
            end: mid,
        });
    }
    bisect(&right, mid, end, depth + 1, out);
}
