//! Arbitrary-precision helpers over coefficient sequences.
//!
//! Coefficient vectors are stored constant term first, so `coeffs[i]` is the
//! coefficient of `x^i`.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

/// Greatest common divisor of all values. Folds pairwise from zero, so an
/// empty slice gives 0 and `gcd(0, k) == k`.
pub fn gcd_reduce(values: &[BigUint]) -> BigUint {
    values
        .iter()
        .fold(BigUint::zero(), |acc, value| acc.gcd(value))
}

/// Largest value of the slice, `None` when it is empty.
pub fn max_magnitude(values: &[BigUint]) -> Option<&BigUint> {
    values.iter().max()
}

/// Base-2 logarithm of a non-zero integer.
///
/// Values that fit an `f64` go through it directly. Wider values keep their
/// top 64 bits and add the discarded bit count back as an exponent.
pub fn log2(value: &BigUint) -> f64 {
    debug_assert!(!value.is_zero());
    let bits = value.bits();
    if bits <= 1023 {
        if let Some(v) = value.to_f64() {
            return v.log2();
        }
    }
    let shift = bits - 64;
    let top = (value >> shift).to_u64().unwrap_or(u64::MAX);
    (top as f64).log2() + shift as f64
}

/// Number of sign changes between consecutive non-zero coefficients.
/// By Descartes' rule this bounds the number of positive real roots.
pub fn sign_variations(coeffs: &[BigInt]) -> usize {
    let mut last = Sign::NoSign;
    let mut variations = 0;
    for c in coeffs {
        let sign = c.sign();
        if sign == Sign::NoSign {
            continue;
        }
        if last != Sign::NoSign && last != sign {
            variations += 1;
        }
        last = sign;
    }
    variations
}

/// Coefficients of `x^d * P(1/x)` for `P` of degree `d`.
///
/// Trailing zeros (above the leading coefficient) are ignored; zeros at the
/// low end of `P` become high-order zeros and are trimmed from the result.
pub fn reverse_coeffs(coeffs: &[BigInt]) -> Vec<BigInt> {
    let mut out: Vec<BigInt> = trim(coeffs).iter().rev().cloned().collect();
    let len = trim(&out).len();
    out.truncate(len);
    out
}

/// Coefficients of `P(x + 1)`.
pub fn taylor_shift_one(coeffs: &[BigInt]) -> Vec<BigInt> {
    let mut c = trim(coeffs).to_vec();
    let n = c.len();
    for i in 0..n.saturating_sub(1) {
        for j in (i..n - 1).rev() {
            let next = c[j + 1].clone();
            c[j] += next;
        }
    }
    c
}

/// Coefficients of `P(2^k x)`, cleared of denominators when `k` is negative:
/// for `k < 0` the result is `2^(-k d) * P(x / 2^-k)`.
pub fn scale_by_pow2(coeffs: &[BigInt], k: i64) -> Vec<BigInt> {
    let c = trim(coeffs);
    let d = c.len().saturating_sub(1) as u64;
    let step = k.unsigned_abs();
    c.iter()
        .enumerate()
        .map(|(i, coeff)| {
            let i = i as u64;
            if k >= 0 {
                coeff << (step * i)
            } else {
                coeff << (step * (d - i))
            }
        })
        .collect()
}

/// Coefficients of `2^d * P(x / 2)`. Maps roots in (0, 1/2) onto (0, 1).
pub fn halve_variable(coeffs: &[BigInt]) -> Vec<BigInt> {
    scale_by_pow2(coeffs, -1)
}

/// Smallest `k` with `2^k >= 1 + max |c_i| / |c_d|` over the non-leading
/// coefficients, so every real root lies in `(-2^k, 2^k)`.
/// Returns `None` for the zero polynomial.
pub fn cauchy_bound_log2(coeffs: &[BigInt]) -> Option<u64> {
    let (lead, rest) = trim(coeffs).split_last()?;
    let lead = lead.magnitude();
    let max = rest
        .iter()
        .map(|c| c.magnitude())
        .max()
        .cloned()
        .unwrap_or_default();

    let mut k = 0u64;
    // 1 + max / lead <= 2^k  <=>  max <= (2^k - 1) * lead
    while ((BigUint::one() << k) - 1u32) * lead < max {
        k += 1;
    }
    Some(k)
}

/// `num / den` rounded once to the nearest `f64`. `None` if `den` is zero or
/// the quotient does not fit a finite `f64`.
pub fn div_to_f64(num: &BigUint, den: &BigUint) -> Option<f64> {
    if den.is_zero() {
        return None;
    }
    if num.is_zero() {
        return Some(0.0);
    }

    // Scale so the integer quotient has 63 or 64 bits, then fold the
    // remainder into the lowest bit so the final rounding sees it.
    let t = 63 - (num.bits() as i64 - den.bits() as i64);
    let (q, r) = if t >= 0 {
        (num << t as u64).div_rem(den)
    } else {
        num.div_rem(&(den << t.unsigned_abs()))
    };
    let mut q = q.to_u64()?;
    if !r.is_zero() {
        q |= 1;
    }

    let value = if t >= 0 {
        q as f64 / 2f64.powi(t as i32)
    } else if t < -1100 {
        f64::INFINITY
    } else {
        q as f64 * 2f64.powi(t.unsigned_abs() as i32)
    };
    value.is_finite().then_some(value)
}

/// Product of two polynomials.
pub fn mul(a: &[BigInt], b: &[BigInt]) -> Vec<BigInt> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![BigInt::zero(); a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        if x.is_zero() {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

fn trim(coeffs: &[BigInt]) -> &[BigInt] {
    let len = coeffs
        .iter()
        .rposition(|c| !c.is_zero())
        .map_or(0, |i| i + 1);
    &coeffs[..len]
}
