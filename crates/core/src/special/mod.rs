//! Bessel functions of the first kind and their positive zeros.
//!
//! Values come from Miller's backward recurrence normalised with the identity
//! `J_0(x) + 2 Σ J_2k(x) = 1`, which stays accurate to roughly machine
//! precision (absolute) across the whole real line. Zeros are bracketed by a
//! forward scan that starts below the first root of every order and then
//! polished with a safeguarded Newton iteration.

use crate::{MembraneError, Result};

/// Scan step used to bracket roots. Consecutive zeros of `J_m` and `J_m'`
/// are always further apart than this.
const SCAN_STEP: f64 = 0.25;
const MAX_SCAN_STEPS: usize = 200_000;
const MAX_NEWTON_ITERATIONS: usize = 100;
const ROOT_TOLERANCE: f64 = 1e-14;
const RESCALE_THRESHOLD: f64 = 1e250;
const RESCALE_FACTOR: f64 = 1e-250;

/// Bessel function of the first kind `J_order(x)`.
pub fn bessel_j(order: u32, x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == 0.0 {
        return if order == 0 { 1.0 } else { 0.0 };
    }
    if x < 0.0 {
        let value = bessel_j(order, -x);
        return if order % 2 == 0 { value } else { -value };
    }
    if x.is_infinite() {
        return 0.0;
    }

    let target = order as usize;
    let dominant = (order as f64).max(x);
    let raw_start = (dominant + 20.0 + (40.0 * dominant).sqrt()).ceil() as usize;
    let start = 2 * ((raw_start + 1) / 2);

    let two_over_x = 2.0 / x;
    let mut above = 0.0;
    let mut current = 1.0;
    let mut norm = 2.0 * current;
    let mut value = 0.0;

    for k in (1..=start).rev() {
        let below = k as f64 * two_over_x * current - above;
        above = current;
        current = below;

        let index = k - 1;
        if index == target {
            value = current;
        }
        if index == 0 {
            norm += current;
        } else if index % 2 == 0 {
            norm += 2.0 * current;
        }

        if current.abs() > RESCALE_THRESHOLD {
            current *= RESCALE_FACTOR;
            above *= RESCALE_FACTOR;
            norm *= RESCALE_FACTOR;
            value *= RESCALE_FACTOR;
        }
    }

    value / norm
}

/// First derivative `J_order'(x)`.
pub fn bessel_j_prime(order: u32, x: f64) -> f64 {
    if order == 0 {
        -bessel_j(1, x)
    } else {
        0.5 * (bessel_j(order - 1, x) - bessel_j(order + 1, x))
    }
}

/// Second derivative from Bessel's equation. Only valid for `x > 0`.
fn bessel_j_second(order: u32, x: f64) -> f64 {
    let m = order as f64;
    -bessel_j_prime(order, x) / x - (1.0 - (m * m) / (x * x)) * bessel_j(order, x)
}

/// The `k`-th positive zero of `J_order` (1-based).
pub fn bessel_j_zero(order: u32, k: u32) -> Result<f64> {
    if k == 0 {
        return Err(MembraneError::domain(
            "Bessel zeros are 1-indexed; index 0 is not defined",
        ));
    }
    nth_positive_root(
        |x| bessel_j(order, x),
        |x| bessel_j_prime(order, x),
        scan_start(order),
        k,
    )
    .ok_or_else(|| {
        MembraneError::domain(format!("failed to locate zero {k} of J_{order}"))
    })
}

/// The `k`-th positive zero of `J_order'` (1-based). `x = 0` is never
/// counted, so for order 0 the first zero coincides with the first zero
/// of `J_1`.
pub fn bessel_jp_zero(order: u32, k: u32) -> Result<f64> {
    if k == 0 {
        return Err(MembraneError::domain(
            "Bessel derivative zeros are 1-indexed; index 0 is not defined",
        ));
    }
    nth_positive_root(
        |x| bessel_j_prime(order, x),
        |x| bessel_j_second(order, x),
        scan_start(order),
        k,
    )
    .ok_or_else(|| {
        MembraneError::domain(format!("failed to locate zero {k} of J_{order}'"))
    })
}

/// Both `J_m` and `J_m'` keep a constant sign on `(0, max(m, 1/2)]`.
fn scan_start(order: u32) -> f64 {
    (order as f64).max(0.5)
}

fn nth_positive_root<F, D>(f: F, df: D, start: f64, k: u32) -> Option<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut found = 0;
    let mut lo = start;
    let mut f_lo = f(lo);

    for _ in 0..MAX_SCAN_STEPS {
        let hi = lo + SCAN_STEP;
        let f_hi = f(hi);

        if f_hi == 0.0 {
            found += 1;
            if found == k {
                return Some(hi);
            }
        } else if f_lo != 0.0 && (f_lo < 0.0) != (f_hi < 0.0) {
            found += 1;
            if found == k {
                return Some(polish_root(&f, &df, lo, hi));
            }
        }

        lo = hi;
        f_lo = f_hi;
    }

    None
}

/// Newton iteration confined to a sign-changing bracket; steps that leave the
/// bracket fall back to bisection.
fn polish_root<F, D>(f: &F, df: &D, mut lo: f64, mut hi: f64) -> f64
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let lo_negative = f(lo) < 0.0;
    let mut x = 0.5 * (lo + hi);

    for _ in 0..MAX_NEWTON_ITERATIONS {
        let fx = f(x);
        if fx == 0.0 {
            return x;
        }
        if (fx < 0.0) == lo_negative {
            lo = x;
        } else {
            hi = x;
        }

        let slope = df(x);
        let mut next = if slope != 0.0 { x - fx / slope } else { f64::NAN };
        if !(next > lo && next < hi) {
            next = 0.5 * (lo + hi);
        }

        if (next - x).abs() <= ROOT_TOLERANCE * next.abs() {
            return next;
        }
        x = next;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn matches_reference_values() {
        assert_relative_eq!(bessel_j(0, 1.0), 0.765_197_686_557_966_6, epsilon = 1e-13);
        assert_relative_eq!(bessel_j(1, 1.0), 0.440_050_585_744_933_5, epsilon = 1e-13);
        assert_relative_eq!(bessel_j(2, 5.0), 0.046_565_116_277_752_22, epsilon = 1e-13);
        assert_relative_eq!(bessel_j(0, 10.0), -0.245_935_764_451_348_3, epsilon = 1e-13);
        assert_relative_eq!(bessel_j(1, 10.0), 0.043_472_746_168_861_44, epsilon = 1e-13);
    }

    #[test]
    fn handles_origin_and_negative_arguments() {
        assert_eq!(bessel_j(0, 0.0), 1.0);
        assert_eq!(bessel_j(3, 0.0), 0.0);
        assert_relative_eq!(bessel_j(1, -1.0), -bessel_j(1, 1.0), epsilon = 1e-15);
        assert_relative_eq!(bessel_j(2, -1.0), bessel_j(2, 1.0), epsilon = 1e-15);
    }

    #[test]
    fn derivative_follows_recurrence() {
        // J_0' = -J_1
        assert_relative_eq!(bessel_j_prime(0, 2.0), -bessel_j(1, 2.0), epsilon = 1e-15);

        let h = 1e-5;
        let numeric = (bessel_j(2, 3.0 + h) - bessel_j(2, 3.0 - h)) / (2.0 * h);
        assert_relative_eq!(bessel_j_prime(2, 3.0), numeric, epsilon = 1e-8);
    }

    #[test]
    fn locates_bessel_zeros() {
        let expected = [
            (0, 1, 2.404_825_557_695_773),
            (0, 2, 5.520_078_110_286_311),
            (0, 3, 8.653_727_912_911_013),
            (1, 1, 3.831_705_970_207_512),
            (1, 2, 7.015_586_669_815_619),
            (1, 3, 10.173_468_135_062_72),
            (2, 1, 5.135_622_301_840_683),
            (2, 2, 8.417_244_140_399_857),
            (2, 3, 11.619_841_172_149_06),
        ];

        for (order, k, root) in expected {
            let found = bessel_j_zero(order, k).unwrap();
            assert_relative_eq!(found, root, max_relative = 1e-9);
            assert!(bessel_j(order, found).abs() < 1e-12);
        }
    }

    #[test]
    fn locates_derivative_zeros() {
        assert_relative_eq!(bessel_jp_zero(0, 1).unwrap(), 3.831_705_970_207_512, max_relative = 1e-9);
        assert_relative_eq!(bessel_jp_zero(1, 1).unwrap(), 1.841_183_781_340_659, max_relative = 1e-9);
        assert_relative_eq!(bessel_jp_zero(2, 1).unwrap(), 3.054_236_928_227_140, max_relative = 1e-9);
        assert_relative_eq!(bessel_jp_zero(1, 2).unwrap(), 5.331_442_773_525_033, max_relative = 1e-9);
    }

    #[test]
    fn high_order_zeros_stay_ordered() {
        let first = bessel_j_zero(12, 1).unwrap();
        let second = bessel_j_zero(12, 2).unwrap();
        assert!(first > 12.0);
        assert!(second - first > 3.0);
        assert!(bessel_j(12, first).abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_index() {
        assert!(matches!(bessel_j_zero(0, 0), Err(MembraneError::Domain(_))));
        assert!(matches!(bessel_jp_zero(1, 0), Err(MembraneError::Domain(_))));
    }
}
