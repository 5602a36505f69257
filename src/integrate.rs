//! Numerical quadrature of an arbitrary scalar function over an interval.
//!
//! Four techniques are available behind the [`IntegrationMethod`] selector:
//! a fixed composite Simpson rule, Romberg extrapolation, adaptive Simpson
//! bisection, and fixed-order Gauss-Legendre quadrature. Each treats the
//! integrand as a black box and touches no shared state, so integrations
//! over disjoint intervals can run concurrently.
use std::f64::consts::PI;
use std::fmt;
use std::sync::OnceLock;

use log::{trace, warn};
use thiserror::Error;

/// Node count of the fixed-order Gauss-Legendre rule
pub const GAUSS_LEGENDRE_ORDER: usize = 512;

/// Subdivision count used when dispatching the Newton-Cotes technique
const NEWTON_COTES_PANELS: usize = 4;

/// Each Romberg row doubles the evaluation count, so the table depth has to
/// stay small
const ROMBERG_MAX_ROWS: usize = 24;

/// Beyond this many bisections the midpoints stop being distinguishable
/// from the endpoints in `f64`
const ADAPTIVE_MAX_DEPTH: u32 = 64;

/// The ways quadrature selection can fail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuadratureError {
    #[error("Composite Simpson integration requires an even, non-zero subdivision count, received {0}")]
    OddSubdivisionCount(usize),
    #[error("{0} is not a recognized integration technique")]
    UnknownTechnique(i64),
}

/// Which quadrature algorithm to integrate peak areas with
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMethod {
    /// Composite Simpson's rule with a fixed subdivision count. No
    /// adaptivity and no error estimate, but exact for cubics.
    #[default]
    NewtonCotes,
    /// Richardson extrapolation of the trapezoidal rule, refined until two
    /// consecutive diagonal estimates agree within tolerance.
    Romberg,
    /// Recursive Simpson bisection concentrating evaluations where the
    /// integrand is hardest.
    AdaptiveSimpson,
    /// Fixed 512-node Gauss-Legendre rule, the most accurate choice for
    /// smooth integrands.
    GaussLegendre,
}

impl IntegrationMethod {
    /// Estimate the integral of `f` over `[a, b]`. The tolerance is only
    /// consulted by the iterative techniques.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F, a: f64, b: f64, tolerance: f64) -> f64 {
        match self {
            Self::NewtonCotes => simpson_panels(&f, a, b, NEWTON_COTES_PANELS),
            Self::Romberg => romberg(f, a, b, tolerance),
            Self::AdaptiveSimpson => adaptive_simpson(f, a, b, tolerance),
            Self::GaussLegendre => gauss_legendre(f, a, b),
        }
    }
}

impl TryFrom<i64> for IntegrationMethod {
    type Error = QuadratureError;

    fn try_from(code: i64) -> Result<Self, QuadratureError> {
        match code {
            0 => Ok(Self::NewtonCotes),
            1 => Ok(Self::Romberg),
            2 => Ok(Self::AdaptiveSimpson),
            3 => Ok(Self::GaussLegendre),
            _ => Err(QuadratureError::UnknownTechnique(code)),
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::NewtonCotes => "Newton-Cotes",
            Self::Romberg => "Romberg",
            Self::AdaptiveSimpson => "Adaptive Quadrature",
            Self::GaussLegendre => "Gaussian Quadrature",
        };
        f.write_str(name)
    }
}

/// Integrate `f` over `[a, b]` by the composite Simpson rule with `n`
/// subdivisions. `n` must be even and non-zero.
pub fn newton_cotes<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    n: usize,
) -> Result<f64, QuadratureError> {
    if n == 0 || n % 2 != 0 {
        return Err(QuadratureError::OddSubdivisionCount(n));
    }
    Ok(simpson_panels(&f, a, b, n))
}

fn simpson_panels<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64, n: usize) -> f64 {
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
        sum += weight * f(a + i as f64 * h);
    }
    sum * h / 3.0
}

/// Integrate `f` over `[a, b]` by Romberg extrapolation, stopping when two
/// consecutive diagonal estimates differ by less than `tolerance`.
///
/// Only the last two rows of the extrapolation table are kept in memory.
/// If the table depth cap is reached first, the last estimate is returned
/// and a warning is logged.
pub fn romberg<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, tolerance: f64) -> f64 {
    let mut h = b - a;
    let mut last_row = vec![0.5 * h * (f(a) + f(b))];
    for i in 2..=ROMBERG_MAX_ROWS {
        let midpoints = 1usize << (i - 2);
        let sum: f64 = (1..=midpoints).map(|k| f(a + (k as f64 - 0.5) * h)).sum();
        let mut row = Vec::with_capacity(i);
        row.push(0.5 * (last_row[0] + h * sum));
        for j in 1..i {
            let refined = row[j - 1] + (row[j - 1] - last_row[j - 1]) / (4f64.powi(j as i32) - 1.0);
            row.push(refined);
        }
        h *= 0.5;
        if (row[i - 1] - last_row[i - 2]).abs() < tolerance {
            return row[i - 1];
        }
        last_row = row;
    }
    warn!(
        "Romberg integration of [{a}, {b}] did not reach tolerance {tolerance} within {ROMBERG_MAX_ROWS} refinements, keeping the last estimate"
    );
    last_row[last_row.len() - 1]
}

fn simpson_estimate<F: Fn(f64) -> f64>(
    f: &F,
    x0: f64,
    x1: f64,
    f_x0: f64,
    f_x1: f64,
) -> (f64, f64, f64) {
    let mid = 0.5 * (x0 + x1);
    let f_mid = f(mid);
    let estimate = (x1 - x0).abs() / 6.0 * (f_x0 + 4.0 * f_mid + f_x1);
    (mid, f_mid, estimate)
}

#[allow(clippy::too_many_arguments)]
fn adaptive_step<F: Fn(f64) -> f64>(
    f: &F,
    x0: f64,
    x1: f64,
    f_x0: f64,
    f_x1: f64,
    tolerance: f64,
    whole: f64,
    mid: f64,
    f_mid: f64,
    depth: u32,
    capped: &mut bool,
) -> f64 {
    if depth > ADAPTIVE_MAX_DEPTH || !(x0 < mid && mid < x1) {
        *capped = true;
        return whole;
    }
    trace!("S({x0},{x1}) tol = {tolerance} depth = {depth}");
    let (left_mid, f_left_mid, left) = simpson_estimate(f, x0, mid, f_x0, f_mid);
    let (right_mid, f_right_mid, right) = simpson_estimate(f, mid, x1, f_mid, f_x1);
    let diff = left + right - whole;
    // the 10x acceptance factor is the conservative threshold from the
    // Burden & Faires treatment of adaptive quadrature
    if diff.abs() < 10.0 * tolerance {
        return left + right;
    }
    adaptive_step(
        f,
        x0,
        mid,
        f_x0,
        f_mid,
        tolerance / 2.0,
        left,
        left_mid,
        f_left_mid,
        depth + 1,
        capped,
    ) + adaptive_step(
        f,
        mid,
        x1,
        f_mid,
        f_x1,
        tolerance / 2.0,
        right,
        right_mid,
        f_right_mid,
        depth + 1,
        capped,
    )
}

/// Integrate `f` over `[a, b]` by adaptive Simpson bisection.
///
/// Each interval is accepted once the two half-interval estimates agree
/// with the whole-interval estimate; otherwise both halves recurse with
/// half the tolerance. Function values at endpoints and midpoints are
/// threaded through the recursion so nothing is evaluated twice. When the
/// depth cap is hit the best available estimate is kept and a warning is
/// logged.
pub fn adaptive_simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, tolerance: f64) -> f64 {
    let f_a = f(a);
    let f_b = f(b);
    let (mid, f_mid, whole) = simpson_estimate(&f, a, b, f_a, f_b);
    let mut capped = false;
    let result = adaptive_step(
        &f, a, b, f_a, f_b, tolerance, whole, mid, f_mid, 1, &mut capped,
    );
    if capped {
        warn!(
            "Adaptive quadrature of [{a}, {b}] hit its depth limit before reaching tolerance {tolerance}, keeping the best estimates"
        );
    }
    result
}

/// Integrate `f` over `[a, b]` with the fixed 512-node Gauss-Legendre rule
pub fn gauss_legendre<F: Fn(f64) -> f64>(f: F, a: f64, b: f64) -> f64 {
    let half_width = 0.5 * (b - a);
    let center = 0.5 * (b + a);
    legendre_table()
        .iter()
        .map(|(node, weight)| weight * f(half_width * node + center) * half_width)
        .sum()
}

/// Legendre polynomial `P_n` and its derivative at `z`, by the three-term
/// recurrence
fn legendre_polynomial(n: usize, z: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 1..=n {
        let p3 = p2;
        p2 = p1;
        p1 = ((2.0 * j as f64 - 1.0) * z * p2 - (j as f64 - 1.0) * p3) / j as f64;
    }
    let derivative = n as f64 * (z * p1 - p2) / (z * z - 1.0);
    (p1, derivative)
}

/// The Gauss-Legendre nodes and weights on `[-1, 1]`, computed once per
/// process by Newton iteration on the Legendre recurrence and shared
/// read-only afterwards.
pub fn legendre_table() -> &'static [(f64, f64)] {
    static TABLE: OnceLock<Vec<(f64, f64)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let n = GAUSS_LEGENDRE_ORDER;
        let mut table = vec![(0.0, 0.0); n];
        for i in 0..(n + 1) / 2 {
            // Chebyshev-based initial guess for the ith root
            let mut z = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
            for _ in 0..100 {
                let (p, dp) = legendre_polynomial(n, z);
                let dz = p / dp;
                z -= dz;
                if dz.abs() < 1e-15 {
                    break;
                }
            }
            let (_, dp) = legendre_polynomial(n, z);
            let weight = 2.0 / ((1.0 - z * z) * dp * dp);
            table[i] = (-z, weight);
            table[n - 1 - i] = (z, weight);
        }
        table
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(IntegrationMethod::NewtonCotes)]
    #[case(IntegrationMethod::Romberg)]
    #[case(IntegrationMethod::AdaptiveSimpson)]
    #[case(IntegrationMethod::GaussLegendre)]
    fn test_cubic_is_integrated_exactly(#[case] method: IntegrationMethod) {
        // every technique integrates x^3 over [0, 1] to 1/4
        let result = method.integrate(|x| x * x * x, 0.0, 1.0, 1e-10);
        assert!(
            (result - 0.25).abs() < 1e-6,
            "{method} returned {result}"
        );
    }

    #[test]
    fn test_sine_integral() {
        let exact = 2.0;
        let f = |x: f64| x.sin();
        assert!((romberg(f, 0.0, PI, 1e-10) - exact).abs() < 1e-9);
        assert!((adaptive_simpson(f, 0.0, PI, 1e-10) - exact).abs() < 1e-8);
        assert!((gauss_legendre(f, 0.0, PI) - exact).abs() < 1e-12);
        assert!((newton_cotes(f, 0.0, PI, 4).unwrap() - exact).abs() < 1e-2);
        assert!((newton_cotes(f, 0.0, PI, 256).unwrap() - exact).abs() < 1e-9);
    }

    #[test]
    fn test_newton_cotes_rejects_odd_subdivisions() {
        assert_eq!(
            newton_cotes(|x| x, 0.0, 1.0, 3).unwrap_err(),
            QuadratureError::OddSubdivisionCount(3)
        );
        assert_eq!(
            newton_cotes(|x| x, 0.0, 1.0, 0).unwrap_err(),
            QuadratureError::OddSubdivisionCount(0)
        );
    }

    #[test]
    fn test_romberg_exhaustion_returns_estimate() {
        // an unreachable tolerance exercises the capped path
        let result = romberg(|x: f64| x.sin(), 0.0, PI, 0.0);
        assert!(result.is_finite());
        assert!((result - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_adaptive_simpson_degenerate_interval() {
        let result = adaptive_simpson(|x| x, 1.0, 1.0, 1e-9);
        assert_eq!(result, 0.0);
    }

    #[test]
    fn test_legendre_table_shape() {
        let table = legendre_table();
        assert_eq!(table.len(), GAUSS_LEGENDRE_ORDER);
        let weight_sum: f64 = table.iter().map(|(_, w)| w).sum();
        assert!((weight_sum - 2.0).abs() < 1e-12);
        for i in 0..table.len() / 2 {
            let (lo, w_lo) = table[i];
            let (hi, w_hi) = table[table.len() - 1 - i];
            assert!((lo + hi).abs() < 1e-14);
            assert!((w_lo - w_hi).abs() < 1e-14);
        }
        assert!(table.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_method_selector_codes() {
        assert_eq!(
            IntegrationMethod::try_from(3).unwrap(),
            IntegrationMethod::GaussLegendre
        );
        assert_eq!(
            IntegrationMethod::try_from(7).unwrap_err(),
            QuadratureError::UnknownTechnique(7)
        );
        assert_eq!(IntegrationMethod::NewtonCotes.to_string(), "Newton-Cotes");
    }
}
