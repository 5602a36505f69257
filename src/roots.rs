//! Locating the x-axis crossings of a spline.
//!
//! Each cubic segment is solved exactly with the closed-form cubic formula
//! and only the roots falling inside that segment's knot interval are kept,
//! so a root landing on a shared knot is counted once. The sorted union of
//! all segment roots alternates between the rising and falling boundaries
//! of the signal regions.
use std::f64::consts::PI;

use crate::polynomial::Polynomial;
use crate::spline::CubicSpline;

/// Relative tolerance for deciding a root sits exactly on a knot
const BOUNDARY_EPS: f64 = 1e-9;

/// Real roots of the monic cubic `x^3 + a x^2 + b x + c`, ascending, with
/// multiplicity. Follows the classic trigonometric/Cardano case split.
fn solve_monic_cubic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let q = a * a - 3.0 * b;
    let r = 2.0 * a * a * a - 9.0 * a * b + 27.0 * c;
    let qq = q / 9.0;
    let rr = r / 54.0;
    let q3 = qq * qq * qq;
    let r2 = rr * rr;
    // scaled comparisons keep the discriminant test exact for integer input
    let cr2 = 729.0 * r * r;
    let cq3 = 2916.0 * q * q * q;

    if rr == 0.0 && qq == 0.0 {
        vec![-a / 3.0; 3]
    } else if cr2 == cq3 {
        // one single and one double root
        let sqrt_q = qq.sqrt();
        if rr > 0.0 {
            vec![
                -2.0 * sqrt_q - a / 3.0,
                sqrt_q - a / 3.0,
                sqrt_q - a / 3.0,
            ]
        } else {
            vec![
                -sqrt_q - a / 3.0,
                -sqrt_q - a / 3.0,
                2.0 * sqrt_q - a / 3.0,
            ]
        }
    } else if r2 < q3 {
        // three distinct real roots
        let sgn = if rr >= 0.0 { 1.0 } else { -1.0 };
        let theta = (sgn * (r2 / q3).sqrt()).acos();
        let norm = -2.0 * qq.sqrt();
        let mut roots = vec![
            norm * (theta / 3.0).cos() - a / 3.0,
            norm * ((theta + 2.0 * PI) / 3.0).cos() - a / 3.0,
            norm * ((theta - 2.0 * PI) / 3.0).cos() - a / 3.0,
        ];
        roots.sort_by(|x, y| x.partial_cmp(y).unwrap());
        roots
    } else {
        // one real root
        let sgn = if rr >= 0.0 { 1.0 } else { -1.0 };
        let big_a = -sgn * (rr.abs() + (r2 - q3).sqrt()).cbrt();
        let big_b = if big_a == 0.0 { 0.0 } else { qq / big_a };
        vec![big_a + big_b - a / 3.0]
    }
}

/// Real roots of `a x^2 + b x + c` with `a != 0`, ascending
fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }
    if discriminant == 0.0 {
        return vec![-b / (2.0 * a)];
    }
    let sqrt_d = discriminant.sqrt();
    let mut roots = vec![(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)];
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap());
    roots
}

/// All real roots of a polynomial of degree three or less, ascending, with
/// multiplicity. The identically-zero polynomial has no isolated roots and
/// yields an empty set.
fn real_roots(p: &Polynomial) -> Vec<f64> {
    if p.is_zero() {
        return Vec::new();
    }
    match p.degree() {
        0 => Vec::new(),
        1 => vec![-p[0] / p[1]],
        2 => solve_quadratic(p[2], p[1], p[0]),
        3 => solve_monic_cubic(p[2] / p[3], p[1] / p[3], p[0] / p[3]),
        degree => {
            debug_assert!(degree <= 3, "spline segments are at most cubic");
            Vec::new()
        }
    }
}

fn on_boundary(value: f64, boundary: f64) -> bool {
    (value - boundary).abs() <= BOUNDARY_EPS * boundary.abs().max(1.0)
}

/// Roots of one segment restricted to its knot interval.
///
/// Roots within floating-point distance of a knot are snapped onto it so
/// that the half-open ownership test is deterministic: a root at a shared
/// knot belongs to the segment on its left. The first segment additionally
/// owns its left knot, which no other segment can claim.
fn segment_roots(cubic: &Polynomial, start: f64, end: f64, closed_start: bool) -> Vec<f64> {
    let mut kept: Vec<f64> = real_roots(cubic)
        .into_iter()
        .map(|root| {
            if on_boundary(root, start) {
                start
            } else if on_boundary(root, end) {
                end
            } else {
                root
            }
        })
        .filter(|root| {
            let above = if closed_start {
                *root >= start
            } else {
                *root > start
            };
            above && *root <= end
        })
        .collect();
    kept.sort_by(|x, y| x.partial_cmp(y).unwrap());
    kept
}

/// Every x where the spline crosses the x-axis, ascending.
///
/// Retention is restricted to the knot domain of the data. The boundary
/// cubics extrapolate beyond the first and last knot for evaluation, but a
/// zero crossing out there is an artifact of extrapolation, not a signal
/// boundary, so it is not reported.
pub fn find_roots(spline: &CubicSpline) -> Vec<f64> {
    let knots = spline.knots();
    let mut roots = Vec::new();
    for i in 0..spline.len() {
        roots.extend(segment_roots(
            spline.segment(i),
            knots[i],
            knots[i + 1],
            i == 0,
        ));
    }
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap());
    roots
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_three_distinct_roots() {
        // (x - 1)(x - 2)(x - 3) = x^3 - 6x^2 + 11x - 6
        let roots = solve_monic_cubic(-6.0, 11.0, -6.0);
        assert_close(&roots, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_single_real_root() {
        // x^3 - 1 = (x - 1)(x^2 + x + 1)
        let roots = solve_monic_cubic(0.0, 0.0, -1.0);
        assert_close(&roots, &[1.0]);
    }

    #[test]
    fn test_triple_root() {
        // (x - 2)^3 = x^3 - 6x^2 + 12x - 8
        let roots = solve_monic_cubic(-6.0, 12.0, -8.0);
        assert_close(&roots, &[2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_double_root() {
        // (x - 1)^2 (x + 2) = x^3 - 3x + 2
        let roots = solve_monic_cubic(0.0, -3.0, 2.0);
        assert_close(&roots, &[-2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_lower_degree_segments() {
        // 2x - 4
        let linear = Polynomial::new(vec![-4.0, 2.0]);
        assert_close(&real_roots(&linear), &[2.0]);
        // x^2 - 1
        let quadratic = Polynomial::new(vec![-1.0, 0.0, 1.0]);
        assert_close(&real_roots(&quadratic), &[-1.0, 1.0]);
        // x^2 + 1 has no real roots
        let positive = Polynomial::new(vec![1.0, 0.0, 1.0]);
        assert!(real_roots(&positive).is_empty());
        assert!(real_roots(&Polynomial::zero()).is_empty());
        assert!(real_roots(&Polynomial::constant(3.0)).is_empty());
    }

    #[test]
    fn test_segment_ownership_of_shared_knot() {
        // x^2 - 1 on adjacent intervals sharing the knot at 1
        let p = Polynomial::new(vec![-1.0, 0.0, 1.0]);
        let left = segment_roots(&p, 0.0, 1.0, false);
        let right = segment_roots(&p, 1.0, 2.0, false);
        assert_close(&left, &[1.0]);
        assert!(right.is_empty());
    }

    #[test]
    fn test_triangle_spline_roots() {
        let (x, y) = test_data::triangle();
        let spline = CubicSpline::new(&x, &y).unwrap();
        let roots = find_roots(&spline);
        assert_close(&roots, &[-1.0, 1.0]);
    }

    #[test]
    fn test_two_bump_spline_roots_alternate() {
        let (x, y) = test_data::two_bumps();
        let spline = CubicSpline::new(&x, &y).unwrap();
        let roots = find_roots(&spline);
        assert_eq!(roots.len(), 4, "{roots:?}");
        assert!(roots.windows(2).all(|w| w[0] < w[1]));
        // the crossings bracket the two apexes
        assert!(roots[0] < 3.0 && 3.0 < roots[1]);
        assert!(roots[2] < 7.0 && 7.0 < roots[3]);
    }
}
