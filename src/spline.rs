//! Natural cubic spline interpolation over a sorted trace.
//!
//! [`CubicSpline`] fits one cubic [`Polynomial`] per interval between
//! consecutive samples, with continuous value, first, and second derivative
//! at every interior knot and zero second derivative at both ends. The
//! tridiagonal system the natural boundary conditions produce is solved
//! directly in O(N) rather than with a dense factorization.
use thiserror::Error;

use crate::polynomial::Polynomial;

/// The ways constructing a spline from a trace can fail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SplineError {
    #[error("The shift and intensity arrays do not match in length ({0} vs {1})")]
    LengthMismatch(usize, usize),
    #[error("At least two points are required to build a spline, received {0}")]
    TooFewPoints(usize),
    #[error("The shift array must be strictly increasing, violated at index {0}")]
    ShiftNotSorted(usize),
}

/// A piecewise-cubic interpolant over `N` segments and `N + 1` knots.
///
/// Segments are stored as polynomials in the absolute coordinate, not in a
/// shifted per-segment variable, so a segment can be handed straight to the
/// closed-form root solver with its knot interval.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    cubics: Vec<Polynomial>,
    knots: Vec<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline through `(shift[i], intensity[i])`.
    ///
    /// The shift array must be strictly increasing; duplicate or
    /// out-of-order values are reported as an error rather than silently
    /// reordered.
    pub fn new(shift_array: &[f64], intensity_array: &[f64]) -> Result<Self, SplineError> {
        let x = shift_array;
        let y = intensity_array;
        if x.len() != y.len() {
            return Err(SplineError::LengthMismatch(x.len(), y.len()));
        }
        if x.len() < 2 {
            return Err(SplineError::TooFewPoints(x.len()));
        }
        if let Some(i) = (1..x.len()).find(|&i| x[i] <= x[i - 1]) {
            return Err(SplineError::ShiftNotSorted(i));
        }

        // how many cubics we're going to make
        let n = x.len() - 1;

        // interval widths between consecutive knots
        let h: Vec<f64> = (0..n).map(|i| x[i + 1] - x[i]).collect();

        // right-hand side of the tridiagonal system; the natural boundary
        // rows stay zero
        let mut alpha = vec![0.0; n + 1];
        for i in 1..n {
            alpha[i] = 3.0 / h[i] * (y[i + 1] - y[i]) - 3.0 / h[i - 1] * (y[i] - y[i - 1]);
        }

        // Forward elimination of the tridiagonal system
        //   row 0:      c_0 = 0
        //   row i:      h_{i-1} c_{i-1} + 2(h_{i-1} + h_i) c_i + h_i c_{i+1} = alpha_i
        //   row n:      c_n = 0
        let mut mu = vec![0.0; n + 1];
        let mut z = vec![0.0; n + 1];
        for i in 1..n {
            let l = 2.0 * (x[i + 1] - x[i - 1]) - h[i - 1] * mu[i - 1];
            mu[i] = h[i] / l;
            z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l;
        }

        // back substitution for the c coefficients
        let mut c = vec![0.0; n + 1];
        for i in (0..n).rev() {
            c[i] = z[i] - mu[i] * c[i + 1];
        }

        let mut cubics = Vec::with_capacity(n);
        for i in 0..n {
            let a_i = y[i];
            let b_i = (y[i + 1] - y[i]) / h[i] - h[i] * (c[i + 1] + 2.0 * c[i]) / 3.0;
            let c_i = c[i];
            let d_i = (c[i + 1] - c[i]) / (3.0 * h[i]);

            // expand a + b(x - x_i) + c(x - x_i)^2 + d(x - x_i)^3 into
            // absolute coordinates
            let diff = Polynomial::new(vec![-x[i], 1.0]);
            let p = a_i + b_i * diff.clone() + c_i * diff.power(2) + d_i * diff.power(3);
            cubics.push(p);
        }

        Ok(Self {
            cubics,
            knots: x.to_vec(),
        })
    }

    /// How many cubic segments make up the spline
    pub fn len(&self) -> usize {
        self.cubics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubics.is_empty()
    }

    /// The `i`th cubic segment
    pub fn segment(&self, i: usize) -> &Polynomial {
        &self.cubics[i]
    }

    /// The knot x-values the segments are stitched together at
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// The x-range the `i`th segment is evaluated over. The first segment
    /// extends to negative infinity and the last to positive infinity
    /// because out-of-range evaluation extrapolates with the boundary
    /// cubic.
    pub fn range(&self, i: usize) -> (f64, f64) {
        let last = self.cubics.len() - 1;
        let start = if i == 0 {
            f64::NEG_INFINITY
        } else {
            self.knots[i]
        };
        let end = if i == last {
            f64::INFINITY
        } else {
            self.knots[i + 1]
        };
        (start, end)
    }

    /// The index of the segment that owns `x`, by binary search over the
    /// knots. Out-of-range values clamp to the boundary segments.
    pub fn find_index(&self, x: f64) -> usize {
        if x < self.knots[0] {
            return 0;
        }
        if x > *self.knots.last().unwrap() {
            return self.cubics.len() - 1;
        }
        let (mut left, mut right) = (0, self.knots.len() - 1);
        loop {
            let mid = (left + right) / 2;
            if self.knots[mid] <= x && x <= self.knots[mid + 1] {
                return mid;
            }
            if self.knots[mid] > x {
                right = mid - 1;
            } else {
                left = mid + 1;
            }
        }
    }

    /// Evaluate the spline at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.cubics[self.find_index(x)].evaluate(x)
    }
}
