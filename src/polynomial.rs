//! A value type for single-variable polynomial algebra.
//!
//! [`Polynomial`] stores coefficients in ascending degree order and is
//! immutable once constructed. All arithmetic operators return new values,
//! so polynomials can be shared freely across the spline and root finding
//! machinery.
use std::fmt;
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

use log::debug;

/// Iteration cap for Newton's method in [`Polynomial::root`]
const MAX_ITERATIONS: usize = 10_000;

/// Successive iterates closer than this are considered converged
const TOLERANCE: f64 = 1e-11;

/// A polynomial in one variable with real coefficients.
///
/// The coefficient of `x^i` is stored at index `i`. Trailing zero
/// coefficients are stripped on construction so that the degree is always
/// the index of the highest non-zero term, with the zero polynomial
/// represented as a single zero coefficient of degree 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::zero()
    }
}

impl Polynomial {
    /// Create a polynomial from coefficients listed from lowest to highest
    /// degree. An empty sequence produces the zero polynomial.
    pub fn new(mut coefficients: Vec<f64>) -> Self {
        while coefficients.len() > 1 && coefficients.last() == Some(&0.0) {
            coefficients.pop();
        }
        if coefficients.is_empty() {
            coefficients.push(0.0);
        }
        Self { coefficients }
    }

    /// The polynomial `0x^0`
    pub fn zero() -> Self {
        Self {
            coefficients: vec![0.0],
        }
    }

    /// A degree-0 polynomial with the given value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && self.coefficients[0] == 0.0
    }

    /// Evaluate the polynomial at `x` by Horner's rule
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + c)
    }

    /// The first derivative. The derivative of a degree-0 polynomial is the
    /// zero polynomial.
    pub fn derivative(&self) -> Polynomial {
        if self.degree() == 0 {
            return Polynomial::zero();
        }
        Polynomial::new(
            self.coefficients[1..]
                .iter()
                .enumerate()
                .map(|(i, c)| c * (i + 1) as f64)
                .collect(),
        )
    }

    /// Raise the polynomial to a non-negative integer power by repeated
    /// squaring
    pub fn power(&self, n: u32) -> Polynomial {
        if n == 0 {
            return Polynomial::constant(1.0);
        }
        if n == 1 {
            return self.clone();
        }
        if n % 2 == 0 {
            let half = self.power(n / 2);
            half.clone() * half
        } else {
            self.clone() * self.power(n - 1)
        }
    }

    /// Find a root by Newton's method starting from `initial_guess`.
    ///
    /// Iterates until two successive iterates differ by less than `1e-11`
    /// or the iteration cap is reached. The last iterate is returned either
    /// way, so callers must supply a guess in the basin of the root they
    /// want.
    pub fn root(&self, initial_guess: f64) -> f64 {
        let fprime = self.derivative();
        let mut p0 = initial_guess;
        for _ in 0..MAX_ITERATIONS {
            let slope = fprime.evaluate(p0);
            if slope == 0.0 {
                debug!("Newton's method stalled on a zero derivative at x={p0}");
                return p0;
            }
            let p = p0 - self.evaluate(p0) / slope;
            if (p - p0).abs() < TOLERANCE {
                return p;
            }
            p0 = p;
        }
        debug!("Newton's method did not converge after {MAX_ITERATIONS} iterations, keeping x={p0}");
        p0
    }

    /// Multiply by the monomial `a*x^n`
    fn distribute(&self, a: f64, n: usize) -> Polynomial {
        let mut result = vec![0.0; n];
        result.extend(self.coefficients.iter().map(|c| a * c));
        Polynomial::new(result)
    }
}

impl Index<usize> for Polynomial {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.coefficients[i]
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, other: Polynomial) -> Polynomial {
        let mut result = vec![0.0; self.coefficients.len().max(other.coefficients.len())];
        for (i, c) in self.coefficients.iter().enumerate() {
            result[i] += c;
        }
        for (i, c) in other.coefficients.iter().enumerate() {
            result[i] += c;
        }
        Polynomial::new(result)
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        -1.0 * self
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, other: Polynomial) -> Polynomial {
        self + (-other)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, other: Polynomial) -> Polynomial {
        let mut result = Polynomial::zero();
        for (i, c) in self.coefficients.iter().enumerate() {
            if *c != 0.0 {
                result = result + other.distribute(*c, i);
            }
        }
        result
    }
}

impl Mul<Polynomial> for f64 {
    type Output = Polynomial;

    fn mul(self, p: Polynomial) -> Polynomial {
        Polynomial::new(p.coefficients.iter().map(|c| self * c).collect())
    }
}

impl Mul<f64> for Polynomial {
    type Output = Polynomial;

    fn mul(self, scalar: f64) -> Polynomial {
        scalar * self
    }
}

impl Add<Polynomial> for f64 {
    type Output = Polynomial;

    fn add(self, p: Polynomial) -> Polynomial {
        let mut coefficients = p.coefficients;
        coefficients[0] += self;
        Polynomial::new(coefficients)
    }
}

impl Add<f64> for Polynomial {
    type Output = Polynomial;

    fn add(self, scalar: f64) -> Polynomial {
        scalar + self
    }
}

impl Div<f64> for Polynomial {
    type Output = Polynomial;

    fn div(self, scalar: f64) -> Polynomial {
        Polynomial::new(self.coefficients.iter().map(|c| c / scalar).collect())
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (i, c) in self.coefficients.iter().enumerate() {
            if *c == 0.0 {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            write!(f, "{c}")?;
            if i > 0 {
                write!(f, "x")?;
            }
            if i > 1 {
                write!(f, "^{i}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_trailing_zeros_trimmed() {
        let p = Polynomial::new(vec![1.0, 2.0, 0.0, 0.0]);
        assert_eq!(p.degree(), 1);
        assert_eq!(p.coefficients(), &[1.0, 2.0]);

        let z = Polynomial::new(vec![0.0, 0.0, 0.0]);
        assert!(z.is_zero());
        assert_eq!(z.degree(), 0);
    }

    #[test]
    fn test_empty_is_zero() {
        let p = Polynomial::new(Vec::new());
        assert!(p.is_zero());
        assert_eq!(p.evaluate(3.0), 0.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-2.5)]
    fn test_evaluate(#[case] x: f64) {
        // 2 - x + 3x^2
        let p = Polynomial::new(vec![2.0, -1.0, 3.0]);
        let expected = 2.0 - x + 3.0 * x * x;
        assert!((p.evaluate(x) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_of_constant_is_zero() {
        let p = Polynomial::constant(5.0);
        assert!(p.derivative().is_zero());
    }

    #[test]
    fn test_derivative_of_monomial() {
        // x^4 -> 4x^3
        let p = Polynomial::new(vec![0.0, 0.0, 0.0, 0.0, 1.0]);
        let d = p.derivative();
        assert_eq!(d, Polynomial::new(vec![0.0, 0.0, 0.0, 4.0]));
    }

    #[test]
    fn test_power_matches_repeated_multiplication() {
        let p = Polynomial::new(vec![1.0, -2.0, 0.5]);
        let cubed = p.power(3);
        let by_hand = p.clone() * p.clone() * p.clone();
        assert_eq!(cubed.degree(), by_hand.degree());
        for (a, b) in cubed.coefficients().iter().zip(by_hand.coefficients()) {
            assert!((a - b).abs() < 1e-12);
        }
        assert_eq!(p.power(0), Polynomial::constant(1.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Polynomial::new(vec![1.0, 1.0]); // 1 + x
        let b = Polynomial::new(vec![-1.0, 1.0]); // -1 + x
        assert_eq!(a.clone() + b.clone(), Polynomial::new(vec![0.0, 2.0]));
        assert_eq!(a.clone() - a.clone(), Polynomial::zero());
        // (1 + x)(-1 + x) = x^2 - 1
        assert_eq!(a.clone() * b, Polynomial::new(vec![-1.0, 0.0, 1.0]));
        assert_eq!(2.0 * a.clone(), Polynomial::new(vec![2.0, 2.0]));
        assert_eq!(a.clone() / 2.0, Polynomial::new(vec![0.5, 0.5]));
        assert_eq!(1.0 + Polynomial::new(vec![0.0, 1.0]), a);
    }

    #[test]
    fn test_newton_root() {
        // x^2 - 2 has a root at sqrt(2)
        let p = Polynomial::new(vec![-2.0, 0.0, 1.0]);
        let r = p.root(1.5);
        assert!((r - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_newton_root_zero_slope_returns_guess() {
        // derivative of a constant is zero everywhere
        let p = Polynomial::constant(4.0);
        assert_eq!(p.root(1.0), 1.0);
    }

    #[test]
    fn test_display() {
        let p = Polynomial::new(vec![2.0, 0.0, -1.0]);
        assert_eq!(p.to_string(), "2 + -1x^2");
        assert_eq!(Polynomial::zero().to_string(), "0");
    }
}
