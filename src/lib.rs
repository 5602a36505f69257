//! `nmrsignal` is a library for processing a one-dimensional NMR trace
//! (chemical shift vs. signal intensity) into integrated peak records with
//! relative hydrogen counts.
//!
//! The pipeline fits a natural cubic spline through the baseline-adjusted
//! trace ([`CubicSpline`]), finds where the spline crosses the x-axis with
//! the closed-form cubic formula ([`crate::roots`]), integrates the region
//! between each pair of crossings with a selectable quadrature technique
//! ([`IntegrationMethod`]), and normalizes the areas against the smallest
//! peak ([`crate::peaks`]). The [`crate::smooth`], [`crate::dft`], and
//! [`crate::baseline`] modules hold the pre-processing transforms that feed
//! the fit.
//!
//! # Usage
//! ```
//! use nmrsignal::{analyze_peaks, CubicSpline, IntegrationMethod};
//!
//! let shifts = vec![-1.0, 0.0, 1.0];
//! let intensities = vec![0.0, 1.0, 0.0];
//! let spline = CubicSpline::new(&shifts, &intensities).unwrap();
//! let peaks = analyze_peaks(&spline, IntegrationMethod::GaussLegendre, 1e-9).unwrap();
//! assert_eq!(peaks.len(), 1);
//! assert_eq!(peaks[0].hydrogens, 1);
//! ```
pub mod arrayops;
pub mod baseline;
pub mod config;
pub mod dft;
pub mod integrate;
pub mod peaks;
pub mod polynomial;
pub mod report;
pub mod roots;
pub mod smooth;
pub mod spline;

#[cfg(test)]
mod test_data;

pub use crate::integrate::IntegrationMethod;
pub use crate::peaks::{analyze_peaks, Peak, PeakError, PeakIntegrator};
pub use crate::polynomial::Polynomial;
pub use crate::roots::find_roots;
pub use crate::spline::{CubicSpline, SplineError};
