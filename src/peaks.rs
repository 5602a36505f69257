//! Turning a fitted spline into ordered peak records.
//!
//! The aggregator pairs consecutive zero crossings into peak boundaries,
//! integrates the spline over each pair with the selected quadrature
//! technique, and normalizes the areas into relative hydrogen counts
//! against the smallest peak.
use std::fmt;

use log::debug;
use thiserror::Error;

#[cfg(feature = "parallelism")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::integrate::IntegrationMethod;
use crate::roots::find_roots;
use crate::spline::CubicSpline;

/// One integrated signal region of the trace
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Peak {
    /// The zero crossing where the region opens
    pub begin: f64,
    /// The zero crossing where the region closes
    pub end: f64,
    /// The midpoint between the two boundaries
    pub location: f64,
    /// The signed integral of the spline over `[begin, end]`
    pub area: f64,
    /// Relative hydrogen count, the peak area normalized against the
    /// smallest peak area and rounded
    pub hydrogens: i32,
}

impl fmt::Display for Peak {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Peak({}, {}, {}, {}, {})",
            self.begin, self.end, self.location, self.area, self.hydrogens
        )
    }
}

/// All the ways peak aggregation can fail
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PeakError {
    #[error("Found {0} spline zero crossings; peak boundaries must pair up evenly")]
    UnpairedRoot(usize),
}

/// Integrates the regions between a spline's zero crossings into peaks.
///
/// Shares nothing mutable with the spline, so one integrator can serve any
/// number of splines.
#[derive(Debug, Clone)]
pub struct PeakIntegrator {
    pub method: IntegrationMethod,
    pub tolerance: f64,
}

impl Default for PeakIntegrator {
    fn default() -> Self {
        Self {
            method: IntegrationMethod::default(),
            tolerance: 1e-6,
        }
    }
}

impl PeakIntegrator {
    pub fn new(method: IntegrationMethod, tolerance: f64) -> Self {
        Self { method, tolerance }
    }

    /// Find, integrate, and normalize every peak of `spline` in boundary
    /// order.
    ///
    /// An odd number of zero crossings means the trace opened a region it
    /// never closed, so the whole set is rejected rather than silently
    /// dropping the trailing root. No zero crossings at all is an empty
    /// result, not an error.
    pub fn analyze(&self, spline: &CubicSpline) -> Result<Vec<Peak>, PeakError> {
        let bounds = Self::pair_roots(find_roots(spline))?;
        let mut peaks: Vec<Peak> = bounds
            .iter()
            .map(|(begin, end)| self.integrate_region(spline, *begin, *end))
            .collect();
        Self::assign_hydrogens(&mut peaks);
        Ok(peaks)
    }

    /// [`PeakIntegrator::analyze`], with the per-region integrations fanned
    /// out across the rayon thread pool. Region areas are independent, so
    /// the result is identical to the serial path.
    #[cfg(feature = "parallelism")]
    pub fn analyze_parallel(&self, spline: &CubicSpline) -> Result<Vec<Peak>, PeakError> {
        let bounds = Self::pair_roots(find_roots(spline))?;
        let mut peaks: Vec<Peak> = bounds
            .par_iter()
            .map(|(begin, end)| self.integrate_region(spline, *begin, *end))
            .collect();
        Self::assign_hydrogens(&mut peaks);
        Ok(peaks)
    }

    fn pair_roots(roots: Vec<f64>) -> Result<Vec<(f64, f64)>, PeakError> {
        if roots.len() % 2 != 0 {
            return Err(PeakError::UnpairedRoot(roots.len()));
        }
        debug!(
            "Pairing {} zero crossings into {} candidate peaks",
            roots.len(),
            roots.len() / 2
        );
        Ok(roots.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
    }

    fn integrate_region(&self, spline: &CubicSpline, begin: f64, end: f64) -> Peak {
        let area = self
            .method
            .integrate(|x| spline.evaluate(x), begin, end, self.tolerance);
        Peak {
            begin,
            end,
            location: (begin + end) / 2.0,
            area,
            hydrogens: 0,
        }
    }

    fn assign_hydrogens(peaks: &mut [Peak]) {
        let min_area = peaks.iter().map(|p| p.area).fold(f64::INFINITY, f64::min);
        if !min_area.is_finite() || min_area == 0.0 {
            return;
        }
        for peak in peaks.iter_mut() {
            peak.hydrogens = (peak.area / min_area).round() as i32;
        }
    }
}

/// A convenience function that analyzes `spline` with the given technique
/// and tolerance.
pub fn analyze_peaks(
    spline: &CubicSpline,
    method: IntegrationMethod,
    tolerance: f64,
) -> Result<Vec<Peak>, PeakError> {
    PeakIntegrator::new(method, tolerance).analyze(spline)
}
