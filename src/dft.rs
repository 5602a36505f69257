//! Frequency-domain smoothing with a dense discrete Fourier transform.
//!
//! The trace is pushed through the unitary DFT matrix, attenuated with a
//! Gaussian low-pass diagonal, and transformed back. Building the full
//! matrix is O(n^2) in memory and time, which is acceptable at the trace
//! sizes this pipeline sees.
use std::f64::consts::{LN_2, PI};

use nalgebra::{Complex, DMatrix, DVector};

use crate::arrayops::ArrayPair;

/// The unitary DFT matrix `Z[j][k] = exp(-2*pi*i*j*k/n) / sqrt(n)`
fn unitary_dft_matrix(n: usize) -> DMatrix<Complex<f64>> {
    let scale = 1.0 / (n as f64).sqrt();
    DMatrix::from_fn(n, n, |j, k| {
        Complex::from_polar(scale, -2.0 * PI * (j * k) as f64 / n as f64)
    })
}

/// The Gaussian low-pass diagonal `G[k] = exp(-4*ln2*k^2 / n^1.5)`
fn gaussian_attenuator(n: usize) -> DVector<Complex<f64>> {
    DVector::from_fn(n, |k, _| {
        let k = k as f64;
        Complex::new((-4.0 * LN_2 * k * k / (n as f64).powf(1.5)).exp(), 0.0)
    })
}

/// Low-pass a complex signal: `conj(Z) * G * Z * y`
pub fn dft_filter_vector(y: &DVector<Complex<f64>>) -> DVector<Complex<f64>> {
    let n = y.len();
    let z = unitary_dft_matrix(n);
    let mut coefficients = &z * y;
    coefficients.component_mul_assign(&gaussian_attenuator(n));
    z.map(|v| v.conj()) * coefficients
}

/// Smooth the intensity array of a trace with the DFT low-pass filter,
/// discarding the imaginary residue. The shift axis is unchanged.
pub fn dft_filter(pair: &ArrayPair<'_>) -> ArrayPair<'static> {
    let n = pair.len();
    let y = DVector::from_iterator(
        n,
        pair.intensity_array.iter().map(|v| Complex::new(*v, 0.0)),
    );
    let filtered = dft_filter_vector(&y);
    ArrayPair::from_vecs(
        pair.shift_array.to_vec(),
        filtered.iter().map(|c| c.re).collect(),
    )
}
