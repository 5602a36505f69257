//! Smoothing filters applied to a trace ahead of spline fitting.
//!
//! Two time-domain filters are provided: a cyclic boxcar average and the
//! classic table-driven Savitzky-Golay convolution. Both can run for
//! multiple passes. The frequency-domain alternative lives in
//! [`crate::dft`].
use thiserror::Error;

use crate::arrayops::ArrayPair;

/// 5-tap quadratic/cubic smoothing coefficients from the 1964
/// Savitzky-Golay tables, normalizer 35
const SG_5: [f64; 5] = [-3.0, 12.0, 17.0, 12.0, -3.0];

/// 11-tap coefficients, normalizer 429
const SG_11: [f64; 11] = [
    -36.0, 9.0, 44.0, 69.0, 84.0, 89.0, 84.0, 69.0, 44.0, 9.0, -36.0,
];

/// 17-tap coefficients, normalizer 323
const SG_17: [f64; 17] = [
    -21.0, -6.0, 7.0, 18.0, 27.0, 34.0, 39.0, 42.0, 43.0, 42.0, 39.0, 34.0, 27.0, 18.0, 7.0, -6.0,
    -21.0,
];

/// All the ways smoothing can fail
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SmoothingError {
    #[error("The filter size must be an odd number, received {0}")]
    SizeNotOdd(usize),
    #[error("The filter size {0} must be smaller than the number of data points {1}")]
    SizeTooLarge(usize, usize),
    #[error("Savitzky-Golay filters support sizes 5, 11, and 17, received {0}")]
    UnsupportedSavitzkyGolaySize(usize),
    #[error("{0} is not a recognized filter type")]
    UnknownFilter(i64),
}

/// Which smoothing filter to run over the trace before fitting
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FilterMethod {
    /// Leave the trace untouched
    #[default]
    None,
    /// Cyclic moving average
    Boxcar,
    /// Table-driven Savitzky-Golay convolution
    SavitzkyGolay,
}

impl TryFrom<i64> for FilterMethod {
    type Error = SmoothingError;

    fn try_from(code: i64) -> Result<Self, SmoothingError> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Boxcar),
            2 => Ok(Self::SavitzkyGolay),
            _ => Err(SmoothingError::UnknownFilter(code)),
        }
    }
}

fn boxcar_pass(intensity_array: &[f64], size: usize) -> Vec<f64> {
    let n = intensity_array.len() as isize;
    let half = (size as isize - 1) / 2;
    (0..n)
        .map(|i| {
            let mut sum = 0.0;
            for j in (i - half)..=(i + half) {
                // the window wraps around the trace ends
                sum += intensity_array[((j % n + n) % n) as usize];
            }
            sum / size as f64
        })
        .collect()
}

/// Smooth a trace with `passes` rounds of a cyclic boxcar average of odd
/// width `size`. The shift axis is unchanged.
pub fn boxcar(
    pair: &ArrayPair<'_>,
    size: usize,
    passes: usize,
) -> Result<ArrayPair<'static>, SmoothingError> {
    if size % 2 == 0 {
        return Err(SmoothingError::SizeNotOdd(size));
    }
    if size >= pair.len() {
        return Err(SmoothingError::SizeTooLarge(size, pair.len()));
    }
    let mut intensity = pair.intensity_array.to_vec();
    for _ in 0..passes {
        intensity = boxcar_pass(&intensity, size);
    }
    Ok(ArrayPair::from_vecs(pair.shift_array.to_vec(), intensity))
}

fn savitzky_golay_pass(
    shift_array: &[f64],
    intensity_array: &[f64],
    size: usize,
) -> Result<(Vec<f64>, Vec<f64>), SmoothingError> {
    let (coefficients, norm): (&[f64], f64) = match size {
        5 => (&SG_5, 35.0),
        11 => (&SG_11, 429.0),
        17 => (&SG_17, 323.0),
        _ => return Err(SmoothingError::UnsupportedSavitzkyGolaySize(size)),
    };
    let n = intensity_array.len();
    let half = size / 2;
    // points without a full window on both sides are dropped, so the trace
    // shrinks with every pass
    if n < size + 3 {
        return Err(SmoothingError::SizeTooLarge(size, n));
    }
    let mut shifts = Vec::with_capacity(n - size - 1);
    let mut intensities = Vec::with_capacity(n - size - 1);
    for i in (1 + half)..(n - 1 - half) {
        let sum: f64 = coefficients
            .iter()
            .enumerate()
            .map(|(j, c)| c * intensity_array[i + j - half])
            .sum();
        shifts.push(shift_array[i]);
        intensities.push(sum / norm);
    }
    Ok((shifts, intensities))
}

/// Smooth a trace with `passes` rounds of a Savitzky-Golay filter of width
/// 5, 11, or 17. Edge points lose their window and are dropped from the
/// output.
pub fn savitzky_golay(
    pair: &ArrayPair<'_>,
    size: usize,
    passes: usize,
) -> Result<ArrayPair<'static>, SmoothingError> {
    let mut shifts = pair.shift_array.to_vec();
    let mut intensities = pair.intensity_array.to_vec();
    for _ in 0..passes {
        let (s, y) = savitzky_golay_pass(&shifts, &intensities, size)?;
        shifts = s;
        intensities = y;
    }
    Ok(ArrayPair::from_vecs(shifts, intensities))
}

/// Run the selected filter over the trace
pub fn filter(
    pair: &ArrayPair<'_>,
    method: FilterMethod,
    size: usize,
    passes: usize,
) -> Result<ArrayPair<'static>, SmoothingError> {
    match method {
        FilterMethod::None => Ok(pair.to_owned()),
        FilterMethod::Boxcar => boxcar(pair, size, passes),
        FilterMethod::SavitzkyGolay => savitzky_golay(pair, size, passes),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn ramp(n: usize) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|x| 0.25 * x * x).collect();
        (x, y)
    }

    #[rstest]
    #[case(3, 1)]
    #[case(5, 4)]
    fn test_boxcar_preserves_constants(#[case] size: usize, #[case] passes: usize) {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y = vec![2.5; 20];
        let pair = ArrayPair::wrap(&x, &y);
        let smoothed = boxcar(&pair, size, passes).unwrap();
        assert_eq!(smoothed.len(), 20);
        for value in smoothed.intensity_array.iter() {
            assert!((value - 2.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_boxcar_rejects_bad_sizes() {
        let (x, y) = ramp(10);
        let pair = ArrayPair::wrap(&x, &y);
        assert_eq!(
            boxcar(&pair, 4, 1).unwrap_err(),
            SmoothingError::SizeNotOdd(4)
        );
        assert_eq!(
            boxcar(&pair, 11, 1).unwrap_err(),
            SmoothingError::SizeTooLarge(11, 10)
        );
    }

    #[test]
    fn test_savitzky_golay_is_exact_on_quadratics() {
        let (x, y) = ramp(30);
        let pair = ArrayPair::wrap(&x, &y);
        let smoothed = savitzky_golay(&pair, 5, 1).unwrap();
        // interior output points reproduce the quadratic exactly
        for (xs, ys) in smoothed
            .shift_array
            .iter()
            .zip(smoothed.intensity_array.iter())
        {
            assert!((ys - 0.25 * xs * xs).abs() < 1e-9, "at {xs}");
        }
    }

    #[test]
    fn test_savitzky_golay_shrinks_per_pass() {
        let (x, y) = ramp(40);
        let pair = ArrayPair::wrap(&x, &y);
        let one = savitzky_golay(&pair, 5, 1).unwrap();
        assert_eq!(one.len(), 40 - 6);
        let two = savitzky_golay(&pair, 5, 2).unwrap();
        assert_eq!(two.len(), 40 - 12);
    }

    #[test]
    fn test_savitzky_golay_rejects_unsupported_sizes() {
        let (x, y) = ramp(30);
        let pair = ArrayPair::wrap(&x, &y);
        assert_eq!(
            savitzky_golay(&pair, 7, 1).unwrap_err(),
            SmoothingError::UnsupportedSavitzkyGolaySize(7)
        );
    }

    #[test]
    fn test_filter_dispatch() {
        let (x, y) = ramp(30);
        let pair = ArrayPair::wrap(&x, &y);
        let untouched = filter(&pair, FilterMethod::None, 0, 0).unwrap();
        assert_eq!(untouched.intensity_array, pair.intensity_array);
        assert_eq!(
            FilterMethod::try_from(2).unwrap(),
            FilterMethod::SavitzkyGolay
        );
        assert_eq!(
            FilterMethod::try_from(9).unwrap_err(),
            SmoothingError::UnknownFilter(9)
        );
    }
}
