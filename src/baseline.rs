//! Baseline and reference-peak adjustment ahead of peak integration.

/// Re-zero a trace against its reference (TMS) peak and baseline.
///
/// Scans from the highest chemical shift downward for the first intensity
/// at or above `baseline`; that shift becomes the reference and is
/// subtracted from every x. The baseline is subtracted from every y so the
/// peak integrals measure area between the spline and the baseline.
/// Returns the reference shift that was applied.
///
/// The shift array must already be sorted ascending.
pub fn baseline_adjust(
    shift_array: &mut [f64],
    intensity_array: &mut [f64],
    baseline: f64,
) -> f64 {
    let mut reference = 0.0;
    for (x, y) in shift_array.iter().zip(intensity_array.iter()).rev() {
        if *y >= baseline {
            reference = *x;
            break;
        }
    }
    for x in shift_array.iter_mut() {
        *x -= reference;
    }
    for y in intensity_array.iter_mut() {
        *y -= baseline;
    }
    reference
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reference_is_highest_shift_above_baseline() {
        let mut x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let mut y = vec![0.1, 2.0, 0.1, 1.5, 0.1];
        let shift = baseline_adjust(&mut x, &mut y, 1.0);
        assert_eq!(shift, 3.0);
        assert_eq!(x, vec![-3.0, -2.0, -1.0, 0.0, 1.0]);
        assert!((y[0] - (0.1 - 1.0)).abs() < 1e-12);
        assert!((y[3] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_nothing_above_baseline_only_shifts_intensity() {
        let mut x = vec![0.0, 1.0, 2.0];
        let mut y = vec![0.1, 0.2, 0.1];
        let shift = baseline_adjust(&mut x, &mut y, 5.0);
        assert_eq!(shift, 0.0);
        assert_eq!(x, vec![0.0, 1.0, 2.0]);
        assert!((y[1] - (0.2 - 5.0)).abs() < 1e-12);
    }
}
