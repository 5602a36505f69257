//! Synthetic traces shared by the module tests.

/// A single triangular bump interpolating to a unit apex at zero
pub fn triangle() -> (Vec<f64>, Vec<f64>) {
    (vec![-1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0])
}

/// Two identical bumps over a slightly negative baseline, mirror-symmetric
/// about the center of the trace
pub fn two_bumps() -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..=10).map(|i| i as f64).collect();
    let mut y = vec![-0.2; x.len()];
    y[3] = 1.0;
    y[7] = 1.0;
    (x, y)
}

/// A unit bump followed by one twice as tall
pub fn uneven_bumps() -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..=12).map(|i| i as f64).collect();
    let mut y = vec![-0.2; x.len()];
    y[3] = 1.0;
    y[9] = 2.0;
    (x, y)
}
