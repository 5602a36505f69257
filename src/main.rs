use std::env;
use std::error::Error;
use std::fs;
use std::io;
use std::time::Instant;

use nmrsignal::arrayops::ArrayPair;
use nmrsignal::baseline::baseline_adjust;
use nmrsignal::config::AnalysisConfig;
use nmrsignal::peaks::PeakIntegrator;
use nmrsignal::report::Report;
use nmrsignal::smooth;
use nmrsignal::spline::CubicSpline;

fn read_trace(path: &str) -> io::Result<(Vec<f64>, Vec<f64>)> {
    let text = fs::read_to_string(path)?;
    let mut values = Vec::new();
    for token in text.split_whitespace() {
        let value: f64 = token.parse().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("expected a number in {path}, found {token:?}"),
            )
        })?;
        values.push(value);
    }
    if values.len() % 2 != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{path} holds an odd number of values"),
        ));
    }
    let mut shifts = Vec::with_capacity(values.len() / 2);
    let mut intensities = Vec::with_capacity(values.len() / 2);
    for pair in values.chunks_exact(2) {
        shifts.push(pair[0]);
        intensities.push(pair[1]);
    }
    Ok((shifts, intensities))
}

// Acquisition order is highest shift first; the spline wants ascending
fn sort_ascending(shifts: Vec<f64>, intensities: Vec<f64>) -> (Vec<f64>, Vec<f64>) {
    let mut points: Vec<(f64, f64)> = shifts.into_iter().zip(intensities).collect();
    points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    points.into_iter().unzip()
}

fn main() -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let config_path = env::args().nth(1).unwrap_or_else(|| "nmr.in".to_string());
    let config = AnalysisConfig::from_file(&config_path)?;

    let (shifts, intensities) = read_trace(&config.input_file)?;
    let (mut shifts, mut intensities) = sort_ascending(shifts, intensities);
    let reference_shift = baseline_adjust(&mut shifts, &mut intensities, config.baseline);

    let pair = ArrayPair::from_vecs(shifts, intensities);
    let filtered = smooth::filter(&pair, config.filter, config.filter_size, config.passes)?;

    let spline = CubicSpline::new(&filtered.shift_array, &filtered.intensity_array)?;
    let integrator = PeakIntegrator::new(config.technique, config.tolerance);
    let peaks = integrator.analyze(&spline)?;

    let report = Report {
        peaks: &peaks,
        config: &config,
        reference_shift,
        runtime_seconds: start.elapsed().as_secs_f64(),
    };
    print!("{report}");
    fs::write(&config.output_file, report.to_string())?;
    Ok(())
}
