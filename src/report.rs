//! Plain-text analysis report: an options block followed by the peak
//! table.
use std::fmt;

use crate::config::AnalysisConfig;
use crate::peaks::Peak;
use crate::smooth::FilterMethod;

/// A renderable summary of one analysis run.
///
/// Implements [`fmt::Display`], so it can go straight to stdout or through
/// `to_string` into an output file.
#[derive(Debug, Clone)]
pub struct Report<'a> {
    pub peaks: &'a [Peak],
    pub config: &'a AnalysisConfig,
    /// The TMS reference shift subtracted during baseline adjustment
    pub reference_shift: f64,
    pub runtime_seconds: f64,
}

impl Report<'_> {
    fn write_options(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let config = self.config;
        writeln!(f, "Program Options")?;
        writeln!(f, "===============================")?;
        writeln!(f, "Baseline Adjustment\t:\t{}", config.baseline)?;
        writeln!(f, "Tolerance\t\t:\t{}", config.tolerance)?;
        match config.filter {
            FilterMethod::None => {
                writeln!(f, "No Filtering")?;
            }
            FilterMethod::Boxcar => {
                writeln!(f, "Boxcar Filtering")?;
                writeln!(f, "Boxcar Size (Cyclic)\t:\t{}", config.filter_size)?;
                writeln!(f, "Boxcar Passes\t\t:\t{}", config.passes)?;
            }
            FilterMethod::SavitzkyGolay => {
                writeln!(f, "Savitzky-Golay Filtering")?;
                writeln!(f, "SG Filter Size\t\t:\t{}", config.filter_size)?;
                writeln!(f, "SG Filter Passes\t:\t{}", config.passes)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Integration Method")?;
        writeln!(f, "===============================")?;
        writeln!(f, "{}", config.technique)?;
        writeln!(f)?;
        writeln!(f, "Plot File Data")?;
        writeln!(f, "===============================")?;
        writeln!(f, "File:\t{}", config.input_file)?;
        writeln!(
            f,
            "Plot shifted {} ppm for TMS calibration",
            self.reference_shift
        )?;
        writeln!(f)
    }

    fn write_peaks(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{:<8}{:<17}{:<17}{:<17}{:<17}{:<17}",
            "Peak", "Begin", "End", "Location", "Area", "Hydrogens"
        )?;
        writeln!(
            f,
            "======= ================ ================ ================ ================ ================"
        )?;
        for (i, peak) in self.peaks.iter().enumerate() {
            writeln!(
                f,
                "{:>7} {:>16.10} {:>16.10} {:>16.10} {:>16.10} {:>16}",
                i + 1,
                peak.begin,
                peak.end,
                peak.location,
                peak.area,
                peak.hydrogens
            )?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "                              -=> NMR ANALYSIS <=-")?;
        writeln!(f)?;
        writeln!(f)?;
        self.write_options(f)?;
        self.write_peaks(f)?;
        writeln!(f, "Analysis took {} seconds.", self.runtime_seconds)
    }
}
