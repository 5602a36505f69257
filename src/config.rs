//! Analysis options, read from the line-oriented `nmr.in` format.
//!
//! The file carries eight fields on separate lines: input path, baseline,
//! tolerance, filter type, filter size, filter passes, integration
//! technique, output path. Only the first whitespace-delimited token of
//! each line is significant, so trailing commentary is allowed. Selector
//! integers that name no known filter or technique are structured errors
//! here rather than aborts.
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::integrate::{IntegrationMethod, QuadratureError};
use crate::smooth::{FilterMethod, SmoothingError};

/// All the ways loading a configuration can fail
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read the configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("The configuration file is missing the {0} field")]
    MissingField(&'static str),
    #[error("Could not parse the {field} field from {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error(transparent)]
    UnknownFilter(#[from] SmoothingError),
    #[error(transparent)]
    UnknownTechnique(#[from] QuadratureError),
}

/// Everything the analysis pipeline needs to run once
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub input_file: String,
    pub output_file: String,
    pub baseline: f64,
    pub tolerance: f64,
    pub filter: FilterMethod,
    pub filter_size: usize,
    pub passes: usize,
    pub technique: IntegrationMethod,
}

fn field_token<'a>(
    lines: &mut std::str::Lines<'a>,
    field: &'static str,
) -> Result<&'a str, ConfigError> {
    lines
        .next()
        .and_then(|line| line.split_whitespace().next())
        .ok_or(ConfigError::MissingField(field))
}

fn parse_field<T: FromStr>(token: &str, field: &'static str) -> Result<T, ConfigError> {
    token.parse().map_err(|_| ConfigError::InvalidField {
        field,
        value: token.to_string(),
    })
}

impl AnalysisConfig {
    /// Read and parse a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Parse configuration text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut lines = text.lines();
        let input_file = field_token(&mut lines, "input file")?.to_string();
        let baseline = parse_field(field_token(&mut lines, "baseline")?, "baseline")?;
        let tolerance = parse_field(field_token(&mut lines, "tolerance")?, "tolerance")?;
        let filter_code: i64 = parse_field(field_token(&mut lines, "filter type")?, "filter type")?;
        let filter = FilterMethod::try_from(filter_code)?;
        let filter_size = parse_field(field_token(&mut lines, "filter size")?, "filter size")?;
        let passes = parse_field(field_token(&mut lines, "filter passes")?, "filter passes")?;
        let technique_code: i64 = parse_field(
            field_token(&mut lines, "integration technique")?,
            "integration technique",
        )?;
        let technique = IntegrationMethod::try_from(technique_code)?;
        let output_file = field_token(&mut lines, "output file")?.to_string();
        Ok(Self {
            input_file,
            output_file,
            baseline,
            tolerance,
            filter,
            filter_size,
            passes,
            technique,
        })
    }
}
