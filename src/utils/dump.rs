use crate::config::Session;
use crate::field::Symbol;
use crate::scrambling::words::AugmentingPosition;
use crate::selection::SelectionMethod;
use crate::signal::{ErrorCount, RdsStatistics};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub field_size: u8,
    pub codeword_length: usize,
    pub augmenting_length: usize,
    pub continuous: bool,
    pub scrambler: Vec<Symbol>,
    pub selection_method: SelectionMethod,
    pub augmenting_position: AugmentingPosition,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            field_size: session.field_size(),
            codeword_length: session.codeword_length,
            augmenting_length: session.augmenting_length,
            continuous: session.continuous,
            scrambler: session.scrambler.to_vec(),
            selection_method: session.method,
            augmenting_position: session.position,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RdsSummary {
    pub mean_magnitude: f64,
    pub variance: f64,
    pub mean_power: f64,
    pub peak: f64,
}

impl From<&RdsStatistics> for RdsSummary {
    fn from(stats: &RdsStatistics) -> Self {
        Self {
            mean_magnitude: stats.mean_magnitude(),
            variance: stats.variance(),
            mean_power: stats.mean_power(),
            peak: stats.peak(),
        }
    }
}

/// Everything one simulation run measured.
#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    pub session: SessionSummary,
    pub words: u64,
    pub noise_power: f64,
    /// Mean winning cost per codeword.
    pub mean_cost: f64,
    pub rds: RdsSummary,
    /// Present when the detector ran.
    pub errors: Option<ErrorCount>,
    pub measured_noise_power: Option<f64>,
    /// How often each candidate index won.
    pub index_histogram: Vec<u64>,
}

impl SimulationReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}
