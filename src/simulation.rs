// End-to-end simulation: symbol source -> guided scrambler -> mapper ->
// AWGN channel -> detector -> error count, with RDS statistics taken on the
// transmitted stream.

use crate::config::Session;
use crate::detector::Detector;
use crate::error::{ConfigError, GsError};
use crate::guided::GuidedScrambler;
use crate::signal::{AwgnChannel, ErrorCount, RdsStatistics, SymbolGenerator, SymbolMapper};
use crate::utils::consts::{DEFAULT_SEED, DEFAULT_WINDOW_SIZE, DEFAULT_WORDS};
use crate::utils::dump::{SimulationReport, SessionSummary};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct SimulationOptions {
    pub words: usize,
    /// Complex noise power added by the channel.
    pub noise_power: f64,
    /// Codewords averaged by the detector's noise estimate.
    pub window_size: usize,
    pub seed: u64,
    /// Relative symbol probabilities; uniform when `None`.
    pub weightings: Option<Vec<f64>>,
    /// Run the detector and count symbol errors.
    pub measure_errors: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS,
            noise_power: 0.0,
            window_size: DEFAULT_WINDOW_SIZE,
            seed: DEFAULT_SEED,
            weightings: None,
            measure_errors: false,
        }
    }
}

pub struct Simulation {
    session: Session,
    options: SimulationOptions,
    generator: SymbolGenerator,
    encoder: GuidedScrambler,
    mapper: SymbolMapper,
    channel: AwgnChannel,
    detector: Option<Detector>,
    rds: RdsStatistics,
    errors: ErrorCount,
    histogram: Vec<u64>,
    cost_sum: f64,
    words: u64,
}

impl Simulation {
    pub fn new(session: Session, options: SimulationOptions) -> Result<Self, ConfigError> {
        let q = session.field_size();
        let generator = match &options.weightings {
            Some(weightings) => {
                if weightings.len() != q as usize {
                    return Err(ConfigError::BadWeightings(format!(
                        "{} weightings for {} symbols",
                        weightings.len(),
                        q
                    )));
                }
                SymbolGenerator::new(weightings.clone(), options.seed)?
            }
            None => SymbolGenerator::uniform(q, options.seed)?,
        };
        let mapper = SymbolMapper::new(session.constellation.clone(), q)?;
        // channel noise draws from its own stream so the source is unaffected
        let channel = AwgnChannel::new(options.noise_power, options.seed.wrapping_add(1))?;
        let detector = if options.measure_errors {
            Some(Detector::new(
                session.clone(),
                options.noise_power,
                options.window_size,
            )?)
        } else {
            None
        };
        info!(
            "Simulation: {} codewords, noise power {}, error measurement {}",
            options.words,
            options.noise_power,
            if options.measure_errors { "on" } else { "off" }
        );
        Ok(Self {
            encoder: GuidedScrambler::new(session.clone()),
            rds: RdsStatistics::new(session.starting_rds),
            histogram: vec![0; session.candidates()],
            errors: ErrorCount::default(),
            cost_sum: 0.0,
            words: 0,
            session,
            options,
            generator,
            mapper,
            channel,
            detector,
        })
    }

    pub fn words(&self) -> u64 {
        self.words
    }

    /// Pushes one codeword through the whole chain.
    pub fn step(&mut self) -> Result<(), GsError> {
        let data = self.generator.generate(self.session.data_length());
        let selection = self.encoder.scramble(&data)?;
        self.histogram[selection.index] += 1;
        if selection.cost.is_finite() {
            self.cost_sum += selection.cost;
        }

        let transmitted = self.mapper.map(&selection.codeword);
        self.rds.push(&transmitted);

        if let Some(detector) = self.detector.as_mut() {
            let received = self.channel.apply(&transmitted);
            let detection = detector.detect(&received)?;
            let errors = self.errors.compare(&data, &detection.data);
            if errors > 0 {
                debug!(word = self.words, errors, "symbol errors");
            }
        }
        self.words += 1;
        Ok(())
    }

    /// Runs until `options.words` codewords are done or `stop` is raised.
    /// `progress` is called after every codeword with the count so far.
    pub fn run(
        &mut self,
        stop: &AtomicBool,
        mut progress: impl FnMut(u64),
    ) -> Result<SimulationReport, GsError> {
        while self.words < self.options.words as u64 {
            if stop.load(Ordering::SeqCst) {
                info!("Stopped after {} codewords", self.words);
                break;
            }
            self.step()?;
            progress(self.words);
        }
        Ok(self.report())
    }

    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            session: SessionSummary::from(&self.session),
            words: self.words,
            noise_power: self.options.noise_power,
            mean_cost: if self.words == 0 {
                0.0
            } else {
                self.cost_sum / self.words as f64
            },
            rds: (&self.rds).into(),
            errors: self.detector.as_ref().map(|_| self.errors),
            measured_noise_power: self
                .detector
                .as_ref()
                .map(Detector::measured_noise_power),
            index_histogram: self.histogram.clone(),
        }
    }
}
