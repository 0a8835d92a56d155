// Sequence detection for guided scrambled streams. Each received window is
// read under every augmenting index; the closest reading that the encoder
// itself would have produced wins, and its register and metric state are
// tracked so the next window is read from the same trajectory the encoder
// followed.

pub mod hypothesis;

use crate::config::Session;
use crate::error::{ConfigError, GsError};
use crate::field::Symbol;
use crate::guided::SearchContext;
use crate::scrambling::words::Word;
use crate::selection::Feedback;
use hypothesis::{Hypothesis, walk};
use num_complex::Complex64;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Outcome of detecting one codeword window.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Augmenting index judged most likely.
    pub index: usize,
    pub data: Word,
    pub distance: f64,
    /// `-distance / noise_power`, or `-distance` when the noise power is 0.
    pub log_likelihood: f64,
    /// False when no hypothesis matched the encoder's own choice and the
    /// nearest one was taken instead.
    pub consistent: bool,
}

#[derive(Clone, Debug)]
pub struct Detector {
    session: Session,
    noise_power: f64,
    window_size: usize,
    remainder: Word,
    feedback: Feedback,
    pending: Vec<Complex64>,
    residuals: VecDeque<f64>,
    residual_sum: f64,
}

impl Detector {
    pub fn new(session: Session, noise_power: f64, window_size: usize) -> Result<Self, ConfigError> {
        if !noise_power.is_finite() || noise_power < 0.0 {
            return Err(ConfigError::BadNoisePower(noise_power));
        }
        let window_size = window_size.max(1);
        info!(
            "Detector: {} hypotheses per window, noise power {}, averaging {} codeword(s)",
            session.candidates(),
            noise_power,
            window_size
        );
        Ok(Self {
            remainder: vec![0; session.scrambler.len() - 1],
            feedback: session.initial_feedback(),
            pending: Vec::with_capacity(session.codeword_length),
            residuals: VecDeque::with_capacity(window_size),
            residual_sum: 0.0,
            noise_power,
            window_size,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn noise_power(&self) -> f64 {
        self.noise_power
    }

    pub fn remainder(&self) -> &[Symbol] {
        &self.remainder
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Mean per-symbol residual power over the last `window_size` windows.
    pub fn measured_noise_power(&self) -> f64 {
        if self.residuals.is_empty() {
            0.0
        } else {
            self.residual_sum / self.residuals.len() as f64
        }
    }

    pub fn reset(&mut self) {
        self.remainder.fill(0);
        self.feedback = self.session.initial_feedback();
        self.pending.clear();
        self.residuals.clear();
        self.residual_sum = 0.0;
    }

    fn check(&self, samples: &[Complex64]) -> Result<(), GsError> {
        let expected = self.session.codeword_length;
        if samples.len() != expected {
            return Err(GsError::BadInputLength {
                expected,
                actual: samples.len(),
            });
        }
        Ok(())
    }

    /// Every hypothesis for `samples` from the current state, in index order.
    pub fn hypotheses(&self, samples: &[Complex64]) -> Result<Vec<Hypothesis>, GsError> {
        self.check(samples)?;
        Ok((0..self.session.candidates())
            .map(|index| walk(&self.session, samples, &self.remainder, index))
            .collect())
    }

    /// Detects one window of exactly L samples.
    pub fn detect(&mut self, samples: &[Complex64]) -> Result<Detection, GsError> {
        self.check(samples)?;
        Ok(self.detect_unchecked(samples))
    }

    fn detect_unchecked(&mut self, samples: &[Complex64]) -> Detection {
        let mut ranked: Vec<Hypothesis> = (0..self.session.candidates())
            .map(|index| walk(&self.session, samples, &self.remainder, index))
            .collect();
        // stable, so equal distances keep ascending index order
        ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let mut chosen = None;
        for hypothesis in &ranked {
            let context = SearchContext {
                session: &self.session,
                data: &hypothesis.data,
                remainder: &self.remainder,
                feedback: &self.feedback,
            };
            let replay = context.search();
            if replay.index == hypothesis.index {
                chosen = Some((hypothesis, replay.analysis.feedback, true));
                break;
            }
        }
        let (winner, feedback, consistent) = match chosen {
            Some(found) => found,
            None => {
                let nearest = &ranked[0];
                warn!(
                    index = nearest.index,
                    "no hypothesis is consistent with the encoder, taking the nearest"
                );
                let context = SearchContext {
                    session: &self.session,
                    data: &nearest.data,
                    remainder: &self.remainder,
                    feedback: &self.feedback,
                };
                (nearest, context.evaluate(nearest.index).analysis.feedback, false)
            }
        };

        let distance = winner.distance;
        let log_likelihood = if self.noise_power > 0.0 {
            -distance / self.noise_power
        } else {
            -distance
        };
        let detection = Detection {
            index: winner.index,
            data: winner.data.clone(),
            distance,
            log_likelihood,
            consistent,
        };
        self.remainder.copy_from_slice(&winner.remainder);
        self.feedback = feedback;
        self.record_residual(distance / self.session.codeword_length as f64);
        debug!(
            index = detection.index,
            distance,
            consistent,
            "detected codeword"
        );
        detection
    }

    fn record_residual(&mut self, residual: f64) {
        if self.residuals.len() == self.window_size {
            if let Some(oldest) = self.residuals.pop_front() {
                self.residual_sum -= oldest;
            }
        }
        self.residuals.push_back(residual);
        self.residual_sum += residual;
    }

    /// Streaming form: buffers partial windows across calls and returns the
    /// data of every window completed by `samples`.
    pub fn process(&mut self, samples: &[Complex64]) -> Word {
        let length = self.session.codeword_length;
        let mut output = Word::new();
        for &sample in samples {
            self.pending.push(sample);
            if self.pending.len() == length {
                let window = std::mem::take(&mut self.pending);
                output.extend(self.detect_unchecked(&window).data);
                self.pending = window;
                self.pending.clear();
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GsConfig;
    use crate::guided::GuidedScrambler;
    use crate::signal::{AwgnChannel, SymbolGenerator, SymbolMapper};

    fn session(field_size: u32, continuous: bool) -> Session {
        GsConfig {
            field_size,
            codeword_length: 10,
            augmenting_length: 2,
            continuous,
            ..GsConfig::default()
        }
        .validate()
        .unwrap()
    }

    fn run(session: Session, noise_power: f64, words: usize) -> (Word, Word, Detector) {
        let mapper =
            SymbolMapper::new(session.constellation.clone(), session.field_size()).unwrap();
        let mut generator = SymbolGenerator::uniform(session.field_size(), 9).unwrap();
        let mut encoder = GuidedScrambler::new(session.clone());
        let mut channel = AwgnChannel::new(noise_power, 21).unwrap();
        let mut detector = Detector::new(session.clone(), noise_power, 4).unwrap();

        let source = generator.generate(session.data_length() * words);
        let codewords = encoder.process(&source).unwrap();
        let received = channel.apply(&mapper.map(&codewords));
        let recovered = detector.process(&received);
        (source, recovered, detector)
    }

    #[test]
    fn test_noiseless_detection_is_exact() {
        for field_size in [2, 4, 8, 16] {
            for continuous in [false, true] {
                let (source, recovered, detector) = run(session(field_size, continuous), 0.0, 30);
                assert_eq!(recovered, source, "GF({field_size}) continuous={continuous}");
                assert_eq!(detector.measured_noise_power(), 0.0);
            }
        }
    }

    #[test]
    fn test_noiseless_tracks_encoder_state() {
        let session = session(4, true);
        let mapper =
            SymbolMapper::new(session.constellation.clone(), session.field_size()).unwrap();
        let mut encoder = GuidedScrambler::new(session.clone());
        let mut detector = Detector::new(session, 0.0, 1).unwrap();
        for data in [[0, 1, 2, 3, 3, 2, 1, 0], [1, 1, 1, 1, 2, 2, 2, 2]] {
            let selection = encoder.scramble(&data).unwrap();
            let detection = detector.detect(&mapper.map(&selection.codeword)).unwrap();
            assert_eq!(detection.index, selection.index);
            assert_eq!(detection.data, data);
            assert!(detection.consistent);
            assert_eq!(detection.distance, 0.0);
            assert_eq!(detector.remainder(), encoder.remainder());
            assert_eq!(detector.feedback(), encoder.feedback());
        }
    }

    #[test]
    fn test_mild_noise_mostly_recovers() {
        let (source, recovered, detector) = run(session(2, true), 0.05, 200);
        let errors = source
            .iter()
            .zip(&recovered)
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(recovered.len(), source.len());
        assert!(errors * 100 < source.len(), "{errors} errors");
        let measured = detector.measured_noise_power();
        assert!(measured > 0.0 && measured < 0.1, "measured {measured}");
    }

    #[test]
    fn test_log_likelihood_scales_with_noise() {
        let session = session(2, false);
        let mut detector = Detector::new(session, 0.5, 1).unwrap();
        let samples = vec![Complex64::new(0.8, 0.1); 10];
        let detection = detector.detect(&samples).unwrap();
        assert!((detection.log_likelihood + detection.distance / 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut detector = Detector::new(session(2, true), 0.0, 1).unwrap();
        assert_eq!(
            detector.detect(&[Complex64::new(1.0, 0.0); 3]),
            Err(GsError::BadInputLength {
                expected: 10,
                actual: 3
            })
        );
        assert!(Detector::new(session(2, true), -1.0, 1).is_err());
        let listing = detector.hypotheses(&[Complex64::new(1.0, 0.0); 10]).unwrap();
        assert_eq!(listing.len(), 4);
        assert!(listing.iter().enumerate().all(|(i, h)| h.index == i));
    }
}
