use crate::error::ConfigError;
use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Additive white Gaussian noise with a fixed total (complex) power.
#[derive(Debug)]
pub struct AwgnChannel {
    noise_power: f64,
    distribution: Normal<f64>,
    rng: StdRng,
}

impl AwgnChannel {
    pub fn new(noise_power: f64, seed: u64) -> Result<Self, ConfigError> {
        if !noise_power.is_finite() || noise_power < 0.0 {
            return Err(ConfigError::BadNoisePower(noise_power));
        }
        // half the power in each of the I and Q components
        let distribution = Normal::new(0.0, (noise_power / 2.0).sqrt())
            .map_err(|_| ConfigError::BadNoisePower(noise_power))?;
        Ok(Self {
            noise_power,
            distribution,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Noise power for a target Es/N0 in dB with the given mean symbol energy.
    pub fn noise_power_for_snr(snr_db: f64, symbol_energy: f64) -> f64 {
        symbol_energy / 10f64.powf(snr_db / 10.0)
    }

    pub fn noise_power(&self) -> f64 {
        self.noise_power
    }

    pub fn apply(&mut self, samples: &[Complex64]) -> Vec<Complex64> {
        if self.noise_power == 0.0 {
            return samples.to_vec();
        }
        samples
            .iter()
            .map(|&s| {
                let re = self.distribution.sample(&mut self.rng);
                let im = self.distribution.sample(&mut self.rng);
                s + Complex64::new(re, im)
            })
            .collect()
    }
}
