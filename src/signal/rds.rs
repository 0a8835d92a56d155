use num_complex::Complex64;
use serde::Serialize;

/// Running digital sum statistics of a transmitted sample stream.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RdsStatistics {
    pub samples: u64,
    /// Current running digital sum.
    pub rds: Complex64,
    sum_magnitude: f64,
    sum_power: f64,
    peak: f64,
}

impl RdsStatistics {
    pub fn new(starting_rds: Complex64) -> Self {
        Self {
            samples: 0,
            rds: starting_rds,
            sum_magnitude: 0.0,
            sum_power: 0.0,
            peak: 0.0,
        }
    }

    pub fn push(&mut self, samples: &[Complex64]) {
        for &sample in samples {
            self.rds += sample;
            let magnitude = self.rds.norm();
            self.sum_magnitude += magnitude;
            self.sum_power += magnitude * magnitude;
            self.peak = self.peak.max(magnitude);
        }
        self.samples += samples.len() as u64;
    }

    /// Mean |RDS|.
    pub fn mean_magnitude(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.sum_magnitude / self.samples as f64
    }

    /// Mean |RDS|^2, the per-symbol MSW of the stream.
    pub fn mean_power(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.sum_power / self.samples as f64
    }

    /// Variance of |RDS|.
    pub fn variance(&self) -> f64 {
        let mean = self.mean_magnitude();
        (self.mean_power() - mean * mean).max(0.0)
    }

    /// Largest |RDS| seen, i.e. the digital sum variation bound observed.
    pub fn peak(&self) -> f64 {
        self.peak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_alternating_stream() {
        let mut stats = RdsStatistics::new(Complex64::new(0.0, 0.0));
        let samples: Vec<_> = (0..100)
            .map(|i| Complex64::new(if i % 2 == 0 { 1.0 } else { -1.0 }, 0.0))
            .collect();
        stats.push(&samples);
        assert_eq!(stats.samples, 100);
        assert_eq!(stats.peak(), 1.0);
        assert!((stats.mean_magnitude() - 0.5).abs() < 1e-12);
        assert!((stats.variance() - 0.25).abs() < 1e-12);
        assert_eq!(stats.rds, Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_empty() {
        let stats = RdsStatistics::new(Complex64::new(1.0, 0.0));
        assert_eq!(stats.mean_magnitude(), 0.0);
        assert_eq!(stats.variance(), 0.0);
    }
}
