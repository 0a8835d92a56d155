use crate::field::Symbol;
use serde::Serialize;

/// Running symbol error tally between a reference and a recovered stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ErrorCount {
    pub symbols: u64,
    pub errors: u64,
}

impl ErrorCount {
    /// Compares the overlapping prefix of both streams and returns the number
    /// of mismatches found.
    pub fn compare(&mut self, expected: &[Symbol], actual: &[Symbol]) -> u64 {
        let errors = expected
            .iter()
            .zip(actual)
            .filter(|(a, b)| a != b)
            .count() as u64;
        self.symbols += expected.len().min(actual.len()) as u64;
        self.errors += errors;
        errors
    }

    pub fn rate(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            self.errors as f64 / self.symbols as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_mismatches() {
        let mut count = ErrorCount::default();
        assert_eq!(count.compare(&[0, 1, 2, 3], &[0, 1, 3, 3]), 1);
        assert_eq!(count.compare(&[1, 1], &[0, 0, 9]), 2);
        assert_eq!(count.symbols, 6);
        assert_eq!(count.errors, 3);
        assert!((count.rate() - 0.5).abs() < 1e-12);
        count.reset();
        assert_eq!(count.rate(), 0.0);
    }
}
