use crate::error::ConfigError;
use crate::field::Symbol;
use num_complex::Complex64;
use std::f64::consts::PI;
use std::sync::Arc;

/// Default mapping of field elements to the complex plane for each supported
/// field size. Unsupported sizes yield an empty constellation.
pub fn default_constellation(field_size: u8) -> Vec<Complex64> {
    match field_size {
        2 => vec![Complex64::new(-1.0, 0.0), Complex64::new(1.0, 0.0)],
        4 => vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(-1.0, 0.0),
        ],
        8 => (0..8)
            .map(|k| Complex64::from_polar(1.0, 2.0 * PI * k as f64 / 8.0))
            .collect(),
        16 => {
            const LEVELS: [f64; 4] = [-3.0, -1.0, 1.0, 3.0];
            (0..16)
                .map(|k| Complex64::new(LEVELS[k % 4], LEVELS[k / 4]))
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Index of the constellation point closest to `sample`. Ties resolve to the
/// lower index.
pub fn nearest(constellation: &[Complex64], sample: Complex64) -> Symbol {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (symbol, &point) in constellation.iter().enumerate() {
        let distance = (sample - point).norm_sqr();
        if distance < best_distance {
            best = symbol;
            best_distance = distance;
        }
    }
    best as Symbol
}

/// Maps field elements onto constellation points and back.
#[derive(Clone, Debug)]
pub struct SymbolMapper {
    constellation: Arc<[Complex64]>,
}

impl SymbolMapper {
    pub fn new(constellation: Arc<[Complex64]>, field_size: u8) -> Result<Self, ConfigError> {
        if constellation.len() != field_size as usize {
            return Err(ConfigError::BadConstellation {
                points: constellation.len(),
                field_size: field_size.into(),
            });
        }
        Ok(Self { constellation })
    }

    pub fn map(&self, symbols: &[Symbol]) -> Vec<Complex64> {
        symbols
            .iter()
            .map(|&s| self.constellation[s as usize])
            .collect()
    }

    /// Hard decision for each sample.
    pub fn slice(&self, samples: &[Complex64]) -> Vec<Symbol> {
        samples
            .iter()
            .map(|&sample| nearest(&self.constellation, sample))
            .collect()
    }

    /// Mean energy per point.
    pub fn average_energy(&self) -> f64 {
        self.constellation.iter().map(|p| p.norm_sqr()).sum::<f64>()
            / self.constellation.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        for q in [2u8, 4, 8, 16] {
            assert_eq!(default_constellation(q).len(), q as usize);
        }
        assert!(default_constellation(3).is_empty());
    }

    #[test]
    fn test_qam16_layout() {
        let points = default_constellation(16);
        assert_eq!(points[0], Complex64::new(-3.0, -3.0));
        assert_eq!(points[6], Complex64::new(1.0, -1.0));
        assert_eq!(points[15], Complex64::new(3.0, 3.0));
    }

    #[test]
    fn test_psk8_unit_circle() {
        for point in default_constellation(8) {
            assert!((point.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_slice_inverts_map() {
        for q in [2u8, 4, 8, 16] {
            let mapper = SymbolMapper::new(default_constellation(q).into(), q).unwrap();
            let symbols: Vec<Symbol> = (0..q).collect();
            assert_eq!(mapper.slice(&mapper.map(&symbols)), symbols);
        }
    }

    #[test]
    fn test_nearest_with_offset() {
        let points = default_constellation(4);
        assert_eq!(nearest(&points, Complex64::new(0.2, 0.7)), 1);
        assert_eq!(nearest(&points, Complex64::new(-0.9, 0.1)), 3);
    }

    #[test]
    fn test_average_energy() {
        let energy = |q: u8| {
            SymbolMapper::new(default_constellation(q).into(), q)
                .unwrap()
                .average_energy()
        };
        assert_eq!(energy(2), 1.0);
        assert_eq!(energy(4), 1.0);
        assert!((energy(8) - 1.0).abs() < 1e-12);
        assert_eq!(energy(16), 10.0);
    }

    #[test]
    fn test_rejects_wrong_point_count() {
        assert!(matches!(
            SymbolMapper::new(default_constellation(4).into(), 8),
            Err(ConfigError::BadConstellation {
                points: 4,
                field_size: 8
            })
        ));
    }
}
