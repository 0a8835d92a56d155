use crate::error::ConfigError;
use crate::field::{GaloisField, Symbol};
use crate::scrambling::primitives::find_primitive;
use crate::scrambling::scrambler::validate_polynomial;
use crate::scrambling::words::AugmentingPosition;
use crate::selection::{Feedback, SelectionMethod};
use crate::signal::constellation::default_constellation;
use crate::utils::consts::*;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Session parameters as read from JSON or the command line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GsConfig {
    pub field_size: u32,
    pub codeword_length: usize,
    pub augmenting_length: usize,
    /// Carry the scrambler register across codewords.
    pub continuous: bool,
    /// Scrambling polynomial, leading coefficient first. `None` picks the
    /// first primitive polynomial of degree 5.
    pub scrambler: Option<Vec<u32>>,
    pub selection_method: String,
    /// Points as `[re, im]`, indexed by field element.
    pub constellation: Option<Vec<[f64; 2]>>,
    pub augmenting_position: AugmentingPosition,
    pub starting_rds: [f64; 2],
    /// Worker threads for the candidate search; 0 or 1 searches inline.
    pub threads: usize,
}

impl Default for GsConfig {
    fn default() -> Self {
        Self {
            field_size: DEFAULT_FIELD_SIZE,
            codeword_length: DEFAULT_CODEWORD_LENGTH,
            augmenting_length: DEFAULT_AUGMENTING_LENGTH,
            continuous: true,
            scrambler: None,
            selection_method: SelectionMethod::default().to_string(),
            constellation: None,
            augmenting_position: AugmentingPosition::default(),
            starting_rds: DEFAULT_STARTING_RDS,
            threads: 1,
        }
    }
}

impl GsConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Checks every parameter and resolves the defaults that depend on the
    /// field size.
    pub fn validate(&self) -> Result<Session, ConfigError> {
        let field = Arc::new(GaloisField::new(self.field_size)?);
        let q = field.size();

        if self.codeword_length < 2 {
            return Err(ConfigError::CodewordTooShort(self.codeword_length));
        }
        if self.augmenting_length < 1 {
            return Err(ConfigError::AugmentingLengthTooSmall);
        }
        if self.augmenting_length >= self.codeword_length {
            return Err(ConfigError::AugmentingCodewordLengthMismatch {
                codeword: self.codeword_length,
                augmenting: self.augmenting_length,
            });
        }
        let candidates = u32::try_from(self.augmenting_length)
            .ok()
            .and_then(|a| u128::from(q).checked_pow(a))
            .unwrap_or(u128::MAX);
        if candidates > MAX_CANDIDATES {
            return Err(ConfigError::TooManyCandidates(candidates));
        }

        let scrambler: Vec<Symbol> = match &self.scrambler {
            Some(polynomial) => polynomial
                .iter()
                .map(|&c| {
                    Symbol::try_from(c).map_err(|_| ConfigError::SymbolOutOfField {
                        symbol: c,
                        field_size: self.field_size,
                    })
                })
                .collect::<Result<_, _>>()?,
            None => find_primitive(self.field_size, DEFAULT_SCRAMBLER_DEGREE)?,
        };
        validate_polynomial(&field, &scrambler)?;

        let method: SelectionMethod = self.selection_method.parse()?;

        let constellation: Vec<Complex64> = match &self.constellation {
            Some(points) => points
                .iter()
                .map(|&[re, im]| Complex64::new(re, im))
                .collect(),
            None => default_constellation(q),
        };
        if constellation.len() != q as usize {
            return Err(ConfigError::BadConstellation {
                points: constellation.len(),
                field_size: self.field_size,
            });
        }

        let session = Session {
            field,
            codeword_length: self.codeword_length,
            augmenting_length: self.augmenting_length,
            continuous: self.continuous,
            scrambler: scrambler.into(),
            method,
            constellation: constellation.into(),
            position: self.augmenting_position,
            starting_rds: Complex64::new(self.starting_rds[0], self.starting_rds[1]),
            threads: self.threads.max(1),
        };
        info!(
            "Session: GF({}), L={}, A={}, {} mode, {} selection, scrambler {}",
            q,
            session.codeword_length,
            session.augmenting_length,
            if session.continuous { "continuous" } else { "block" },
            session.method,
            crate::scrambling::words::to_string(&session.scrambler),
        );
        Ok(session)
    }
}

/// Validated, immutable session parameters shared by the encoder and the
/// detector.
#[derive(Clone, Debug)]
pub struct Session {
    pub field: Arc<GaloisField>,
    pub codeword_length: usize,
    pub augmenting_length: usize,
    pub continuous: bool,
    pub scrambler: Arc<[Symbol]>,
    pub method: SelectionMethod,
    pub constellation: Arc<[Complex64]>,
    pub position: AugmentingPosition,
    pub starting_rds: Complex64,
    pub threads: usize,
}

impl Session {
    pub fn field_size(&self) -> u8 {
        self.field.size()
    }

    pub fn data_length(&self) -> usize {
        self.codeword_length - self.augmenting_length
    }

    /// q^A. Bounded at validation.
    pub fn candidates(&self) -> usize {
        (self.field.size() as usize).pow(self.augmenting_length as u32)
    }

    pub fn initial_feedback(&self) -> Feedback {
        Feedback::new(self.starting_rds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let session = GsConfig::default().validate().unwrap();
        assert_eq!(session.field_size(), 4);
        assert_eq!(session.candidates(), 64);
        assert_eq!(session.data_length(), 9);
        assert_eq!(session.scrambler.len(), 6);
        assert_eq!(session.scrambler[0], 1);
        assert_eq!(session.method, SelectionMethod::Msw);
        assert_eq!(session.starting_rds, Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_parses_json() {
        let json = r#"{
            "field_size": 2,
            "codeword_length": 4,
            "augmenting_length": 1,
            "continuous": false,
            "scrambler": [1, 1],
            "selection_method": "WRDS",
            "augmenting_position": "trailing"
        }"#;
        let config: GsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.threads, 1);
        let session = config.validate().unwrap();
        assert_eq!(&*session.scrambler, &[1, 1]);
        assert_eq!(session.method, SelectionMethod::Wrds);
        assert_eq!(session.position, AugmentingPosition::Trailing);
        assert!(!session.continuous);
    }

    #[test]
    fn test_rejections() {
        let base = GsConfig {
            field_size: 2,
            codeword_length: 4,
            augmenting_length: 1,
            scrambler: Some(vec![1, 1]),
            ..GsConfig::default()
        };
        let check = |config: GsConfig| config.validate().unwrap_err();

        assert!(matches!(
            check(GsConfig { field_size: 3, ..base.clone() }),
            ConfigError::BadFieldSize(3)
        ));
        assert!(matches!(
            check(GsConfig { codeword_length: 1, ..base.clone() }),
            ConfigError::CodewordTooShort(1)
        ));
        assert!(matches!(
            check(GsConfig { augmenting_length: 0, ..base.clone() }),
            ConfigError::AugmentingLengthTooSmall
        ));
        assert!(matches!(
            check(GsConfig { augmenting_length: 4, ..base.clone() }),
            ConfigError::AugmentingCodewordLengthMismatch { .. }
        ));
        assert!(matches!(
            check(GsConfig { scrambler: Some(vec![1]), ..base.clone() }),
            ConfigError::DivisorLengthTooSmall(1)
        ));
        assert!(matches!(
            check(GsConfig { scrambler: Some(vec![0, 1]), ..base.clone() }),
            ConfigError::ZeroLeadingCoefficient
        ));
        assert!(matches!(
            check(GsConfig { scrambler: Some(vec![1, 2]), ..base.clone() }),
            ConfigError::SymbolOutOfField { symbol: 2, .. }
        ));
        assert!(matches!(
            check(GsConfig { scrambler: Some(vec![1, 300]), ..base.clone() }),
            ConfigError::SymbolOutOfField { symbol: 300, .. }
        ));
        assert!(matches!(
            check(GsConfig { selection_method: "RDS".into(), ..base.clone() }),
            ConfigError::BadSelectionMethod(_)
        ));
        assert!(matches!(
            check(GsConfig { constellation: Some(vec![[1.0, 0.0]]), ..base.clone() }),
            ConfigError::BadConstellation { points: 1, .. }
        ));
        assert!(matches!(
            check(GsConfig {
                field_size: 16,
                codeword_length: 40,
                augmenting_length: 8,
                scrambler: None,
                ..base
            }),
            ConfigError::TooManyCandidates(_)
        ));
    }
}
