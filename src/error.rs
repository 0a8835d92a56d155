use thiserror::Error;

/// Rejected session parameters. Raised once, when a session is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported field size {0} (expected 2, 4, 8 or 16)")]
    BadFieldSize(u32),

    #[error("codeword length {0} is too short (need at least 2)")]
    CodewordTooShort(usize),

    #[error("augmenting length must be at least 1")]
    AugmentingLengthTooSmall,

    #[error(
        "augmenting length {augmenting} must be smaller than codeword length {codeword}"
    )]
    AugmentingCodewordLengthMismatch { codeword: usize, augmenting: usize },

    #[error("scrambling polynomial needs at least 2 coefficients, got {0}")]
    DivisorLengthTooSmall(usize),

    #[error("scrambling polynomial has a zero leading coefficient")]
    ZeroLeadingCoefficient,

    #[error("symbol {symbol} is outside GF({field_size})")]
    SymbolOutOfField { symbol: u32, field_size: u32 },

    #[error("unknown selection method '{0}' (expected MSW, WRDS or MSW2)")]
    BadSelectionMethod(String),

    #[error("constellation has {points} points but the field has {field_size} elements")]
    BadConstellation { points: usize, field_size: u32 },

    #[error("noise power {0} must be finite and non-negative")]
    BadNoisePower(f64),

    #[error("invalid symbol weightings: {0}")]
    BadWeightings(String),

    #[error("{0} candidates do not fit the search index space")]
    TooManyCandidates(u128),

    #[error("no primitive polynomial of degree {length} over GF({field_size})")]
    NoPrimitive { field_size: u32, length: usize },

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime rejections of malformed input handed to a one-shot call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GsError {
    #[error("expected {expected} symbols, got {actual}")]
    BadInputLength { expected: usize, actual: usize },

    #[error("symbol {symbol} at position {position} is outside GF({field_size})")]
    SymbolOutOfField {
        symbol: u8,
        position: usize,
        field_size: u8,
    },

    #[error("candidate index {index} is outside [0, {candidates})")]
    BadCandidateIndex { index: usize, candidates: usize },
}
