/// Log level (overridden by RUST_LOG)
pub const LOG_LEVEL: &str = "info";

// ============================================================================
// Session defaults
// ============================================================================

/// Field size q
pub const DEFAULT_FIELD_SIZE: u32 = 4;

/// Codeword length L (data + augmenting)
pub const DEFAULT_CODEWORD_LENGTH: usize = 12;

/// Augmenting segment length A
pub const DEFAULT_AUGMENTING_LENGTH: usize = 3;

/// Degree of the scrambling polynomial picked when none is configured
pub const DEFAULT_SCRAMBLER_DEGREE: usize = 5;

/// Running digital sum before the first codeword (real, imaginary)
pub const DEFAULT_STARTING_RDS: [f64; 2] = [1.0, 0.0];

/// Upper bound on q^A; larger candidate sets are rejected at validation
pub const MAX_CANDIDATES: u128 = 1 << 24;

/// Below this many candidates per worker the search stays on one thread
pub const MIN_CANDIDATES_PER_THREAD: usize = 64;

// ============================================================================
// Simulation defaults
// ============================================================================

/// Symbol generator seed
pub const DEFAULT_SEED: u64 = 1984;

/// Codewords processed by one simulation run
pub const DEFAULT_WORDS: usize = 10_000;

/// Codewords averaged into the detector's measured noise power
pub const DEFAULT_WINDOW_SIZE: usize = 16;
