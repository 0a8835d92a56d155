//! Guided scrambling line coding over GF(q) with a matching sequence
//! detector.
//!
//! A [`config::GsConfig`] is validated once into a [`config::Session`], which
//! is then shared by the [`guided::GuidedScrambler`] (encoder), the
//! [`scrambling::Descrambler`] and the [`detector::Detector`].

pub mod config;
pub mod detector;
pub mod error;
pub mod field;
pub mod guided;
pub mod scrambling;
pub mod selection;
pub mod signal;
pub mod simulation;
pub mod ui;
pub mod utils;

pub use config::{GsConfig, Session};
pub use detector::{Detection, Detector};
pub use error::{ConfigError, GsError};
pub use field::{GaloisField, Symbol};
pub use guided::{GuidedScrambler, Selection};
pub use scrambling::{Descrambler, Word, find_primitive};
pub use selection::{Analysis, Feedback, SelectionMethod};
