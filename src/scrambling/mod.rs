pub mod descrambler;
pub mod primitives;
pub mod scrambler;
pub mod words;

pub use descrambler::{Descrambled, Descrambler};
pub use primitives::{find_primitive, is_primitive, primitives, trinomial};
pub use scrambler::Scrambler;
pub use words::{AugmentingPosition, Word};
