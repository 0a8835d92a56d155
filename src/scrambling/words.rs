use crate::field::Symbol;
use serde::{Deserialize, Serialize};

/// A sequence of field elements: a codeword, a dividend or a polynomial
/// (leading coefficient first).
pub type Word = Vec<Symbol>;

/// Where the augmenting segment sits inside the scrambler's dividend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AugmentingPosition {
    /// Augmenting symbols precede the data, so they steer every scrambled
    /// symbol of the codeword.
    #[default]
    Leading,
    /// Data followed by augmenting symbols.
    Trailing,
}

impl AugmentingPosition {
    /// Range of dividend positions holding the augmenting segment.
    pub fn augmenting_range(
        self,
        codeword_length: usize,
        augmenting_length: usize,
    ) -> std::ops::Range<usize> {
        match self {
            Self::Leading => 0..augmenting_length,
            Self::Trailing => codeword_length - augmenting_length..codeword_length,
        }
    }

    /// Range of dividend positions holding the data segment.
    pub fn data_range(
        self,
        codeword_length: usize,
        augmenting_length: usize,
    ) -> std::ops::Range<usize> {
        match self {
            Self::Leading => augmenting_length..codeword_length,
            Self::Trailing => 0..codeword_length - augmenting_length,
        }
    }
}

/// q^A, or `None` if it does not fit a `usize`.
pub fn candidate_count(field_size: u8, augmenting_length: usize) -> Option<usize> {
    let exponent = u32::try_from(augmenting_length).ok()?;
    (field_size as usize).checked_pow(exponent)
}

/// Writes the base-q digits of `index` into `augmenting`, most significant
/// digit first.
pub fn index_to_augmenting(mut index: usize, field_size: u8, augmenting: &mut [Symbol]) {
    let q = field_size as usize;
    for digit in augmenting.iter_mut().rev() {
        *digit = (index % q) as Symbol;
        index /= q;
    }
}

/// Inverse of [`index_to_augmenting`].
pub fn augmenting_to_index(augmenting: &[Symbol], field_size: u8) -> usize {
    augmenting
        .iter()
        .fold(0usize, |index, &digit| index * field_size as usize + digit as usize)
}

/// Assembles a full dividend from a data segment and a candidate index.
pub fn build_dividend(
    data: &[Symbol],
    index: usize,
    field_size: u8,
    augmenting_length: usize,
    position: AugmentingPosition,
    dividend: &mut Word,
) {
    let length = data.len() + augmenting_length;
    dividend.resize(length, 0);
    dividend[position.data_range(length, augmenting_length)].copy_from_slice(data);
    index_to_augmenting(
        index,
        field_size,
        &mut dividend[position.augmenting_range(length, augmenting_length)],
    );
}

/// Renders a word as a compact digit string, e.g. `[1,0,1,1]` -> `1011`.
pub fn to_string(word: &[Symbol]) -> String {
    word.iter()
        .map(|&symbol| {
            char::from_digit(symbol as u32, 36).unwrap_or('?')
        })
        .collect()
}
