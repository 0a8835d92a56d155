use super::scrambler::validate_polynomial;
use super::words::{augmenting_to_index, AugmentingPosition, Word};
use crate::error::{ConfigError, GsError};
use crate::field::{GaloisField, Symbol};
use std::sync::Arc;
use tracing::trace;

/// Multiplies `multiplicand` by `multiplier`. `register` holds the last
/// `multiplier.len() - 1` multiplicand symbols of the previous word (oldest
/// first); it is refilled from this word's tail when `continuous` is set.
pub fn multiply(
    field: &GaloisField,
    multiplier: &[Symbol],
    multiplicand: &[Symbol],
    product: &mut Word,
    register: &mut [Symbol],
    continuous: bool,
) {
    let memory = register.len();
    product.clear();
    product.extend((0..multiplicand.len()).map(|i| {
        (0..=memory).fold(0, |output, j| {
            let input = if i + j < memory {
                register[i + j]
            } else {
                multiplicand[i + j - memory]
            };
            field.add(output, field.mul(input, multiplier[memory - j]))
        })
    }));
    if continuous {
        if multiplicand.len() >= memory {
            register.copy_from_slice(&multiplicand[multiplicand.len() - memory..]);
        } else {
            register.rotate_left(multiplicand.len());
            register[memory - multiplicand.len()..].copy_from_slice(multiplicand);
        }
    }
}

/// Output of one descrambled codeword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descrambled {
    /// The recovered data segment.
    pub data: Word,
    /// Candidate index the encoder selected for this codeword.
    pub augmenting_index: usize,
}

/// Recovers source data from scrambled codewords by multiplying them with the
/// scrambling polynomial.
#[derive(Clone, Debug)]
pub struct Descrambler {
    field: Arc<GaloisField>,
    multiplier: Arc<[Symbol]>,
    register: Word,
    continuous: bool,
    codeword_length: usize,
    augmenting_length: usize,
    position: AugmentingPosition,
    codeword: Word,
    product: Word,
}

impl Descrambler {
    pub fn new(
        field: Arc<GaloisField>,
        multiplier: Arc<[Symbol]>,
        continuous: bool,
        codeword_length: usize,
        augmenting_length: usize,
        position: AugmentingPosition,
    ) -> Result<Self, ConfigError> {
        validate_polynomial(&field, &multiplier)?;
        if augmenting_length < 1 {
            return Err(ConfigError::AugmentingLengthTooSmall);
        }
        if augmenting_length >= codeword_length {
            return Err(ConfigError::AugmentingCodewordLengthMismatch {
                codeword: codeword_length,
                augmenting: augmenting_length,
            });
        }
        let register = vec![0; multiplier.len() - 1];
        Ok(Self {
            field,
            multiplier,
            register,
            continuous,
            codeword_length,
            augmenting_length,
            position,
            codeword: Word::with_capacity(codeword_length),
            product: Word::with_capacity(codeword_length),
        })
    }

    pub fn data_length(&self) -> usize {
        self.codeword_length - self.augmenting_length
    }

    /// Clears the register and any partially received codeword. This is the
    /// restart marker for a continuous-mode session.
    pub fn reset(&mut self) {
        self.register.fill(0);
        self.codeword.clear();
    }

    /// Descrambles exactly one codeword.
    pub fn descramble(&mut self, codeword: &[Symbol]) -> Result<Descrambled, GsError> {
        if codeword.len() != self.codeword_length {
            return Err(GsError::BadInputLength {
                expected: self.codeword_length,
                actual: codeword.len(),
            });
        }
        self.check_symbols(codeword)?;
        Ok(self.descramble_unchecked(codeword))
    }

    fn check_symbols(&self, symbols: &[Symbol]) -> Result<(), GsError> {
        match symbols.iter().position(|&s| !self.field.contains(s)) {
            Some(position) => Err(GsError::SymbolOutOfField {
                symbol: symbols[position],
                position,
                field_size: self.field.size(),
            }),
            None => Ok(()),
        }
    }

    fn descramble_unchecked(&mut self, codeword: &[Symbol]) -> Descrambled {
        if !self.continuous {
            self.register.fill(0);
        }
        multiply(
            &self.field,
            &self.multiplier,
            codeword,
            &mut self.product,
            &mut self.register,
            self.continuous,
        );
        let augmenting = &self.product[self
            .position
            .augmenting_range(self.codeword_length, self.augmenting_length)];
        let augmenting_index = augmenting_to_index(augmenting, self.field.size());
        let data = self.product[self
            .position
            .data_range(self.codeword_length, self.augmenting_length)]
            .to_vec();
        trace!(augmenting_index, "descrambled codeword");
        Descrambled {
            data,
            augmenting_index,
        }
    }

    /// Streaming form: buffers partial codewords across calls and returns the
    /// data of every codeword completed by `symbols`. A slice holding an
    /// out-of-field symbol is rejected whole and leaves the state untouched.
    pub fn process(&mut self, symbols: &[Symbol]) -> Result<Word, GsError> {
        self.check_symbols(symbols)?;
        let mut output = Word::new();
        for &symbol in symbols {
            self.codeword.push(symbol);
            if self.codeword.len() == self.codeword_length {
                let codeword = std::mem::take(&mut self.codeword);
                output.extend(self.descramble_unchecked(&codeword).data);
                self.codeword = codeword;
                self.codeword.clear();
            }
        }
        Ok(output)
    }
}
