use super::words::Word;
use crate::error::ConfigError;
use crate::field::{GaloisField, Symbol};
use std::sync::Arc;

/// Checks that `polynomial` can drive the scrambling LFSR.
pub fn validate_polynomial(
    field: &GaloisField,
    polynomial: &[Symbol],
) -> Result<(), ConfigError> {
    if polynomial.len() < 2 {
        return Err(ConfigError::DivisorLengthTooSmall(polynomial.len()));
    }
    if let Some(&symbol) = polynomial.iter().find(|&&s| !field.contains(s)) {
        return Err(ConfigError::SymbolOutOfField {
            symbol: symbol.into(),
            field_size: field.size().into(),
        });
    }
    if polynomial[0] == 0 {
        return Err(ConfigError::ZeroLeadingCoefficient);
    }
    Ok(())
}

/// One step of division by `divider`: consumes the dividend symbol `input`,
/// returns the quotient symbol and advances `remainder`.
#[inline]
pub fn divide_step(
    field: &GaloisField,
    divider: &[Symbol],
    remainder: &mut [Symbol],
    input: Symbol,
) -> Symbol {
    let output = field.div(field.add(input, remainder[0]), divider[0]);
    shift(field, divider, remainder, output);
    output
}

/// Runs the division step backwards: forces the quotient symbol `output` and
/// returns the dividend symbol that produces it. Advances `remainder` exactly
/// as [`divide_step`] would have.
#[inline]
pub fn divide_step_inverse(
    field: &GaloisField,
    divider: &[Symbol],
    remainder: &mut [Symbol],
    output: Symbol,
) -> Symbol {
    let input = field.sub(field.mul(output, divider[0]), remainder[0]);
    shift(field, divider, remainder, output);
    input
}

#[inline]
fn shift(field: &GaloisField, divider: &[Symbol], remainder: &mut [Symbol], output: Symbol) {
    let last = remainder.len() - 1;
    for j in 1..=last {
        remainder[j - 1] =
            field.add(field.mul(output, field.neg(divider[j])), remainder[j]);
    }
    remainder[last] = field.mul(output, field.neg(divider[last + 1]));
}

/// Divides a whole dividend, writing the quotient into `quotient`.
pub fn divide(
    field: &GaloisField,
    divider: &[Symbol],
    dividend: &[Symbol],
    quotient: &mut Word,
    remainder: &mut [Symbol],
) {
    quotient.clear();
    quotient.extend(
        dividend
            .iter()
            .map(|&input| divide_step(field, divider, remainder, input)),
    );
}

/// One scrambling pass over a whole dividend. Block mode clears `remainder`
/// before the division and again after it, so nothing carries over.
pub fn scramble_into(
    field: &GaloisField,
    divider: &[Symbol],
    dividend: &[Symbol],
    continuous: bool,
    quotient: &mut Word,
    remainder: &mut [Symbol],
) {
    if !continuous {
        remainder.fill(0);
    }
    divide(field, divider, dividend, quotient, remainder);
    if !continuous {
        remainder.fill(0);
    }
}

/// Pure form of one scrambling pass: returns the scrambled codeword and the
/// register to carry into the next codeword. In block mode the incoming
/// register is ignored and the returned one is all zeros.
pub fn encode(
    field: &GaloisField,
    divider: &[Symbol],
    dividend: &[Symbol],
    continuous: bool,
    state: &[Symbol],
) -> (Word, Word) {
    let mut remainder = if continuous {
        state.to_vec()
    } else {
        vec![0; divider.len() - 1]
    };
    let mut quotient = Word::with_capacity(dividend.len());
    scramble_into(field, divider, dividend, continuous, &mut quotient, &mut remainder);
    (quotient, remainder)
}

/// Feedback scrambler: divides every dividend by the scrambling polynomial.
#[derive(Clone, Debug)]
pub struct Scrambler {
    field: Arc<GaloisField>,
    divider: Arc<[Symbol]>,
    remainder: Word,
    continuous: bool,
}

impl Scrambler {
    pub fn new(
        field: Arc<GaloisField>,
        divider: Arc<[Symbol]>,
        continuous: bool,
    ) -> Result<Self, ConfigError> {
        validate_polynomial(&field, &divider)?;
        let remainder = vec![0; divider.len() - 1];
        Ok(Self {
            field,
            divider,
            remainder,
            continuous,
        })
    }

    /// Register contents the next codeword starts from.
    pub fn remainder(&self) -> &[Symbol] {
        &self.remainder
    }

    pub fn reset(&mut self) {
        self.remainder.fill(0);
    }

    /// Scrambles one dividend. Block mode starts every call from a zeroed
    /// register.
    pub fn scramble(&mut self, dividend: &[Symbol], output: &mut Word) {
        scramble_into(
            &self.field,
            &self.divider,
            dividend,
            self.continuous,
            output,
            &mut self.remainder,
        );
    }
}
