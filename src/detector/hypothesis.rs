use crate::config::Session;
use crate::field::Symbol;
use crate::scrambling::scrambler::{divide_step, divide_step_inverse};
use crate::scrambling::words::{Word, index_to_augmenting};
use crate::signal::constellation::nearest;
use num_complex::Complex64;

/// The best reading of one received window under a fixed augmenting index.
#[derive(Clone, Debug, PartialEq)]
pub struct Hypothesis {
    pub index: usize,
    /// Squared Euclidean distance between the window and the re-encoded
    /// codeword.
    pub distance: f64,
    /// Recovered data segment.
    pub data: Word,
    /// Codeword the encoder would have sent for this reading.
    pub codeword: Word,
    /// Scrambler register after the codeword.
    pub remainder: Word,
}

/// Walks the window once under augmenting index `index`, starting from
/// `remainder`. Augmenting positions are driven forward through the
/// scrambler; data positions take the nearest constellation point as the
/// scrambled symbol and run the step backwards to recover the data symbol.
pub fn walk(
    session: &Session,
    samples: &[Complex64],
    remainder: &[Symbol],
    index: usize,
) -> Hypothesis {
    let field = &session.field;
    let divider = &session.scrambler;
    let constellation = &session.constellation;
    let length = session.codeword_length;
    let augmenting_range = session
        .position
        .augmenting_range(length, session.augmenting_length);

    let mut register = if session.continuous {
        remainder.to_vec()
    } else {
        vec![0; divider.len() - 1]
    };
    let mut augmenting = vec![0; session.augmenting_length];
    index_to_augmenting(index, field.size(), &mut augmenting);

    let mut data = Word::with_capacity(session.data_length());
    let mut codeword = Word::with_capacity(length);
    let mut distance = 0.0;
    for (position, &sample) in samples.iter().enumerate() {
        let output = if augmenting_range.contains(&position) {
            let input = augmenting[position - augmenting_range.start];
            divide_step(field, divider, &mut register, input)
        } else {
            let output = nearest(constellation, sample);
            data.push(divide_step_inverse(field, divider, &mut register, output));
            output
        };
        distance += (sample - constellation[output as usize]).norm_sqr();
        codeword.push(output);
    }
    if !session.continuous {
        register.fill(0);
    }

    Hypothesis {
        index,
        distance,
        data,
        codeword,
        remainder: register,
    }
}
