pub mod search;

use crate::config::Session;
use crate::error::GsError;
use crate::field::Symbol;
use crate::scrambling::words::Word;
use crate::selection::Feedback;
pub use search::{Candidate, SearchContext};
use tracing::{debug, info, trace};

/// Where the encoder is in its per-codeword cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderState {
    /// Fewer than L - A data symbols are buffered.
    AwaitingData,
    /// All candidates for the buffered data are being scored.
    Searching,
    /// A winner has been chosen and its state is being committed.
    Committed,
}

/// Result of encoding one codeword.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    /// Winning candidate index in `[0, q^A)`.
    pub index: usize,
    pub cost: f64,
    pub codeword: Word,
    /// Metric state after this codeword.
    pub feedback: Feedback,
}

/// Guided scrambling encoder. Owns the scrambler register and the metric
/// feedback, both of which only ever advance to a winner's values.
#[derive(Clone, Debug)]
pub struct GuidedScrambler {
    session: Session,
    remainder: Word,
    feedback: Feedback,
    state: EncoderState,
    pending: Word,
    codewords: u64,
}

impl GuidedScrambler {
    pub fn new(session: Session) -> Self {
        info!(
            "Guided scrambler: {} candidates per codeword, {} worker thread(s)",
            session.candidates(),
            session.threads
        );
        Self {
            remainder: vec![0; session.scrambler.len() - 1],
            feedback: session.initial_feedback(),
            state: EncoderState::AwaitingData,
            pending: Word::with_capacity(session.data_length()),
            codewords: 0,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// Scrambler register the next codeword starts from.
    pub fn remainder(&self) -> &[Symbol] {
        &self.remainder
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Codewords emitted since construction or the last reset.
    pub fn codewords(&self) -> u64 {
        self.codewords
    }

    /// Back to the initial register and feedback; drops buffered data.
    pub fn reset(&mut self) {
        self.remainder.fill(0);
        self.feedback = self.session.initial_feedback();
        self.pending.clear();
        self.state = EncoderState::AwaitingData;
        self.codewords = 0;
    }

    fn check(&self, data: &[Symbol]) -> Result<(), GsError> {
        let expected = self.session.data_length();
        if data.len() != expected {
            return Err(GsError::BadInputLength {
                expected,
                actual: data.len(),
            });
        }
        let field = &self.session.field;
        match data.iter().position(|&s| !field.contains(s)) {
            Some(position) => Err(GsError::SymbolOutOfField {
                symbol: data[position],
                position,
                field_size: field.size(),
            }),
            None => Ok(()),
        }
    }

    fn context<'a>(&'a self, data: &'a [Symbol]) -> SearchContext<'a> {
        SearchContext {
            session: &self.session,
            data,
            remainder: &self.remainder,
            feedback: &self.feedback,
        }
    }

    /// Encodes one codeword from exactly L - A data symbols.
    pub fn scramble(&mut self, data: &[Symbol]) -> Result<Selection, GsError> {
        self.check(data)?;
        Ok(self.scramble_unchecked(data))
    }

    fn scramble_unchecked(&mut self, data: &[Symbol]) -> Selection {
        self.state = EncoderState::Searching;
        let winner = self.context(data).search();
        self.commit(winner)
    }

    fn commit(&mut self, winner: Candidate) -> Selection {
        self.state = EncoderState::Committed;
        self.remainder.copy_from_slice(&winner.remainder);
        self.feedback = winner.analysis.feedback;
        self.codewords += 1;
        debug!(
            codeword = self.codewords,
            index = winner.index,
            cost = winner.analysis.cost,
            "selected candidate"
        );
        self.state = EncoderState::AwaitingData;
        Selection {
            index: winner.index,
            cost: winner.analysis.cost,
            codeword: winner.codeword,
            feedback: winner.analysis.feedback,
        }
    }

    /// Streaming form. Buffers data across calls and returns the codewords
    /// completed by `symbols`, concatenated. Out-of-field symbols are rejected
    /// before anything is buffered.
    pub fn process(&mut self, symbols: &[Symbol]) -> Result<Word, GsError> {
        let field = &self.session.field;
        if let Some(position) = symbols.iter().position(|&s| !field.contains(s)) {
            return Err(GsError::SymbolOutOfField {
                symbol: symbols[position],
                position,
                field_size: field.size(),
            });
        }
        let data_length = self.session.data_length();
        let mut output = Word::new();
        for &symbol in symbols {
            self.pending.push(symbol);
            if self.pending.len() == data_length {
                let data = std::mem::take(&mut self.pending);
                output.extend(self.scramble_unchecked(&data).codeword);
                self.pending = data;
                self.pending.clear();
            }
        }
        trace!(buffered = self.pending.len(), "awaiting data");
        Ok(output)
    }

    /// Every candidate for `data` from the current state, in index order.
    /// Does not change the encoder.
    pub fn candidates(&self, data: &[Symbol]) -> Result<Vec<Candidate>, GsError> {
        self.check(data)?;
        Ok(self.context(data).enumerate())
    }

    /// Scrambles `data` with a caller-chosen candidate index and commits it,
    /// bypassing the search.
    pub fn force(&mut self, data: &[Symbol], index: usize) -> Result<Selection, GsError> {
        self.check(data)?;
        let candidates = self.session.candidates();
        if index >= candidates {
            return Err(GsError::BadCandidateIndex { index, candidates });
        }
        let candidate = self.context(data).evaluate(index);
        Ok(self.commit(candidate))
    }
}
