// Candidate search: scramble the data under every augmenting assignment and
// keep the cheapest. Ranges of candidates can be farmed out to worker threads;
// the per-range winners are merged in index order so the outcome never
// depends on the thread count.

use crate::config::Session;
use crate::field::Symbol;
use crate::scrambling::scrambler::scramble_into;
use crate::scrambling::words::{Word, build_dividend};
use crate::selection::{Analysis, Feedback, improves};
use crate::utils::consts::MIN_CANDIDATES_PER_THREAD;
use std::ops::Range;
use tracing::{trace, warn};

/// One scrambled candidate together with the state it would commit.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub codeword: Word,
    /// Scrambler register after this codeword (zeros in block mode).
    pub remainder: Word,
    pub analysis: Analysis,
}

/// Immutable inputs shared by every candidate of one codeword.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub session: &'a Session,
    pub data: &'a [Symbol],
    pub remainder: &'a [Symbol],
    pub feedback: &'a Feedback,
}

/// Reusable buffers for evaluating candidates without allocating.
struct Scratch {
    dividend: Word,
    codeword: Word,
    remainder: Word,
}

impl Scratch {
    fn new(session: &Session) -> Self {
        Self {
            dividend: Word::with_capacity(session.codeword_length),
            codeword: Word::with_capacity(session.codeword_length),
            remainder: vec![0; session.scrambler.len() - 1],
        }
    }
}

impl SearchContext<'_> {
    fn evaluate_into(&self, index: usize, scratch: &mut Scratch) -> Analysis {
        let session = self.session;
        build_dividend(
            self.data,
            index,
            session.field_size(),
            session.augmenting_length,
            session.position,
            &mut scratch.dividend,
        );
        scratch.remainder.copy_from_slice(self.remainder);
        scramble_into(
            &session.field,
            &session.scrambler,
            &scratch.dividend,
            session.continuous,
            &mut scratch.codeword,
            &mut scratch.remainder,
        );
        session
            .method
            .analyze(&scratch.codeword, self.feedback, &session.constellation)
    }

    fn candidate(&self, index: usize, scratch: &Scratch, analysis: Analysis) -> Candidate {
        Candidate {
            index,
            codeword: scratch.codeword.clone(),
            remainder: scratch.remainder.clone(),
            analysis,
        }
    }

    /// Scrambles and scores a single candidate.
    pub fn evaluate(&self, index: usize) -> Candidate {
        let mut scratch = Scratch::new(self.session);
        let analysis = self.evaluate_into(index, &mut scratch);
        self.candidate(index, &scratch, analysis)
    }

    /// Every candidate in index order.
    pub fn enumerate(&self) -> Vec<Candidate> {
        let mut scratch = Scratch::new(self.session);
        (0..self.session.candidates())
            .map(|index| {
                let analysis = self.evaluate_into(index, &mut scratch);
                self.candidate(index, &scratch, analysis)
            })
            .collect()
    }

    /// Cheapest candidate in `range`, lowest index on ties. The range must
    /// not be empty.
    pub fn search_range(&self, range: Range<usize>) -> Candidate {
        let mut scratch = Scratch::new(self.session);
        let first = range.start;
        let analysis = self.evaluate_into(first, &mut scratch);
        let mut best = self.candidate(first, &scratch, analysis);
        for index in range.skip(1) {
            let analysis = self.evaluate_into(index, &mut scratch);
            trace!(index, cost = analysis.cost, "candidate");
            if improves(analysis.cost, best.analysis.cost) {
                best = self.candidate(index, &scratch, analysis);
            }
        }
        best
    }

    /// Cheapest candidate over the whole candidate set.
    pub fn search(&self) -> Candidate {
        let candidates = self.session.candidates();
        let threads = self
            .session
            .threads
            .min(candidates / MIN_CANDIDATES_PER_THREAD)
            .max(1);
        let best = if threads == 1 {
            self.search_range(0..candidates)
        } else {
            self.search_parallel(candidates, threads)
        };
        if !best.analysis.cost.is_finite() {
            warn!(
                index = best.index,
                "no candidate produced a finite cost, keeping the lowest index"
            );
        }
        best
    }

    fn search_parallel(&self, candidates: usize, threads: usize) -> Candidate {
        let chunk = candidates.div_ceil(threads);
        let (tx, rx) = crossbeam_channel::unbounded();
        std::thread::scope(|scope| {
            for (group, start) in (0..candidates).step_by(chunk).enumerate() {
                let tx = tx.clone();
                let end = (start + chunk).min(candidates);
                scope.spawn(move || {
                    let _ = tx.send((group, self.search_range(start..end)));
                });
            }
        });
        drop(tx);

        let mut winners: Vec<(usize, Candidate)> = rx.iter().collect();
        winners.sort_by_key(|(group, _)| *group);
        let mut winners = winners.into_iter().map(|(_, candidate)| candidate);
        let mut best = match winners.next() {
            Some(candidate) => candidate,
            None => return self.search_range(0..candidates),
        };
        for candidate in winners {
            if improves(candidate.analysis.cost, best.analysis.cost) {
                best = candidate;
            }
        }
        best
    }
}
