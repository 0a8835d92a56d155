use crate::error::ConfigError;
use crate::field::Symbol;
use rand::SeedableRng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;

/// Random source symbols drawn from a weighted distribution over GF(q).
#[derive(Clone, Debug)]
pub struct SymbolGenerator {
    weightings: Vec<f64>,
    distribution: WeightedIndex<f64>,
    rng: StdRng,
}

impl SymbolGenerator {
    /// Equiprobable symbols.
    pub fn uniform(field_size: u8, seed: u64) -> Result<Self, ConfigError> {
        Self::new(vec![1.0; field_size as usize], seed)
    }

    /// `weightings[s]` is the relative probability of symbol `s`.
    pub fn new(weightings: Vec<f64>, seed: u64) -> Result<Self, ConfigError> {
        if weightings.len() > Symbol::MAX as usize + 1 {
            return Err(ConfigError::BadWeightings(format!(
                "{} weightings exceed the symbol range",
                weightings.len()
            )));
        }
        let distribution = WeightedIndex::new(&weightings)
            .map_err(|e| ConfigError::BadWeightings(e.to_string()))?;
        Ok(Self {
            weightings,
            distribution,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn weightings(&self) -> &[f64] {
        &self.weightings
    }

    pub fn fill(&mut self, symbols: &mut [Symbol]) {
        for symbol in symbols {
            *symbol = self.distribution.sample(&mut self.rng) as Symbol;
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<Symbol> {
        let mut symbols = vec![0; count];
        self.fill(&mut symbols);
        symbols
    }
}
