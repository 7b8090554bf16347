use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::models::{Participant, Roster, Round};

/// Random source for one run
///
/// Built once from the configured seed and passed to every shuffle, so a
/// fixed seed reproduces the same roster and table order.
#[derive(Debug, Clone)]
pub struct RunRng {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl RunRng {
    /// Seeded when `seed` is given, otherwise seeded from the thread RNG
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self { rng, seed }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Fisher-Yates shuffle in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Copy of the roster in a random order
    pub fn shuffle_roster(&mut self, roster: &Roster) -> Roster {
        let mut participants: Vec<Participant> = roster.participants().to_vec();
        self.shuffle(&mut participants);
        Roster::from_validated(participants)
    }

    /// Copy of the round with its tables in a random order
    pub fn shuffle_tables(&mut self, round: &Round) -> Round {
        let mut pairs = round.pairs().to_vec();
        self.shuffle(&mut pairs);
        Round::from_parts(pairs, round.leftovers().to_vec())
    }
}
