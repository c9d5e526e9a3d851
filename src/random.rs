//! Shuffle sources for guess selection.
//!
//! The session shuffles its candidate pool before taking the next guess from
//! the front. The source is a trait so a run can be reproduced from a seed, or
//! made fully deterministic in tests.

use crate::word::Word;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub trait Shuffler {
    fn shuffle(&mut self, words: &mut [Word]);
}

/// Pseudo-random shuffling backed by [`StdRng`].
pub struct RandomShuffler {
    rng: StdRng,
}

impl RandomShuffler {
    /// `Some(seed)` gives a reproducible sequence, `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl Shuffler for RandomShuffler {
    fn shuffle(&mut self, words: &mut [Word]) {
        words.shuffle(&mut self.rng);
    }
}

/// Leaves the pool in its current order.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unshuffled;

impl Shuffler for Unshuffled {
    fn shuffle(&mut self, _words: &mut [Word]) {}
}
