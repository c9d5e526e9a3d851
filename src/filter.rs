//! Candidate filtering.
//!
//! Every piece of feedback is folded into a [`ConstraintSet`], and the
//! candidate pool is narrowed to the words the set still admits. Within one
//! game the set only ever grows, so filtering an already filtered pool with the
//! same feedback is a no-op.
//!
//! Two rule sets are supported:
//! - [`FilterRules::Presence`] tracks letters only as present or absent. A Red
//!   tag bans the letter from the whole word even when another occurrence of
//!   the same letter was Green or Yellow, so guesses with repeated letters can
//!   wrongly eliminate the answer.
//! - [`FilterRules::Counting`] tracks a minimum and maximum occurrence count per
//!   letter, derived from how many Green and Yellow tags the letter earned.

use crate::debug_log;
use crate::feedback::{Feedback, Tag};
use crate::word::{WORD_LENGTH, Word};

const ALPHABET: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FilterRules {
    /// Presence/absence per letter, no occurrence counts
    Presence,
    /// Minimum and maximum occurrence counts per letter
    #[default]
    Counting,
}

/// What is known about one letter of the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterBounds {
    pub min: usize,
    pub max: usize,
    pub excluded: [bool; WORD_LENGTH],
}

impl LetterBounds {
    const UNKNOWN: Self = Self {
        min: 0,
        max: WORD_LENGTH,
        excluded: [false; WORD_LENGTH],
    };

    fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

/// Accumulated knowledge from every feedback seen in the current game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    fixed: [Option<u8>; WORD_LENGTH],
    letters: [LetterBounds; ALPHABET],
    contradiction: bool,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintSet {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fixed: [None; WORD_LENGTH],
            letters: [LetterBounds::UNKNOWN; ALPHABET],
            contradiction: false,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.contradiction
            && self.fixed.iter().all(Option::is_none)
            && self.letters.iter().all(LetterBounds::is_unknown)
    }

    /// Letter known to sit at `position`, if any.
    #[must_use]
    pub fn fixed(&self, position: usize) -> Option<u8> {
        self.fixed[position]
    }

    #[must_use]
    pub fn bounds(&self, letter: u8) -> &LetterBounds {
        &self.letters[index(letter)]
    }

    /// Merge the constraints implied by `feedback` for `guess`.
    pub fn record(&mut self, guess: &Word, feedback: &Feedback, rules: FilterRules) {
        for i in 0..WORD_LENGTH {
            if feedback.tag(i) == Tag::Green {
                self.fix(i, guess.letter(i));
            }
        }
        match rules {
            FilterRules::Presence => self.record_presence(guess, feedback),
            FilterRules::Counting => self.record_counts(guess, feedback),
        }
    }

    fn fix(&mut self, position: usize, letter: u8) {
        match self.fixed[position] {
            Some(existing) if existing != letter => self.contradiction = true,
            _ => self.fixed[position] = Some(letter),
        }
    }

    fn record_presence(&mut self, guess: &Word, feedback: &Feedback) {
        for (i, &letter) in guess.letters().iter().enumerate() {
            let bounds = &mut self.letters[index(letter)];
            match feedback.tag(i) {
                Tag::Green => {}
                Tag::Yellow => {
                    bounds.min = bounds.min.max(1);
                    bounds.excluded[i] = true;
                }
                Tag::Red => bounds.max = 0,
            }
        }
    }

    fn record_counts(&mut self, guess: &Word, feedback: &Feedback) {
        for (i, &letter) in guess.letters().iter().enumerate() {
            if feedback.tag(i) != Tag::Green {
                self.letters[index(letter)].excluded[i] = true;
            }
        }
        for &letter in guess.letters() {
            let mut hits = 0;
            let mut capped = false;
            for (i, &other) in guess.letters().iter().enumerate() {
                if other != letter {
                    continue;
                }
                match feedback.tag(i) {
                    Tag::Green | Tag::Yellow => hits += 1,
                    Tag::Red => capped = true,
                }
            }
            let bounds = &mut self.letters[index(letter)];
            bounds.min = bounds.min.max(hits);
            if capped {
                bounds.max = bounds.max.min(hits);
            }
        }
    }

    /// Whether `word` satisfies every recorded constraint.
    #[must_use]
    pub fn admits(&self, word: &Word) -> bool {
        if self.contradiction {
            return false;
        }
        for (i, fixed) in self.fixed.iter().enumerate() {
            if let Some(letter) = fixed
                && word.letter(i) != *letter
            {
                return false;
            }
        }
        for (idx, bounds) in self.letters.iter().enumerate() {
            if bounds.is_unknown() {
                continue;
            }
            let letter = b'a' + idx as u8;
            let count = word.count(letter);
            if count < bounds.min || count > bounds.max {
                return false;
            }
            if (0..WORD_LENGTH).any(|i| bounds.excluded[i] && word.letter(i) == letter) {
                return false;
            }
        }
        true
    }
}

fn index(letter: u8) -> usize {
    (letter - b'a') as usize
}

/// Narrows a candidate pool game by game, remembering constraints between guesses.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    rules: FilterRules,
    constraints: ConstraintSet,
}

impl CandidateFilter {
    #[must_use]
    pub fn new(rules: FilterRules) -> Self {
        Self {
            rules,
            constraints: ConstraintSet::new(),
        }
    }

    #[must_use]
    pub fn rules(&self) -> FilterRules {
        self.rules
    }

    #[must_use]
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Forget everything learned; called when a new game starts.
    pub fn reset(&mut self) {
        self.constraints.clear();
    }

    /// Record `feedback` for `guess` and keep only the words of `pool` that
    /// are consistent with everything learned so far. Relative order is kept.
    pub fn apply(&mut self, guess: &Word, feedback: &Feedback, mut pool: Vec<Word>) -> Vec<Word> {
        debug_log!("filter: applying {guess} {feedback} to {} candidates", pool.len());
        self.constraints.record(guess, feedback, self.rules);
        pool.retain(|word| self.constraints.admits(word));
        pool
    }
}

/// Stateless filter over a slice, for callers that hold no [`CandidateFilter`].
#[must_use]
pub fn filter_candidates(
    candidates: &[Word],
    guess: &Word,
    feedback: &Feedback,
    rules: FilterRules,
) -> Vec<Word> {
    let mut constraints = ConstraintSet::new();
    constraints.record(guess, feedback, rules);
    candidates
        .iter()
        .filter(|word| constraints.admits(word))
        .copied()
        .collect()
}
