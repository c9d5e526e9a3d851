use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

pub const WORD_LENGTH: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordError {
    #[error("expected 5 letters, got {0}")]
    Length(usize),
    #[error("'{0}' is not an ASCII letter")]
    NonAlphabetic(char),
}

/// A five letter word, stored lowercase.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word([u8; WORD_LENGTH]);

impl Word {
    pub fn parse(input: &str) -> Result<Self, WordError> {
        let trimmed = input.trim();
        let count = trimmed.chars().count();
        if count != WORD_LENGTH {
            return Err(WordError::Length(count));
        }
        let mut letters = [0u8; WORD_LENGTH];
        for (slot, c) in letters.iter_mut().zip(trimmed.chars()) {
            if !c.is_ascii_alphabetic() {
                return Err(WordError::NonAlphabetic(c));
            }
            *slot = c.to_ascii_lowercase() as u8;
        }
        Ok(Self(letters))
    }

    #[must_use]
    pub fn letter(&self, index: usize) -> u8 {
        self.0[index]
    }

    #[must_use]
    pub fn letters(&self) -> &[u8; WORD_LENGTH] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, letter: u8) -> bool {
        self.0.contains(&letter)
    }

    #[must_use]
    pub fn count(&self, letter: u8) -> usize {
        self.0.iter().filter(|&&b| b == letter).count()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.as_str())
    }
}

impl std::str::FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
