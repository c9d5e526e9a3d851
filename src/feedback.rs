//! Per-letter verdicts returned by the server for a guess.
//!
//! The server encodes feedback as a five character string such as `"rygrg"`,
//! one tag per guessed letter. Parsing is case-insensitive; anything that is
//! not exactly five known tags is rejected so the session can discard it.

use crate::word::WORD_LENGTH;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("feedback must have 5 tags, got {0}")]
    Length(usize),
    #[error("unknown feedback tag '{0}'")]
    Tag(char),
}

/// Verdict for a single letter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Correct letter in the correct position
    Green,
    /// Letter is in the word but somewhere else
    Yellow,
    /// Letter is not in the word
    Red,
}

impl Tag {
    /// Parse from a character (g=green, y=yellow, r=red; x and b also mean red)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'g' => Some(Tag::Green),
            'y' => Some(Tag::Yellow),
            'r' | 'x' | 'b' => Some(Tag::Red),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Tag::Green => 'g',
            Tag::Yellow => 'y',
            Tag::Red => 'r',
        }
    }
}

/// Five tags aligned with the letters of the guess they describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Feedback([Tag; WORD_LENGTH]);

impl Feedback {
    pub const fn new(tags: [Tag; WORD_LENGTH]) -> Self {
        Self(tags)
    }

    pub fn parse(input: &str) -> Result<Self, FeedbackError> {
        let trimmed = input.trim();
        let count = trimmed.chars().count();
        if count != WORD_LENGTH {
            return Err(FeedbackError::Length(count));
        }
        let mut tags = [Tag::Red; WORD_LENGTH];
        for (slot, c) in tags.iter_mut().zip(trimmed.chars()) {
            *slot = Tag::from_char(c).ok_or(FeedbackError::Tag(c))?;
        }
        Ok(Self(tags))
    }

    pub fn tags(&self) -> &[Tag; WORD_LENGTH] {
        &self.0
    }

    pub fn tag(&self, index: usize) -> Tag {
        self.0[index]
    }

    pub fn is_win(&self) -> bool {
        self.0.iter().all(|&t| t == Tag::Green)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in self.0 {
            write!(f, "{}", tag.to_char())?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Feedback {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
