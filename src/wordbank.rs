use crate::word::Word;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_WORDBANK_FILE: &str = "5words.txt";

#[derive(Debug, Error)]
pub enum WordbankError {
    #[error("failed to read word list '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("word list '{}' contains no five letter words", .0.display())]
    Empty(PathBuf),
    #[error("no word list found; pass one with --input or place 5words.txt in the working directory")]
    NotFound,
}

/// Keep valid words in first-seen order, dropping repeats.
fn collect_words<I: IntoIterator<Item = String>>(lines: I) -> Vec<Word> {
    let mut seen = HashSet::new();
    lines
        .into_iter()
        .filter_map(|line| Word::parse(&line).ok())
        .filter(|word| seen.insert(*word))
        .collect()
}

pub fn load_wordbank_from_str(data: &str) -> Vec<Word> {
    collect_words(data.lines().map(str::to_string))
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Word>, WordbankError> {
    let path = path.as_ref();
    let io_err = |source: io::Error| WordbankError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<io::Result<Vec<String>>>()
        .map_err(io_err)?;
    let words = collect_words(lines);
    if words.is_empty() {
        return Err(WordbankError::Empty(path.to_path_buf()));
    }
    Ok(words)
}

/// Per-user fallback location, e.g. `~/.local/share/wordle-bot/5words.txt`.
pub fn get_data_wordbank_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("wordle-bot").join(DEFAULT_WORDBANK_FILE))
}

/// Pick the word list: an explicit path wins, then the working directory,
/// then the per-user data directory.
pub fn resolve_wordbank_path(explicit: Option<&Path>) -> Result<PathBuf, WordbankError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let local = PathBuf::from(DEFAULT_WORDBANK_FILE);
    if local.is_file() {
        return Ok(local);
    }
    get_data_wordbank_path()
        .filter(|path| path.is_file())
        .ok_or(WordbankError::NotFound)
}
