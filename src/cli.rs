use crate::feedback::Feedback;
use crate::filter::FilterRules;
use crate::game_state::{RestartReason, SessionEvents, SessionSummary, SkipReason};
use crate::transport::{DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS};
use crate::word::Word;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const INSTRUCTIONS: &str = "For every guessed word, the server provides feedback.
    g = Green (correct letter, correct position)
    y = Yellow (correct letter, wrong position)
    r = Red (letter not in the word)";

/// Wordle bot options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited word list
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<PathBuf>,

    /// Player name to register with
    #[arg(short, long, default_value = "supriya")]
    pub name: String,

    /// Game mode sent at registration
    #[arg(long, default_value = "wordle")]
    pub mode: String,

    /// Base URL of the game server
    #[arg(long, default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Seed for guess selection, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// How feedback with repeated letters is interpreted
    #[arg(long, value_enum, default_value_t = FilterRules::Counting)]
    pub rules: FilterRules,

    /// Guess candidates in word list order instead of shuffling
    #[arg(long)]
    pub no_shuffle: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

pub fn display_instructions() {
    println!("{INSTRUCTIONS}");
}

pub fn display_registered(name: &str, id: &str) {
    println!("Registered player '{name}' with ID: {id}");
}

pub fn display_summary(summary: &SessionSummary) {
    println!(
        "\nThe computer guessed the correct word '{}' in {} attempts!",
        summary.word, summary.attempts
    );
    if summary.games_played > 1 {
        println!(
            "({} games played, {} guesses in total.)",
            summary.games_played, summary.total_guesses
        );
    }
}

fn restart_text(reason: RestartReason) -> &'static str {
    match reason {
        RestartReason::PoolExhausted => "Ran out of candidate words, restarting game.",
        RestartReason::LimitExceeded => "Guess limit exceeded, restarting game.",
        RestartReason::NoActiveGame => "Server has no active game, restarting game.",
    }
}

fn skip_text(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Malformed => "Could not decode server reply",
        SkipReason::Network => "Request failed",
        SkipReason::InvalidFeedback => "Invalid feedback, skipping",
    }
}

/// Prints session progress to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl SessionEvents for ConsoleReporter {
    fn game_started(&mut self, pool_size: usize, created: bool) {
        if created {
            println!("New game started. Loaded {pool_size} words.");
        } else {
            println!("Game creation failed, playing on with {pool_size} words.");
        }
    }

    fn restarting(&mut self, reason: RestartReason) {
        println!("{}", restart_text(reason));
    }

    fn attempt(&mut self, number: u32, guess: &Word) {
        println!("\nAttempt {number}: Is it '{guess}'?");
    }

    fn server_message(&mut self, message: &str) {
        println!("Message: {message}");
    }

    fn feedback(&mut self, _guess: &Word, feedback: &Feedback) {
        println!("Feedback: {feedback}");
    }

    fn narrowed(&mut self, remaining: usize) {
        println!("Possible candidates ({remaining})");
    }

    fn skipped(&mut self, reason: SkipReason, detail: &str) {
        println!("{}: {detail}", skip_text(reason));
    }
}
