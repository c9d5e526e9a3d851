// Library interface for wordle-bot
// This allows integration tests to access internal modules

pub mod cli;
pub mod feedback;
pub mod filter;
pub mod game_state;
pub mod logging;
pub mod random;
pub mod transport;
pub mod word;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use feedback::{Feedback, Tag};
pub use filter::{CandidateFilter, ConstraintSet, FilterRules, filter_candidates};
pub use game_state::{GameSession, GameState, SessionEvents, SessionSummary, Step};
pub use transport::{GuessOutcome, GuessReply, PlayerId, ServerSignal, Transport};
pub use word::Word;
pub use wordbank::{load_wordbank_from_file, load_wordbank_from_str};
