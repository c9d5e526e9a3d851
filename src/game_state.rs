use crate::feedback::Feedback;
use crate::filter::{CandidateFilter, ConstraintSet, FilterRules};
use crate::random::Shuffler;
use crate::transport::{GuessOutcome, PlayerId, ServerSignal, Transport};
use crate::word::Word;
use crate::{debug_log, info_log};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    /// Every candidate was ruled out
    PoolExhausted,
    LimitExceeded,
    NoActiveGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The reply body was not JSON
    Malformed,
    Network,
    /// Feedback missing, not five tags long, or carrying an unknown tag
    InvalidFeedback,
}

/// Result of one iteration of the guess loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Restarted(RestartReason),
    Skipped(SkipReason),
    Narrowed { remaining: usize },
    Won(Word),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub word: Word,
    /// Guesses in the winning game only
    pub attempts: u32,
    pub games_played: u32,
    pub total_guesses: u64,
}

/// Receives progress notifications from a [`GameSession`].
///
/// Every method has an empty default so implementors pick what they show.
pub trait SessionEvents {
    fn game_started(&mut self, _pool_size: usize, _created: bool) {}
    fn restarting(&mut self, _reason: RestartReason) {}
    fn attempt(&mut self, _number: u32, _guess: &Word) {}
    fn server_message(&mut self, _message: &str) {}
    fn feedback(&mut self, _guess: &Word, _feedback: &Feedback) {}
    fn narrowed(&mut self, _remaining: usize) {}
    fn skipped(&mut self, _reason: SkipReason, _detail: &str) {}
    fn won(&mut self, _word: &Word, _attempts: u32) {}
}

impl SessionEvents for () {}

impl<E: SessionEvents + ?Sized> SessionEvents for &mut E {
    fn game_started(&mut self, pool_size: usize, created: bool) {
        (**self).game_started(pool_size, created);
    }
    fn restarting(&mut self, reason: RestartReason) {
        (**self).restarting(reason);
    }
    fn attempt(&mut self, number: u32, guess: &Word) {
        (**self).attempt(number, guess);
    }
    fn server_message(&mut self, message: &str) {
        (**self).server_message(message);
    }
    fn feedback(&mut self, guess: &Word, feedback: &Feedback) {
        (**self).feedback(guess, feedback);
    }
    fn narrowed(&mut self, remaining: usize) {
        (**self).narrowed(remaining);
    }
    fn skipped(&mut self, reason: SkipReason, detail: &str) {
        (**self).skipped(reason, detail);
    }
    fn won(&mut self, word: &Word, attempts: u32) {
        (**self).won(word, attempts);
    }
}

/// Drives guess, feedback and filtering against a server until a word is found.
///
/// The session never gives up: transport failures and bad feedback skip a
/// turn, and a server-ended game or an exhausted pool starts a new game with
/// the full word list.
pub struct GameSession<'w, T, S, E = ()> {
    transport: T,
    player: PlayerId,
    words: &'w [Word],
    shuffler: S,
    events: E,
    filter: CandidateFilter,
    pool: Vec<Word>,
    attempts: u32,
    current_guess: Option<Word>,
    solution: Option<Word>,
    games_played: u32,
    total_guesses: u64,
}

impl<'w, T: Transport, S: Shuffler> GameSession<'w, T, S> {
    pub fn new(
        transport: T,
        player: PlayerId,
        words: &'w [Word],
        shuffler: S,
        rules: FilterRules,
    ) -> Self {
        Self {
            transport,
            player,
            words,
            shuffler,
            events: (),
            filter: CandidateFilter::new(rules),
            pool: words.to_vec(),
            attempts: 0,
            current_guess: None,
            solution: None,
            games_played: 0,
            total_guesses: 0,
        }
    }
}

impl<'w, T: Transport, S: Shuffler, E: SessionEvents> GameSession<'w, T, S, E> {
    pub fn with_events<E2: SessionEvents>(self, events: E2) -> GameSession<'w, T, S, E2> {
        GameSession {
            transport: self.transport,
            player: self.player,
            words: self.words,
            shuffler: self.shuffler,
            events,
            filter: self.filter,
            pool: self.pool,
            attempts: self.attempts,
            current_guess: self.current_guess,
            solution: self.solution,
            games_played: self.games_played,
            total_guesses: self.total_guesses,
        }
    }

    pub fn state(&self) -> GameState {
        if self.solution.is_some() {
            GameState::Won
        } else {
            GameState::Playing
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn pool(&self) -> &[Word] {
        &self.pool
    }

    pub fn constraints(&self) -> &ConstraintSet {
        self.filter.constraints()
    }

    pub fn current_guess(&self) -> Option<&Word> {
        self.current_guess.as_ref()
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn total_guesses(&self) -> u64 {
        self.total_guesses
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ask the server for a new game and reset all per-game state.
    ///
    /// A failed create request is logged but not fatal; the server is
    /// expected to accept guesses once a later create succeeds.
    pub fn start_game(&mut self) {
        let created = match self.transport.create_game(&self.player) {
            Ok(()) => {
                log::info!("New game started for player {}", self.player);
                true
            }
            Err(e) => {
                log::warn!("Game creation failed: {e}");
                false
            }
        };
        self.pool = self.words.to_vec();
        self.filter.reset();
        self.attempts = 0;
        self.current_guess = None;
        self.solution = None;
        self.games_played += 1;
        self.events.game_started(self.pool.len(), created);
    }

    fn restart(&mut self, reason: RestartReason) -> Step {
        log::info!("Restarting game: {reason:?}");
        self.events.restarting(reason);
        self.start_game();
        Step::Restarted(reason)
    }

    fn skip(&mut self, reason: SkipReason, detail: &str) -> Step {
        log::warn!("Skipping attempt {} ({reason:?}): {detail}", self.attempts);
        self.events.skipped(reason, detail);
        Step::Skipped(reason)
    }

    /// Run one iteration of the guess loop.
    pub fn step(&mut self) -> Step {
        if let Some(word) = self.solution {
            return Step::Won(word);
        }
        if self.pool.is_empty() {
            return self.restart(RestartReason::PoolExhausted);
        }

        self.shuffler.shuffle(&mut self.pool);
        let guess = self.pool.remove(0);
        self.attempts += 1;
        self.total_guesses += 1;
        self.current_guess = Some(guess);
        self.events.attempt(self.attempts, &guess);
        debug_log!("attempt {}: guessing {guess}, {} left in pool", self.attempts, self.pool.len());

        let reply = match self.transport.submit_guess(&self.player, &guess) {
            GuessOutcome::Reply(reply) => reply,
            GuessOutcome::Malformed { body } => return self.skip(SkipReason::Malformed, &body),
            GuessOutcome::NetworkFailure { reason } => {
                return self.skip(SkipReason::Network, &reason);
            }
        };

        if let Some(message) = &reply.message {
            self.events.server_message(message);
        }
        match reply.signal {
            ServerSignal::LimitExceeded => return self.restart(RestartReason::LimitExceeded),
            ServerSignal::NoActiveGame => return self.restart(RestartReason::NoActiveGame),
            ServerSignal::Normal => {}
        }

        let feedback = match reply.feedback.as_deref().map(Feedback::parse) {
            Some(Ok(feedback)) => feedback,
            Some(Err(e)) => return self.skip(SkipReason::InvalidFeedback, &e.to_string()),
            None => return self.skip(SkipReason::InvalidFeedback, "no feedback in reply"),
        };
        self.events.feedback(&guess, &feedback);

        if feedback.is_win() {
            self.solution = Some(guess);
            log::info!("Solved '{guess}' in {} attempts", self.attempts);
            self.events.won(&guess, self.attempts);
            return Step::Won(guess);
        }

        let pool = std::mem::take(&mut self.pool);
        self.pool = self.filter.apply(&guess, &feedback, pool);
        info_log!("{} candidates remain after {guess} {feedback}", self.pool.len());
        self.events.narrowed(self.pool.len());
        Step::Narrowed {
            remaining: self.pool.len(),
        }
    }

    /// Keep stepping until the word is found.
    pub fn run_loop(&mut self) -> SessionSummary {
        loop {
            if let Step::Won(word) = self.step() {
                return SessionSummary {
                    word,
                    attempts: self.attempts,
                    games_played: self.games_played,
                    total_guesses: self.total_guesses,
                };
            }
        }
    }

    /// Start a game, then play until the word is found.
    pub fn play_until_win(&mut self) -> SessionSummary {
        self.start_game();
        self.run_loop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Unshuffled;
    use crate::transport::{GuessReply, TransportError};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct ScriptedTransport {
        replies: VecDeque<GuessOutcome>,
        guesses: Vec<String>,
        games_created: usize,
        fail_create: bool,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<GuessOutcome>) -> Self {
            Self {
                replies: replies.into(),
                ..Self::default()
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn register(&mut self, _mode: &str, _name: &str) -> Result<PlayerId, TransportError> {
            PlayerId::new("player-1")
        }

        fn create_game(&mut self, _player: &PlayerId) -> Result<(), TransportError> {
            self.games_created += 1;
            if self.fail_create {
                Err(TransportError::Status(500))
            } else {
                Ok(())
            }
        }

        fn submit_guess(&mut self, _player: &PlayerId, guess: &Word) -> GuessOutcome {
            self.guesses.push(guess.to_string());
            self.replies
                .pop_front()
                .unwrap_or_else(|| GuessOutcome::NetworkFailure {
                    reason: "script exhausted".to_string(),
                })
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl SessionEvents for Recorder {
        fn restarting(&mut self, reason: RestartReason) {
            self.events.push(format!("restart {reason:?}"));
        }
        fn skipped(&mut self, reason: SkipReason, _detail: &str) {
            self.events.push(format!("skip {reason:?}"));
        }
        fn won(&mut self, word: &Word, attempts: u32) {
            self.events.push(format!("won {word} {attempts}"));
        }
    }

    fn words(list: &[&str]) -> Vec<Word> {
        list.iter().map(|w| Word::parse(w).unwrap()).collect()
    }

    fn feedback(tags: &str) -> GuessOutcome {
        GuessOutcome::Reply(GuessReply::new(Some(tags.to_string()), None))
    }

    fn message(text: &str) -> GuessOutcome {
        GuessOutcome::Reply(GuessReply::new(None, Some(text.to_string())))
    }

    fn player() -> PlayerId {
        PlayerId::new("player-1").unwrap()
    }

    #[test]
    fn test_all_green_wins_and_stops_guessing() {
        let list = words(&["crane", "slate", "trace"]);
        let mut transport = ScriptedTransport::new(vec![feedback("GGGGG")]);
        let mut session =
            GameSession::new(&mut transport, player(), &list, Unshuffled, FilterRules::Counting);
        session.start_game();

        let crane = Word::parse("crane").unwrap();
        assert_eq!(session.step(), Step::Won(crane));
        assert_eq!(session.state(), GameState::Won);
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.step(), Step::Won(crane));
        drop(session);
        assert_eq!(transport.guesses, vec!["crane"]);
    }

    #[test]
    fn test_guess_leaves_pool_before_feedback() {
        let list = words(&["crane", "slate", "trace"]);
        let transport = ScriptedTransport::new(vec![feedback("ggrr")]);
        let mut session =
            GameSession::new(transport, player(), &list, Unshuffled, FilterRules::Counting);
        session.start_game();

        assert_eq!(session.step(), Step::Skipped(SkipReason::InvalidFeedback));
        assert_eq!(session.pool(), words(&["slate", "trace"]).as_slice());
        assert_eq!(session.current_guess(), Some(&list[0]));
        assert_eq!(session.attempts(), 1);
        assert!(session.constraints().is_empty());
    }

    #[test]
    fn test_unparsable_reply_is_skipped() {
        let list = words(&["crane", "slate", "trace"]);
        let transport = ScriptedTransport::new(vec![
            GuessOutcome::Malformed {
                body: "<html>".to_string(),
            },
            GuessOutcome::NetworkFailure {
                reason: "connection reset".to_string(),
            },
        ]);
        let mut session =
            GameSession::new(transport, player(), &list, Unshuffled, FilterRules::Counting);
        session.start_game();

        assert_eq!(session.step(), Step::Skipped(SkipReason::Malformed));
        assert_eq!(session.step(), Step::Skipped(SkipReason::Network));
        assert_eq!(session.pool(), words(&["trace"]).as_slice());
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn test_missing_feedback_is_invalid() {
        let list = words(&["crane", "slate"]);
        let transport = ScriptedTransport::new(vec![message("keep going"), feedback("ggzgg")]);
        let mut session =
            GameSession::new(transport, player(), &list, Unshuffled, FilterRules::Counting);
        session.start_game();

        assert_eq!(session.step(), Step::Skipped(SkipReason::InvalidFeedback));
        assert_eq!(session.step(), Step::Skipped(SkipReason::InvalidFeedback));
        assert!(session.pool().is_empty());
    }

    #[test]
    fn test_server_limit_restarts_game() {
        let list = words(&["crane", "slate", "trace"]);
        let mut transport = ScriptedTransport::new(vec![
            feedback("rrrrr"),
            message("Guess limit exceeded"),
            message("No game in progress"),
        ]);
        let mut recorder = Recorder::default();
        let mut session =
            GameSession::new(&mut transport, player(), &list, Unshuffled, FilterRules::Counting)
                .with_events(&mut recorder);
        session.start_game();

        // crane rrrrr rules out slate and trace too
        assert_eq!(session.step(), Step::Narrowed { remaining: 0 });
        assert_eq!(session.step(), Step::Restarted(RestartReason::PoolExhausted));
        assert_eq!(session.step(), Step::Restarted(RestartReason::LimitExceeded));
        assert_eq!(session.pool().len(), list.len());
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.state(), GameState::Playing);
        assert!(session.constraints().is_empty());
        assert_eq!(session.step(), Step::Restarted(RestartReason::NoActiveGame));
        assert_eq!(session.games_played(), 4);
        assert_eq!(session.total_guesses(), 3);
        drop(session);

        assert_eq!(transport.games_created, 4);
        assert_eq!(
            recorder.events,
            vec![
                "restart PoolExhausted",
                "restart LimitExceeded",
                "restart NoActiveGame"
            ]
        );
    }

    #[test]
    fn test_start_game_resets_state() {
        let list = words(&["brain", "grain", "train", "plain"]);
        let transport = ScriptedTransport::new(vec![feedback("rgggg")]);
        let mut session =
            GameSession::new(transport, player(), &list, Unshuffled, FilterRules::Counting);
        session.start_game();
        assert_eq!(session.step(), Step::Narrowed { remaining: 2 });
        assert!(!session.constraints().is_empty());

        session.start_game();
        assert_eq!(session.pool(), list.as_slice());
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.state(), GameState::Playing);
        assert!(session.constraints().is_empty());
        assert_eq!(session.current_guess(), None);
    }

    #[test]
    fn test_failed_create_is_not_fatal() {
        let list = words(&["crane"]);
        let mut transport = ScriptedTransport::new(vec![feedback("ggggg")]);
        transport.fail_create = true;
        let mut session =
            GameSession::new(transport, player(), &list, Unshuffled, FilterRules::Counting);

        let summary = session.play_until_win();
        assert_eq!(summary.word.as_str(), "crane");
        assert_eq!(session.transport().games_created, 1);
    }

    #[test]
    fn test_run_loop_follows_shuffle_order() {
        let list = words(&["crane", "slate", "giant", "plant"]);
        let mut transport =
            ScriptedTransport::new(vec![feedback("rrggr"), feedback("rrggg"), feedback("ggggg")]);
        let mut recorder = Recorder::default();
        let mut session =
            GameSession::new(&mut transport, player(), &list, Unshuffled, FilterRules::Presence)
                .with_events(&mut recorder);

        let summary = session.play_until_win();
        assert_eq!(summary.word.as_str(), "plant");
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.games_played, 1);
        assert_eq!(summary.total_guesses, 3);
        drop(session);

        assert_eq!(transport.guesses, vec!["crane", "giant", "plant"]);
        assert_eq!(recorder.events, vec!["won plant 3"]);
    }
}
