use std::process::ExitCode;

use wordle_bot::cli::{
    Cli, ConsoleReporter, display_instructions, display_registered, display_summary, parse_cli,
};
use wordle_bot::game_state::GameSession;
use wordle_bot::random::{RandomShuffler, Shuffler, Unshuffled};
use wordle_bot::transport::{HttpTransport, PlayerId, Transport};
use wordle_bot::word::Word;
use wordle_bot::wordbank::{load_wordbank_from_file, resolve_wordbank_path};

fn main() -> ExitCode {
    let cli = parse_cli();
    wordle_bot::logging::init_logging(cli.verbose);

    let words = match resolve_wordbank_path(cli.wordbank_path.as_deref())
        .and_then(load_wordbank_from_file)
    {
        Ok(words) => words,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Loaded {} words", words.len());

    let mut transport = match HttpTransport::new(&cli.server, cli.timeout()) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Error creating HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let player = match transport.register(&cli.mode, &cli.name) {
        Ok(player) => player,
        Err(e) => {
            log::error!("registration failed: {e}");
            eprintln!("Error registering player: {e}");
            return ExitCode::FAILURE;
        }
    };
    display_registered(&cli.name, player.as_str());

    if cli.no_shuffle {
        play(&cli, transport, player, &words, Unshuffled);
    } else {
        play(&cli, transport, player, &words, RandomShuffler::new(cli.seed));
    }
    ExitCode::SUCCESS
}

fn play<S: Shuffler>(cli: &Cli, transport: HttpTransport, player: PlayerId, words: &[Word], shuffler: S) {
    display_instructions();
    let mut session = GameSession::new(transport, player, words, shuffler, cli.rules)
        .with_events(ConsoleReporter);
    let summary = session.play_until_win();
    display_summary(&summary);
}
