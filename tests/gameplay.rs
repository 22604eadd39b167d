// Native end-to-end runs of the game loop. Nothing here touches wasm or the
// browser: sound goes to a recording board and frames are driven by hand.

use undyne_duel::{GameConfig, GameError};
use undyne_duel::assets::{Sound, SoundBoard};
use undyne_duel::attack::Direction;
use undyne_duel::game::{GameHandler, Key, Phase};
use undyne_duel::speech::TextState;

#[derive(Default)]
struct Board {
    played: Vec<Sound>,
    stopped: Vec<Sound>,
}

impl SoundBoard for Board {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }
    fn stop(&mut self, sound: Sound) {
        self.stopped.push(sound);
    }
}

const LEVEL: &str = r#"{
    "intro": [{ "text": "En garde!", "face": "smirk" }],
    "outro": [{ "text": "Fine. You win." }],
    "defeat": [{ "text": "Too slow!", "face": "angry" }],
    "attacks": [
        { "name": "left jab", "arrows": [{ "from": "left", "speed": 1000 }] },
        { "name": "double", "arrows": [
            { "from": "left", "speed": 1000 },
            { "from": "left", "delay_ms": 100, "speed": 1000 }
        ], "cooldown_ms": 50 }
    ]
}"#;

fn run(game: &mut GameHandler, board: &mut Board, ms: f64) {
    let mut t = 0.0;
    while t < ms {
        game.update(16.0, board);
        t += 16.0;
    }
}

fn press_play(game: &mut GameHandler, board: &mut Board) {
    let (x, y) = game.play_button().rect().center();
    game.pointer_down(x, y, board);
}

/// Types out and acknowledges whatever is in the bubble.
fn read_dialogue(game: &mut GameHandler, board: &mut Board) {
    run(game, board, 2_000.0);
    assert_eq!(game.speech().state(), TextState::Waiting);
    game.key_down(Key::Z, board);
}

#[test]
fn blocking_every_arrow_wins() {
    let mut board = Board::default();
    let mut game = GameHandler::from_json(&GameConfig::default(), LEVEL, "easy").unwrap();
    game.start(&mut board);
    assert_eq!(game.phase(), Phase::Title);
    assert_eq!(board.played, vec![Sound::IntroBgm]);

    press_play(&mut game, &mut board);
    assert_eq!(game.phase(), Phase::Intro);
    assert!(board.stopped.contains(&Sound::IntroBgm));

    read_dialogue(&mut game, &mut board);
    assert_eq!(game.phase(), Phase::Fighting);
    assert!(board.played.contains(&Sound::UndyneEasyBgm));
    game.key_down(Key::Arrow(Direction::Left), &mut board);

    run(&mut game, &mut board, 3_000.0);
    assert_eq!(game.phase(), Phase::Outro);
    assert!(game.attacks().is_exhausted());
    let blocks = board.played.iter().filter(|s| **s == Sound::ArrowBlockedSfx).count();
    assert_eq!(blocks, 3);
    assert_eq!(game.health(), 8);
    assert_eq!(game.score(), 3 * 100 + 8 * 50);

    read_dialogue(&mut game, &mut board);
    assert_eq!(game.phase(), Phase::Victory);
    assert!(game.retry_button().is_visible());
}

#[test]
fn losing_then_retrying_starts_over() {
    let mut board = Board::default();
    let mut game = GameHandler::from_json(&GameConfig::default(), LEVEL, "hard").unwrap();
    game.start(&mut board);
    press_play(&mut game, &mut board);
    read_dialogue(&mut game, &mut board);

    // shield faces away from every arrow
    game.key_down(Key::Arrow(Direction::Right), &mut board);
    run(&mut game, &mut board, 3_000.0);
    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(game.health(), 0);
    assert!(board.stopped.contains(&Sound::UndyneHardBgm));

    read_dialogue(&mut game, &mut board);
    assert!(game.retry_button().is_visible());
    // Z confirms the visible retry button
    game.key_down(Key::Z, &mut board);
    assert_eq!(game.phase(), Phase::Intro);
    assert_eq!(game.health(), 3);
    assert_eq!(game.score(), 0);
    assert_eq!(game.attacks().cursor(), 0);
    assert!(!game.retry_button().is_visible());
}

#[test]
fn bad_input_is_rejected_up_front() {
    let config = GameConfig::default();
    assert!(GameHandler::from_json(&config, LEVEL, "nightmare").is_err());
    assert!(GameHandler::from_json(&config, "{ not json", "easy").is_err());
    // an arrow that never moves would hold the fight open forever
    let stalled = r#"{ "attacks": [{ "arrows": [{ "from": "left", "speed": 0 }] }] }"#;
    assert!(matches!(
        GameHandler::from_json(&config, stalled, "easy"),
        Err(GameError::InvalidLevel(_))
    ));
}
