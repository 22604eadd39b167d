// Level and configuration parsing, plus the attack cursor and asset gate as a
// loader would drive them.

use undyne_duel::GameConfig;
use undyne_duel::assets::manifest::{AUDIO_MANIFEST, TEXTURE_MANIFEST};
use undyne_duel::assets::{AssetGate, GateStatus, LoadKind, ReadinessPoll};
use undyne_duel::attack::{AttackManager, Difficulty, Direction, LevelData};
use undyne_duel::error::GameError;
use undyne_duel::speech::Face;

#[test]
fn level_json_fills_defaults() {
    let level = LevelData::from_json(
        r#"{ "attacks": [{ "arrows": [{ "from": "down", "speed": 250 }] }],
             "intro": [{ "text": "Hi", "face": "annoyed" }] }"#,
    )
    .unwrap();
    let arrow = &level.attacks[0].arrows[0];
    assert_eq!(arrow.from, Direction::Down);
    assert_eq!(arrow.delay_ms, 0.0);
    assert_eq!(arrow.damage, 1);
    assert_eq!(level.intro[0].face, Some(Face::Annoyed));
    assert!(level.outro.is_empty() && level.defeat.is_empty());
}

#[test]
fn unknown_direction_is_a_parse_error() {
    let err = LevelData::from_json(r#"{ "attacks": [{ "arrows": [{ "from": "north", "speed": 1 }] }] }"#)
        .unwrap_err();
    assert!(matches!(err, GameError::LevelParse(_)));
}

#[test]
fn attack_manager_walks_then_stays_exhausted() {
    let level = LevelData::from_json(
        r#"{ "attacks": [
            { "name": "a", "arrows": [] },
            { "name": "b", "arrows": [] },
            { "name": "c", "arrows": [] }
        ] }"#,
    )
    .unwrap();
    let mut attacks = AttackManager::new(level.attacks);
    for expected in ["a", "b", "c"] {
        assert_eq!(attacks.next_attack().map(|a| a.name.as_str()), Some(expected));
    }
    assert!(attacks.next_attack().is_none());
    assert!(attacks.next_attack().is_none());
    assert_eq!(attacks.cursor(), 3);
    attacks.reset();
    assert_eq!(attacks.remaining(), 3);
    assert_eq!(attacks.next_attack().map(|a| a.name.as_str()), Some("a"));
}

#[test]
fn difficulty_names_parse_loosely() {
    assert_eq!(" Hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    assert!(matches!("".parse::<Difficulty>(), Err(GameError::InvalidDifficulty(_))));
}

#[test]
fn partial_config_keeps_defaults() {
    let config = GameConfig::from_json(r#"{ "chars_per_sec": 40, "asset_poll_max_attempts": 3 }"#).unwrap();
    assert_eq!(config.chars_per_sec, 40.0);
    assert_eq!(config.asset_poll_max_attempts, Some(3));
    assert_eq!(config.game_width, GameConfig::default().game_width);
}

#[test]
fn gate_opens_once_every_preload_reports() {
    let mut gate = AssetGate::new();
    for asset in AUDIO_MANIFEST {
        gate.register(asset.sound.name(), asset.kind);
    }
    for (name, _, _) in TEXTURE_MANIFEST {
        gate.register(name, LoadKind::Preload);
    }

    let mut poll = ReadinessPoll::new(None);
    let pending = gate.missing();
    assert!(matches!(poll.poll(&gate).unwrap(), GateStatus::Pending { attempt: 1, .. }));
    for name in &pending {
        gate.mark_loaded(name).unwrap();
    }
    assert_eq!(poll.poll(&gate).unwrap(), GateStatus::Ready { attempts: 2 });
}

#[test]
fn gate_poll_gives_up_when_bounded() {
    let mut gate = AssetGate::new();
    gate.register("heart", LoadKind::Preload);
    let mut poll = ReadinessPoll::new(Some(2));
    assert!(poll.poll(&gate).is_ok());
    match poll.poll(&gate) {
        Err(GameError::GateNeverReady { attempts, missing }) => {
            assert_eq!(attempts, 2);
            assert_eq!(missing, vec!["heart".to_string()]);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}
