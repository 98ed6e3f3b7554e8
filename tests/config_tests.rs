//! Configuration tests - JSON loading feeding the engine

use neon_drop::core::{BoardEngine, ConfigError, GameConfig, RawConfig};
use neon_drop::types::{GameAction, PieceKind};

#[test]
fn test_lock_delay_from_json_reaches_engine() {
    let config = GameConfig::from_json(r#"{ "LOCK_DELAY": 250, "LOCK_DELAY_FLOAT": 750 }"#)
        .unwrap();
    assert_eq!(config.lock_delay_for(PieceKind::T), 250);
    assert_eq!(config.lock_delay_for(PieceKind::Float), 750);

    let mut engine = BoardEngine::new(config, 4);
    engine.handle_input(GameAction::Start);
    while engine.handle_input(GameAction::SoftDrop) {}
    assert_eq!(engine.lock_delay_remaining_ms(), 250);
}

#[test]
fn test_exported_config_reloads() {
    let config = GameConfig::from_json(r#"{ "LOCK_DELAY": 420 }"#).unwrap();
    let json = serde_json::to_string(&config.to_raw()).unwrap();

    let reloaded = GameConfig::from_json(&json).unwrap();
    assert_eq!(reloaded, config);
    assert_eq!(reloaded.lock_delay_float_ms(), 1000);
}

#[test]
fn test_custom_spawn_position() {
    let mut raw = GameConfig::default().to_raw();
    let pieces = raw.pieces.as_mut().unwrap();
    for def in pieces.values_mut() {
        def.spawn = Some([0, 2]);
    }

    let config = raw.validate().unwrap();
    let mut engine = BoardEngine::new(config, 8);
    engine.handle_input(GameAction::Start);

    let piece = engine.current().unwrap();
    assert_eq!((piece.x, piece.y), (0, 2));
    assert!(!engine.handle_input(GameAction::MoveLeft));
}

#[test]
fn test_invalid_config_is_reported() {
    let err = RawConfig::from_json(r#"{ "PIECES": { "Q": { "shape": [[1]], "color": "red" } } }"#)
        .unwrap()
        .validate()
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownPiece(ref name) if name == "Q"));
    assert!(err.to_string().contains('Q'));
}
