use command_core::{
    ConfigError, DEFAULT_MAX_HISTORY, DocumentSnapshot, DocumentState, FontWeight, SessionConfig,
    TextColor,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn test_empty_object_uses_defaults() {
    let config = SessionConfig::from_json_str("{}").unwrap();
    assert_eq!(config, SessionConfig::default());
    assert_eq!(config.max_history, Some(DEFAULT_MAX_HISTORY));
    assert_eq!(config.replay_step_delay(), Duration::from_millis(500));
}

#[test]
fn test_full_config() {
    let config = SessionConfig::from_json_str(
        r##"{
            "defaults": {
                "content": "Untitled",
                "fontSize": 20,
                "fontWeight": "bold",
                "textColor": "#3B82F6"
            },
            "maxHistory": null,
            "replayStepDelayMs": 0
        }"##,
    )
    .unwrap();

    assert_eq!(
        config.defaults,
        DocumentSnapshot {
            content: "Untitled".to_string(),
            font_size: 20,
            font_weight: FontWeight::Bold,
            text_color: TextColor::from_rgb(0x3b82f6),
        }
    );
    assert_eq!(config.max_history, None);
    assert_eq!(config.replay_step_delay(), Duration::ZERO);
}

#[test]
fn test_invalid_values_are_rejected() {
    let err = SessionConfig::from_json_str(r#"{"defaults": {"fontSize": 0}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = SessionConfig::from_json_str(r#"{"maxHistory": 0}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = SessionConfig::from_json_str(r#"{"defaults": {"textColor": "red"}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = SessionConfig::load("/definitely/not/here/session.json").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_snapshot_without_color_defaults_to_black() {
    let snapshot: DocumentSnapshot = serde_json::from_str(
        r#"{"content": "hi", "fontSize": 12, "fontWeight": "normal"}"#,
    )
    .unwrap();
    assert_eq!(snapshot.text_color, TextColor::BLACK);

    let mut doc = DocumentState::new();
    doc.change_text_color(TextColor::from_rgb(0xef4444));
    doc.set_state(&snapshot).unwrap();
    assert_eq!(doc.text_color(), TextColor::BLACK);
    assert_eq!(doc.get_state(), snapshot);
}

#[test]
fn test_snapshot_json_round_trip_shape() {
    let snapshot = DocumentSnapshot {
        content: "hello".to_string(),
        font_size: 24,
        font_weight: FontWeight::Bold,
        text_color: TextColor::from_rgb(0x10b981),
    };
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "content": "hello",
            "fontSize": 24,
            "fontWeight": "bold",
            "textColor": "#10b981"
        })
    );
}
