use birthday_card::config::{parse_birthday, DEFAULT_NAME};
use birthday_card::gallery::Photo;
use birthday_card::{CardConfig, ConfigError};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_card_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("card.json");
    fs::write(
        &path,
        r#"{
            "name": "Sam",
            "birthday": "2026-03-02",
            "song": "music/song.wav",
            "photos": [{ "src": "photos/us.jpg", "alt": "Us" }, { "src": "" }],
            "elements": { "cake": false }
        }"#,
    )
    .unwrap();

    let config = CardConfig::load(&path).unwrap();
    assert_eq!(config.name, "Sam");
    assert_eq!(config.birthday, parse_birthday("2026-03-02T00:00:00").unwrap());
    assert_eq!(config.song, Some(dir.path().join("music/song.wav")));
    assert_eq!(
        config.photos,
        vec![
            Photo::new(dir.path().join("photos/us.jpg").to_string_lossy(), "Us"),
            Photo::new("", "Photo"),
        ]
    );
    assert!(!config.elements.cake);
    assert!(config.elements.gallery);
    assert!(config.lock_until_birthday);
    assert_eq!(config.candles, 3);
    assert_eq!(config.base_dir, dir.path());
}

#[test]
fn test_no_file_means_defaults() {
    let config = CardConfig::load_or_default(None).unwrap();
    assert_eq!(config.name, DEFAULT_NAME);
    assert_eq!(config.birthday, parse_birthday("2025-12-17").unwrap());
    assert!(!config.early_entry);
}

#[test]
fn test_load_errors_are_typed() {
    let dir = TempDir::new().unwrap();

    let missing = CardConfig::load(&dir.path().join("nope.json"));
    assert!(matches!(missing, Err(ConfigError::Read { .. })));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ \"name\": ").unwrap();
    assert!(matches!(CardConfig::load(&broken), Err(ConfigError::Parse { .. })));

    let bad_date = dir.path().join("date.json");
    fs::write(&bad_date, r#"{ "birthday": "next tuesday" }"#).unwrap();
    let err = CardConfig::load(&bad_date).unwrap_err();
    assert!(err.to_string().contains("next tuesday"));
}
