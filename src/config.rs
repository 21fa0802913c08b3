//! Card description: who it is for, when it opens, and what is on it.
//!
//! Loaded from JSON; every field is optional. Absent `elements` entries model
//! a page without that element, and each feature checks for its element
//! before doing anything.

use crate::error::ConfigError;
use crate::gallery::Photo;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_NAME: &str = "Beautiful";
pub const DEFAULT_SONG: &str = "birthday_song.wav";

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a local target instant; a bare date means midnight
pub fn parse_birthday(text: &str) -> Result<NaiveDateTime, ConfigError> {
    let text = text.trim();
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ConfigError::Date(text.to_string()))
}

fn default_birthday() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, 17)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn deserialize_birthday<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_birthday(&text).map_err(serde::de::Error::custom)
}

fn serialize_birthday<S>(birthday: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&birthday.format(DATE_TIME_FORMATS[0]).to_string())
}

/// Which page elements exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Elements {
    pub countdown: bool,
    pub start_button: bool,
    pub cake: bool,
    pub music_button: bool,
    pub surprise_button: bool,
    pub letter_button: bool,
    pub gallery: bool,
}

impl Default for Elements {
    fn default() -> Self {
        Self {
            countdown: true,
            start_button: true,
            cake: true,
            music_button: true,
            surprise_button: true,
            letter_button: true,
            gallery: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub name: String,
    #[serde(deserialize_with = "deserialize_birthday", serialize_with = "serialize_birthday")]
    pub birthday: NaiveDateTime,
    pub lock_until_birthday: bool,
    /// Let the card be opened before the birthday, in its locked state
    pub early_entry: bool,
    pub song: Option<PathBuf>,
    pub headline: String,
    pub message: String,
    pub letter: Vec<String>,
    pub candles: usize,
    pub photos: Vec<Photo>,
    pub gallery_note: Option<String>,
    pub elements: Elements,
    /// Directory relative paths were resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            birthday: default_birthday(),
            lock_until_birthday: true,
            early_entry: false,
            song: Some(PathBuf::from(DEFAULT_SONG)),
            headline: "Happy Birthday".to_string(),
            message: "Wishing you a day as wonderful as you are.".to_string(),
            letter: vec![
                "My love,".to_string(),
                "Every day with you is a gift. Today we celebrate you.".to_string(),
                "Forever yours ❤️".to_string(),
            ],
            candles: 3,
            photos: Vec::new(),
            gallery_note: Some("📸 Our favorite memories".to_string()),
            elements: Elements::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl CardConfig {
    /// Read a card description and resolve its relative paths against the
    /// file's directory
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: CardConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.resolve_paths(&base);

        log::info!("Loaded card for {} from {}", config.name, path.display());
        Ok(config)
    }

    /// `load` when a path is given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        if let Some(song) = &self.song {
            if song.is_relative() {
                self.song = Some(base.join(song));
            }
        }
        for photo in &mut self.photos {
            let src = Path::new(&photo.src);
            if !photo.src.trim().is_empty() && !photo.src.starts_with("data:") && src.is_relative() {
                photo.src = base.join(src).to_string_lossy().into_owned();
            }
        }
        self.base_dir = base.to_path_buf();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birthday_formats() {
        let midnight = default_birthday();
        assert_eq!(parse_birthday("2025-12-17").unwrap(), midnight);
        assert_eq!(parse_birthday("2025-12-17T00:00:00").unwrap(), midnight);
        assert_eq!(parse_birthday(" 2025-12-17 00:00:00 ").unwrap(), midnight);
        assert!(matches!(parse_birthday("17/12/2025"), Err(ConfigError::Date(_))));
    }

    #[test]
    fn test_empty_object_is_all_defaults() {
        let config: CardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CardConfig::default());
    }
}
