use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_MAX_AGE: u32 = 95;
pub const MAX_AGE_RANGE: std::ops::RangeInclusive<i64> = 1..=150;
pub const DEFAULT_NOTE_FORMAT: &str = "YYYY-MM-DD";

static BIRTHDAY_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static birthday pattern compiles"));

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: String,
    #[serde(default)]
    pub end: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Period {
    pub fn is_open_ended(&self) -> bool {
        let end = self.end.trim();
        end.is_empty() || end.eq_ignore_ascii_case("present")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub birthday: String,
    pub max_age: u32,
    pub daily_note_format: String,
    pub daily_note_folder: String,
    pub periods: Vec<Period>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            birthday: String::new(),
            max_age: DEFAULT_MAX_AGE,
            daily_note_format: DEFAULT_NOTE_FORMAT.to_owned(),
            daily_note_folder: String::new(),
            periods: Vec::new(),
        }
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "life-calendar").map(|dirs| dirs.config_dir().join("settings.json"))
}

pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        log::info!("no settings file at {}; using defaults", path.display());
        return Settings::default();
    }

    match fs::read_to_string(path) {
        Ok(raw) => parse_settings(&raw),
        Err(error) => {
            log::warn!("failed to read settings {}: {error}", path.display());
            Settings::default()
        }
    }
}

pub fn parse_settings(raw: &str) -> Settings {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => settings_from_object(&object),
        Ok(_) => {
            log::warn!("settings root is not an object; using defaults");
            Settings::default()
        }
        Err(error) => {
            log::warn!("settings are not valid JSON ({error}); using defaults");
            Settings::default()
        }
    }
}

fn settings_from_object(object: &Map<String, Value>) -> Settings {
    let defaults = Settings::default();

    let birthday = match object.get("birthday") {
        None | Some(Value::Null) => defaults.birthday.clone(),
        Some(Value::String(value)) if BIRTHDAY_SHAPE.is_match(value.trim()) => {
            value.trim().to_owned()
        }
        Some(other) => {
            log::warn!("resetting invalid birthday {other}");
            defaults.birthday.clone()
        }
    };

    let max_age = match object.get("maxAge") {
        None | Some(Value::Null) => defaults.max_age,
        Some(value) => match value.as_i64() {
            Some(age) if MAX_AGE_RANGE.contains(&age) => age as u32,
            _ => {
                log::warn!("resetting invalid maxAge {value}");
                defaults.max_age
            }
        },
    };

    let daily_note_format = match object.get("dailyNoteFormat").and_then(Value::as_str) {
        Some(format) if !format.trim().is_empty() => format.trim().to_owned(),
        Some(_) => {
            log::warn!("resetting empty dailyNoteFormat");
            defaults.daily_note_format.clone()
        }
        None => defaults.daily_note_format.clone(),
    };

    let daily_note_folder = object
        .get("dailyNoteFolder")
        .and_then(Value::as_str)
        .map(|folder| folder.trim().to_owned())
        .unwrap_or_default();

    let periods = match object.get("periods") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let period = period_from_value(entry);
                if period.is_none() {
                    log::warn!("dropping malformed period #{index}: {entry}");
                }
                period
            })
            .collect(),
        Some(other) => {
            log::warn!("periods is not an array ({other}); ignoring");
            Vec::new()
        }
    };

    Settings {
        birthday,
        max_age,
        daily_note_format,
        daily_note_folder,
        periods,
    }
}

fn period_from_value(value: &Value) -> Option<Period> {
    let object = value.as_object()?;
    let start = object.get("start")?.as_str()?.trim().to_owned();
    let color = object.get("color")?.as_str()?.trim().to_owned();
    let end = object
        .get("end")
        .and_then(Value::as_str)
        .map(|end| end.trim().to_owned())
        .unwrap_or_default();
    let label = object
        .get("label")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_owned);

    Some(Period {
        start,
        end,
        color,
        label,
    })
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create settings directory {}", parent.display()))?;
    }
    let data = serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
    fs::write(path, data).with_context(|| format!("failed to write settings {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_record() {
        let settings = parse_settings(
            r##"{
                "birthday": "1990-05-15",
                "maxAge": 80,
                "dailyNoteFormat": "YYYY-MM-DD",
                "dailyNoteFolder": "journal",
                "periods": [
                    {"start": "2008-09-01", "end": "2012-06-30", "color": "#336699", "label": "University"},
                    {"start": "2015-01-01", "end": "present", "color": "#aa5500"}
                ]
            }"##,
        );

        assert_eq!(settings.birthday, "1990-05-15");
        assert_eq!(settings.max_age, 80);
        assert_eq!(settings.daily_note_folder, "journal");
        assert_eq!(settings.periods.len(), 2);
        assert_eq!(settings.periods[0].label.as_deref(), Some("University"));
        assert!(settings.periods[1].is_open_ended());
        assert!(!settings.periods[0].is_open_ended());
    }

    #[test]
    fn invalid_fields_fall_back_to_defaults() {
        let settings = parse_settings(
            r#"{"birthday": "15/05/1990", "maxAge": 400, "dailyNoteFormat": "", "periods": "oops"}"#,
        );

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn non_integer_max_age_is_reset() {
        let settings = parse_settings(r#"{"birthday": "1990-05-15", "maxAge": "ninety"}"#);
        assert_eq!(settings.max_age, DEFAULT_MAX_AGE);
        assert_eq!(settings.birthday, "1990-05-15");
    }

    #[test]
    fn malformed_period_entries_are_dropped() {
        let settings = parse_settings(
            r##"{"periods": [42, {"start": "2000-01-01"}, {"start": "2001-01-01", "color": "#fff"}]}"##,
        );
        assert_eq!(settings.periods.len(), 1);
        assert_eq!(settings.periods[0].start, "2001-01-01");
        assert!(settings.periods[0].is_open_ended());
    }

    #[test]
    fn garbage_yields_defaults() {
        assert_eq!(parse_settings("not json"), Settings::default());
        assert_eq!(parse_settings("[1, 2]"), Settings::default());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            birthday: "1985-12-01".into(),
            max_age: 90,
            periods: vec![Period {
                start: "2000-01-01".into(),
                end: String::new(),
                color: "#123456".into(),
                label: Some("Now".into()),
            }],
            ..Settings::default()
        };

        save_settings(&path, &settings).expect("save settings");
        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_settings(&dir.path().join("absent.json")), Settings::default());
    }
}
