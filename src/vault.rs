use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::notes::{DateFormat, FsMetadata, NoteIndex, collect_notes};
use crate::settings::{Settings, load_settings, save_settings};

#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub vault_root: PathBuf,
    pub settings_path: PathBuf,
    pub today: Option<NaiveDate>,
}

impl LaunchOptions {
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

pub struct Vault {
    pub root: PathBuf,
    pub settings_path: PathBuf,
    pub settings: Settings,
    pub notes: NoteIndex,
    pub today: NaiveDate,
}

impl Vault {
    pub fn record_created_note(&mut self, date_key: &str, relative_path: &str) {
        self.notes.insert(date_key, relative_path);
    }
}

pub fn load_vault(options: &LaunchOptions) -> Result<Vault> {
    let root = options
        .vault_root
        .canonicalize()
        .with_context(|| format!("vault {} is not accessible", options.vault_root.display()))?;

    if !options.settings_path.exists() {
        save_settings(&options.settings_path, &Settings::default())?;
        log::info!(
            "wrote a settings template to {}",
            options.settings_path.display()
        );
    }
    let settings = load_settings(&options.settings_path);

    // A bad format is reported by the render pass; discovery just finds nothing.
    let notes = match DateFormat::parse(&settings.daily_note_format) {
        Ok(format) => collect_notes(
            &root,
            &settings.daily_note_folder,
            &format,
            &FsMetadata::new(root.clone()),
        )?,
        Err(error) => {
            log::warn!("skipping note discovery: {error}");
            NoteIndex::default()
        }
    };

    Ok(Vault {
        root,
        settings_path: options.settings_path.clone(),
        settings,
        notes,
        today: options.today(),
    })
}

pub fn settings_path_or_default(explicit: Option<PathBuf>, vault_root: &Path) -> PathBuf {
    explicit
        .or_else(crate::settings::default_settings_path)
        .unwrap_or_else(|| vault_root.join(".life-calendar.json"))
}
