use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use walkdir::{DirEntry, WalkDir};

use crate::color::normalize_to_hex;

use super::front_matter::MetadataSource;
use super::pattern::DateFormat;
use super::scope::{in_scope, normalize_vault_path};

#[derive(Clone, Debug, Default)]
pub struct NoteIndex {
    pub keys: HashSet<String>,
    pub paths: HashMap<String, String>,
    pub overrides: HashMap<String, String>,
    pub events: HashMap<String, String>,
}

impl NoteIndex {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn path_for(&self, date_key: &str) -> Option<&str> {
        self.paths.get(date_key).map(String::as_str)
    }

    pub fn insert(&mut self, date_key: &str, relative_path: &str) -> bool {
        if !self.keys.insert(date_key.to_owned()) {
            return false;
        }
        self.paths
            .insert(date_key.to_owned(), relative_path.to_owned());
        true
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Walks `vault_root` for markdown files whose stem matches `format` and
/// whose path lies within `folder`.
pub fn collect_notes(
    vault_root: &Path,
    folder: &str,
    format: &DateFormat,
    metadata: &dyn MetadataSource,
) -> Result<NoteIndex> {
    if !vault_root.is_dir() {
        bail!("vault directory {} does not exist", vault_root.display());
    }

    let started = Instant::now();
    let mut index = NoteIndex::default();

    let walker = WalkDir::new(vault_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk {}", vault_root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if !format.matches(stem) {
            continue;
        }

        let Ok(relative) = path.strip_prefix(vault_root) else {
            continue;
        };
        let relative = normalize_vault_path(&relative.to_string_lossy());
        if !in_scope(&relative, folder) {
            continue;
        }

        if !index.insert(stem, &relative) {
            log::debug!("duplicate daily note {relative} ignored");
            continue;
        }

        let note = metadata.metadata_for(&relative);
        if let Some(color) = note.color {
            index
                .overrides
                .insert(stem.to_owned(), normalize_to_hex(&color));
        }
        if let Some(event) = note.event_name {
            index.events.insert(stem.to_owned(), event);
        }
    }

    if index.is_empty() {
        log::info!(
            "no daily notes named {} under {}",
            format.source(),
            vault_root.display()
        );
        return Ok(index);
    }

    log::info!(
        "discovered {} daily notes ({} colored, {} events) in {:.1?}",
        index.len(),
        index.overrides.len(),
        index.events.len(),
        started.elapsed()
    );
    Ok(index)
}
