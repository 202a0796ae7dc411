use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteRequest {
    Open {
        relative_path: String,
        new_tab: bool,
    },
    Create {
        relative_path: String,
        date_key: String,
        new_tab: bool,
    },
}

pub trait NoteOpener {
    fn open(&self, path: &Path, new_tab: bool) -> Result<()>;
}

pub struct SystemOpener;

impl NoteOpener for SystemOpener {
    fn open(&self, path: &Path, new_tab: bool) -> Result<()> {
        log::debug!("opening {} (new tab requested: {new_tab})", path.display());
        open::that(path).with_context(|| format!("failed to open {}", path.display()))
    }
}

pub fn create_note(vault_root: &Path, relative_path: &str, date_key: &str) -> Result<PathBuf> {
    let path = vault_root.join(relative_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create folder {}", parent.display()))?;
    }

    match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(mut file) => {
            writeln!(file, "# {date_key}")
                .with_context(|| format!("failed to seed {}", path.display()))?;
            log::info!("created daily note {}", path.display());
        }
        Err(error) if error.kind() == ErrorKind::AlreadyExists => {}
        Err(error) => {
            return Err(error).with_context(|| format!("failed to create {}", path.display()));
        }
    }
    Ok(path)
}

// Returns whether a new note was written. Failures are only logged.
pub fn fulfil(request: &NoteRequest, vault_root: &Path, opener: &dyn NoteOpener) -> bool {
    let result = match request {
        NoteRequest::Open {
            relative_path,
            new_tab,
        } => opener
            .open(&vault_root.join(relative_path), *new_tab)
            .map(|()| false),
        NoteRequest::Create {
            relative_path,
            date_key,
            new_tab,
        } => create_note(vault_root, relative_path, date_key)
            .and_then(|path| opener.open(&path, *new_tab))
            .map(|()| true),
    };

    match result {
        Ok(created) => created,
        Err(error) => {
            log::warn!("note request failed: {error:#}");
            false
        }
    }
}
