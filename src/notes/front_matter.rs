use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteMetadata {
    pub color: Option<String>,
    pub event_name: Option<String>,
}

/// Narrow capability over whatever stores note metadata.
pub trait MetadataSource {
    fn metadata_for(&self, relative_path: &str) -> NoteMetadata;
}

pub struct FsMetadata {
    root: PathBuf,
}

impl FsMetadata {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MetadataSource for FsMetadata {
    fn metadata_for(&self, relative_path: &str) -> NoteMetadata {
        let path = self.root.join(relative_path);
        match fs::read_to_string(&path) {
            Ok(content) => parse_front_matter(&content, &path),
            Err(error) => {
                log::warn!("failed to read note {}: {error}", path.display());
                NoteMetadata::default()
            }
        }
    }
}

fn front_matter_block(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some(&content[start..offset]);
        }
        offset += line.len();
    }
    None
}

fn string_field(mapping: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| mapping.get(*key))
        .find_map(|value| match value {
            Value::String(text) => Some(text.trim().to_owned()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
        .filter(|text| !text.is_empty())
}

pub fn parse_front_matter(content: &str, origin: &Path) -> NoteMetadata {
    let Some(block) = front_matter_block(content) else {
        return NoteMetadata::default();
    };

    let mapping = match serde_yaml::from_str::<Value>(block) {
        Ok(value @ Value::Mapping(_)) => value,
        Ok(_) => return NoteMetadata::default(),
        Err(error) => {
            log::warn!("ignoring malformed front-matter in {}: {error}", origin.display());
            return NoteMetadata::default();
        }
    };

    NoteMetadata {
        color: string_field(&mapping, &["color"]),
        event_name: string_field(&mapping, &["eventName", "event_name"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> NoteMetadata {
        parse_front_matter(content, Path::new("test.md"))
    }

    #[test]
    fn reads_color_and_event() {
        let metadata = parse("---\ncolor: \"#aabbcc\"\neventName: Graduation\n---\n# 2012-06-30\n");
        assert_eq!(metadata.color.as_deref(), Some("#aabbcc"));
        assert_eq!(metadata.event_name.as_deref(), Some("Graduation"));
    }

    #[test]
    fn missing_front_matter_is_empty() {
        assert_eq!(parse("# just a heading\ncolor: red\n"), NoteMetadata::default());
        assert_eq!(parse("---\ncolor: red\n"), NoteMetadata::default());
    }

    #[test]
    fn malformed_yaml_is_tolerated() {
        assert_eq!(parse("---\ncolor: [unclosed\n---\n"), NoteMetadata::default());
        assert_eq!(parse("---\n- a\n- b\n---\n"), NoteMetadata::default());
    }

    #[test]
    fn blank_values_are_dropped() {
        let metadata = parse("---\r\ncolor: \"  \"\r\nevent_name: Move\r\n---\r\nbody");
        assert_eq!(metadata.color, None);
        assert_eq!(metadata.event_name.as_deref(), Some("Move"));
    }

    #[test]
    fn reads_from_vault_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("daily")).expect("create daily");
        fs::write(
            dir.path().join("daily/2020-01-01.md"),
            "---\ncolor: teal\n---\n",
        )
        .expect("write note");

        let source = FsMetadata::new(dir.path());
        assert_eq!(
            source.metadata_for("daily/2020-01-01.md").color.as_deref(),
            Some("teal")
        );
        assert_eq!(source.metadata_for("daily/missing.md"), NoteMetadata::default());
    }
}
