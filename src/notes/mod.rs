mod collect;
mod create;
mod front_matter;
mod pattern;
mod scope;

pub use collect::{NoteIndex, collect_notes};
pub use create::{NoteOpener, NoteRequest, SystemOpener, fulfil};
pub use front_matter::FsMetadata;
pub use pattern::DateFormat;
pub use scope::derived_note_path;
