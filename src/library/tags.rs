//! Tag reading seam and its `lofty` implementation.

use std::path::Path;
use std::time::Duration;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::prelude::Accessor;
use thiserror::Error;

/// Metadata read from one file. Every field is optional; the catalog fills
/// in the file stem when the title is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum TagError {
    #[error("unreadable or unsupported file: {0}")]
    Unreadable(#[from] lofty::error::LoftyError),

    #[error("{0}")]
    Other(String),
}

/// Reads tags for a single file.
pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<TrackTags, TagError>;
}

/// `TagReader` backed by `lofty`. Prefers the primary tag and falls back to
/// the first tag present in the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<TrackTags, TagError> {
        let tagged = lofty::read_from_path(path)?;

        // Durations are kept to whole seconds so re-encodes of one song compare equal.
        let secs = tagged.properties().duration().as_secs();
        let mut tags = TrackTags {
            duration: (secs > 0).then(|| Duration::from_secs(secs)),
            ..TrackTags::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            tags.title = non_empty(tag.title().as_deref());
            tags.artist = non_empty(tag.artist().as_deref());
            tags.album = non_empty(tag.album().as_deref());
        }

        Ok(tags)
    }
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn non_empty_trims_and_drops_blank_values() {
        assert_eq!(non_empty(Some("  Artist ")), Some("Artist".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn lofty_reader_rejects_files_that_are_not_audio() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fake.mp3");
        fs::write(&path, b"not a real mp3").unwrap();

        assert!(LoftyTagReader.read_tags(&path).is_err());
    }
}
