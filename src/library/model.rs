use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One playable file and the metadata read from its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Whole seconds; `None` when the file could not be probed.
    pub duration: Option<Duration>,
}

impl Track {
    /// A track with nothing but a title derived from the file stem.
    pub fn from_path(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            title: title_from_stem(path),
            artist: None,
            album: None,
            duration: None,
        }
    }

    /// Two tracks are duplicates when at least two of duration, artist and
    /// title agree. Unknown durations and artists never agree.
    pub fn is_duplicate_of(&self, other: &Track) -> bool {
        let same_duration = matches!(
            (self.duration, other.duration),
            (Some(a), Some(b)) if a == b
        );
        let same_artist = match (self.artist.as_deref(), other.artist.as_deref()) {
            (Some(a), Some(b)) => eq_ignore_case(a, b),
            _ => false,
        };
        let same_title = eq_ignore_case(&self.title, &other.title);

        [same_duration, same_artist, same_title]
            .iter()
            .filter(|&&m| m)
            .count()
            >= 2
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => write!(f, "{} - {}", a, self.title),
            _ => f.write_str(&self.title),
        }
    }
}

pub(crate) fn title_from_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
