//! The deduplicated pool of discovered tracks ("buffer").
//!
//! Tracks are appended in discovery order and never reordered. Loading is
//! additive: a directory can be loaded again without growing the catalog.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::LibrarySettings;
use crate::error::IndexOutOfRange;

use super::model::{Track, title_from_stem};
use super::scan::scan;
use super::tags::{TagError, TagReader};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("directory '{}' contains no playable files", .0.display())]
    EmptyCatalog(PathBuf),

    #[error("failed to load track '{}': {source}", .path.display())]
    TrackLoadFailed {
        path: PathBuf,
        #[source]
        source: TagError,
    },

    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRange),
}

#[derive(Debug, Default, Clone)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
}

impl TrackCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `dir` and append every track not already present.
    ///
    /// Returns the number of tracks added. The catalog is left untouched on
    /// every error path.
    pub fn load(
        &mut self,
        dir: &Path,
        settings: &LibrarySettings,
        reader: &dyn TagReader,
    ) -> Result<usize, CatalogError> {
        if !dir.is_dir() {
            return Err(CatalogError::DirectoryNotFound(dir.to_path_buf()));
        }

        let paths = scan(dir, settings);
        if paths.is_empty() {
            return Err(CatalogError::EmptyCatalog(dir.to_path_buf()));
        }

        let mut discovered = Vec::with_capacity(paths.len());
        for path in paths {
            match read_track(&path, reader) {
                Ok(track) => discovered.push(track),
                Err(source) if settings.strict_tags => {
                    return Err(CatalogError::TrackLoadFailed { path, source });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "tags unreadable, using file name");
                    discovered.push(Track::from_path(&path));
                }
            }
        }

        let before = self.tracks.len();
        for track in discovered {
            self.add(track);
        }
        let added = self.tracks.len() - before;

        info!(dir = %dir.display(), added, total = self.tracks.len(), "catalog loaded");
        Ok(added)
    }

    /// Append `track` unless its path or a duplicate is already present.
    /// Returns whether the track was added.
    pub fn add(&mut self, track: Track) -> bool {
        if let Some(existing) = self
            .tracks
            .iter()
            .find(|t| t.path == track.path || t.is_duplicate_of(&track))
        {
            debug!(
                dropped = %track.path.display(),
                kept = %existing.path.display(),
                "duplicate track dropped"
            );
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Clone the tracks at `indices`, in the order requested.
    pub fn tracks_by_indices(&self, indices: &[usize]) -> Result<Vec<Track>, CatalogError> {
        IndexOutOfRange::check(indices, self.tracks.len())?;
        Ok(indices.iter().map(|&i| self.tracks[i].clone()).collect())
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn read_track(path: &Path, reader: &dyn TagReader) -> Result<Track, TagError> {
    let tags = reader.read_tags(path)?;
    Ok(Track {
        path: path.to_path_buf(),
        title: tags.title.unwrap_or_else(|| title_from_stem(path)),
        artist: tags.artist,
        album: tags.album,
        duration: tags.duration,
    })
}
