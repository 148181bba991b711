//! Track sources.
//!
//! Tracks come from three places: a directory scan (tags read with `lofty`),
//! a single audio file, or a JSON song list in the shape the music backend
//! serves. A [`Library`] keeps everything that was loaded and answers
//! [`TrackResolver`] lookups by id.

mod error;
mod scan;
mod songs;

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::LibrarySettings;
use crate::player::{Track, TrackResolver};

pub use error::LibraryError;
pub use scan::{read_track, scan};
pub use songs::{load_song_list, parse_song_list};

#[derive(Debug, Default, Clone)]
pub struct Library {
    tracks: Vec<Track>,
}

fn is_song_list(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl Library {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Load every path given on the command line, in order.
    ///
    /// Directories are scanned, `.json` files are read as song lists and any
    /// other file is taken as a single track.
    pub fn from_paths(
        paths: &[PathBuf],
        settings: &LibrarySettings,
    ) -> Result<Self, LibraryError> {
        let mut tracks = Vec::new();
        for path in paths {
            let loaded = Self::load_one(path, settings)?;
            info!("loaded {} track(s) from {}", loaded.len(), path.display());
            tracks.extend(loaded);
        }
        Ok(Self { tracks })
    }

    fn load_one(path: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, LibraryError> {
        if path.is_dir() {
            return Ok(scan(path, settings));
        }
        if !path.exists() {
            return Err(LibraryError::NotFound(path.to_path_buf()));
        }
        if is_song_list(path) {
            return load_song_list(path);
        }
        Ok(vec![read_track(path)])
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl TrackResolver for Library {
    fn resolve(&self, id: &str) -> Option<Track> {
        let found = self.tracks.iter().find(|t| t.id == id).cloned();
        if found.is_none() {
            warn!("no track with id {id:?} in the library");
        }
        found
    }
}
