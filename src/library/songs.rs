//! JSON song lists.
//!
//! The backend's song records are loose: the locator may live under `url`,
//! `fileUrl` or `audioUrl`, the artist is either a plain string, an object
//! with a `name` or a separate `artistName`, and the art is `imageUrl` or
//! `cover`. A list is either a bare array or wrapped as `{"data": [...]}`.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::player::Track;

use super::error::LibraryError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SongId {
    Text(String),
    Number(serde_json::Number),
}

impl SongId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ArtistField {
    Name(String),
    Record { name: Option<String> },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SongRecord {
    #[serde(alias = "_id")]
    id: Option<SongId>,
    title: Option<String>,
    url: Option<String>,
    file_url: Option<String>,
    audio_url: Option<String>,
    artist: Option<ArtistField>,
    artist_name: Option<String>,
    image_url: Option<String>,
    cover: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SongList {
    Bare(Vec<SongRecord>),
    Wrapped { data: Vec<SongRecord> },
}

fn first_filled(candidates: [Option<&str>; 3]) -> Option<&str> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

/// Relative local locators are taken relative to the list's directory.
fn anchor(url: &str, base: Option<&Path>) -> String {
    match base {
        Some(base) if !url.contains("://") && Path::new(url).is_relative() => {
            base.join(url).display().to_string()
        }
        _ => url.to_string(),
    }
}

impl SongRecord {
    fn into_track(self, base: Option<&Path>) -> Track {
        let url = first_filled([
            self.url.as_deref(),
            self.file_url.as_deref(),
            self.audio_url.as_deref(),
        ])
        .map(|u| anchor(u.trim(), base))
        .unwrap_or_default();

        let artist = match &self.artist {
            Some(ArtistField::Name(name)) => Some(name.as_str()),
            Some(ArtistField::Record { name }) => name.as_deref(),
            None => None,
        }
        .filter(|a| !a.trim().is_empty())
        .or(self.artist_name.as_deref());

        let image = first_filled([self.image_url.as_deref(), self.cover.as_deref(), None]);

        let id = self
            .id
            .map(SongId::into_string)
            .unwrap_or_else(|| url.clone());

        Track::new(id, url)
            .titled(self.title.as_deref())
            .by(artist)
            .with_image(image)
    }
}

/// Parse a song list. Records without a locator are kept (with an empty
/// url) so the engine's queue filtering decides what is playable.
pub fn parse_song_list(text: &str, base: Option<&Path>) -> Result<Vec<Track>, serde_json::Error> {
    let records = match serde_json::from_str::<SongList>(text)? {
        SongList::Bare(records) => records,
        SongList::Wrapped { data } => data,
    };
    debug!("parsed {} song record(s)", records.len());
    Ok(records.into_iter().map(|r| r.into_track(base)).collect())
}

pub fn load_song_list(path: &Path) -> Result<Vec<Track>, LibraryError> {
    let text = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_song_list(&text, path.parent()).map_err(|source| LibraryError::Json {
        path: path.to_path_buf(),
        source,
    })
}
