//! The editable `tags` text file.
//!
//! ```text
//! <album>
//! <album artist>
//! <release date>
//!
//! <title>[//<artist>...]
//!
//! <title of disc 2>...
//! ```
//!
//! Blank lines after the header separate discs; disc and track numbers are
//! derived from that grouping when the file is read.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::{Result, TagError, Track};

pub const TAGS_FILE_NAME: &str = "tags";

const ARTIST_SEPARATOR: &str = "//";

pub fn tags_file_path(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(TAGS_FILE_NAME)
}

/// Reads and parses `<dir>/tags`.
pub fn read(dir: impl AsRef<Path>) -> Result<Vec<Track>> {
    let path = tags_file_path(dir);
    let content = fs::read_to_string(&path)?;
    let tracks = parse(&content)?;
    info!("Read {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// Serializes `tracks` into `<dir>/tags`, overwriting any existing file.
pub fn write(dir: impl AsRef<Path>, tracks: &[Track]) -> Result<PathBuf> {
    if tracks.is_empty() {
        return Err(TagError::TagsFile("no tracks to write".into()));
    }
    let path = tags_file_path(dir);
    fs::write(&path, serialize(tracks))?;
    info!("Wrote {} tracks to {}", tracks.len(), path.display());
    Ok(path)
}

pub fn parse(content: &str) -> Result<Vec<Track>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines();

    let mut header = |name: &str| {
        lines
            .next()
            .map(str::to_string)
            .ok_or_else(|| TagError::TagsFile(format!("missing {} line", name)))
    };
    let album = header("album")?;
    let album_artist = header("album artist")?;
    let date = header("date")?;

    match lines.next() {
        Some("") => {}
        Some(line) => {
            return Err(TagError::TagsFile(format!(
                "line 4 must be blank, found {:?}",
                line
            )))
        }
        None => return Err(TagError::TagsFile("missing blank line 4".into())),
    }

    let mut discs: Vec<Vec<Track>> = Vec::new();
    let mut new_disc = true;
    for line in lines {
        if line.is_empty() {
            new_disc = true;
            continue;
        }
        if new_disc {
            discs.push(Vec::new());
            new_disc = false;
        }

        let mut tokens = line.split(ARTIST_SEPARATOR);
        let title = tokens.next().unwrap_or_default().to_string();
        let track = Track {
            album: album.clone(),
            album_artist: album_artist.clone(),
            date: date.clone(),
            title,
            artists: tokens.map(str::to_string).collect(),
            ..Track::default()
        };
        if let Some(disc) = discs.last_mut() {
            disc.push(track);
        }
    }

    let total_discs = discs.len() as u32;
    let mut tracks = Vec::new();
    for (disc_index, disc) in discs.into_iter().enumerate() {
        let total_tracks = disc.len() as u32;
        for (track_index, mut track) in disc.into_iter().enumerate() {
            track.disc_number = disc_index as u32 + 1;
            track.total_discs = total_discs;
            track.track_number = track_index as u32 + 1;
            track.total_tracks = total_tracks;
            tracks.push(track);
        }
    }

    debug!("Parsed {} tracks on {} discs", tracks.len(), total_discs);
    Ok(tracks)
}

/// Renders `tracks` in the tags file format. The header comes from the first track.
pub fn serialize(tracks: &[Track]) -> String {
    let mut out = String::new();
    let first = tracks.first();
    for field in [
        first.map(|t| t.album.as_str()),
        first.map(|t| t.album_artist.as_str()),
        first.map(|t| t.date.as_str()),
    ] {
        out.push_str(field.unwrap_or_default());
        out.push('\n');
    }
    out.push('\n');

    let grouped = disc_numbers_sequential(tracks);
    let mut current_disc = 1;
    for track in tracks {
        if grouped && track.disc_number != current_disc {
            out.push('\n');
            current_disc = track.disc_number;
        }

        out.push_str(&track.title);
        for artist in extra_artists(track) {
            out.push_str(ARTIST_SEPARATOR);
            out.push_str(artist);
        }
        out.push('\n');
    }
    out
}

/// Artists worth writing next to the title: neither empty nor the album artist.
pub fn extra_artists(track: &Track) -> Vec<&str> {
    track
        .artists
        .iter()
        .map(String::as_str)
        .filter(|a| !a.is_empty() && *a != track.album_artist)
        .collect()
}

/// True when disc numbers start at 1 and only ever stay or step up by one.
fn disc_numbers_sequential(tracks: &[Track]) -> bool {
    let mut current = 1;
    for track in tracks {
        if track.disc_number != current && track.disc_number != current + 1 {
            return false;
        }
        current = track.disc_number;
    }
    true
}
