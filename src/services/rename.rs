use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::ensure_same_count;
use crate::sidecar::tags_file;
use crate::utils::file_ops::find_audio_files;
use crate::{Result, Track};

/// Characters not allowed in file names and what replaces them, applied in order.
const REPLACEMENTS: &[(char, &str)] = &[
    ('*', "-"),
    ('\\', ""),
    ('|', ""),
    (':', ""),
    ('"', ""),
    ('<', "("),
    ('>', ")"),
    ('/', ""),
    ('?', ""),
];

/// Renames the audio files of `dir` after the tracks in `dir/tags`.
///
/// Returns the new paths of the files that were renamed.
pub fn rename(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let files = find_audio_files(dir)?;
    let tracks = tags_file::read(dir)?;
    ensure_same_count(files.len(), tracks.len())?;

    let mut renamed = Vec::new();
    for (file, track) in files.iter().zip(&tracks) {
        let mut name = new_base_name(track);
        if let Some(ext) = file.extension().and_then(|e| e.to_str()) {
            name.push('.');
            name.push_str(ext);
        }
        let target = dir.join(&name);

        if &target == file {
            debug!("{} already has the right name", file.display());
            continue;
        }
        if target.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("cannot rename {} to {}: target exists", file.display(), name),
            )
            .into());
        }

        fs::rename(file, &target)?;
        info!("Renamed {} -> {}", file.display(), target.display());
        renamed.push(target);
    }
    Ok(renamed)
}

/// `[disc.]track.title`, numbers zero-padded to the width of their totals.
/// The disc prefix only appears for multi-disc albums.
pub fn new_base_name(track: &Track) -> String {
    let mut name = String::new();

    if track.total_discs > 1 {
        name.push_str(&pad(track.disc_number, track.total_discs));
        name.push('.');
    }

    name.push_str(&pad(track.track_number, track.total_tracks));
    name.push('.');
    name.push_str(&sanitize(&track.title));
    name
}

fn pad(number: u32, total: u32) -> String {
    let width = total.to_string().len();
    format!("{:0width$}", number, width = width)
}

pub fn sanitize(title: &str) -> String {
    let mut title = title.to_string();
    for (from, to) in REPLACEMENTS {
        title = title.replace(*from, to);
    }
    title
}
