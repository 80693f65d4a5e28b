use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::audio::AUDIO_EXTENSIONS;
use crate::{Result, TagError};

/// Lists the audio files directly inside `dir`, sorted by file name.
///
/// Fails when nothing is found or when more than one audio file type is present.
pub fn find_audio_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| TagError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        match extension_of(entry.path()) {
            Some(ext) if AUDIO_EXTENSIONS.contains(&ext.as_str()) => {
                files.push(entry.into_path());
            }
            _ => debug!("Skipping non-audio file: {}", entry.path().display()),
        }
    }

    let Some(first) = files.first() else {
        return Err(TagError::NoAudioFiles(dir.to_path_buf()));
    };

    let first_ext = extension_of(first).unwrap_or_default();
    for file in &files[1..] {
        let ext = extension_of(file).unwrap_or_default();
        if ext != first_ext {
            return Err(TagError::MixedFileTypes {
                first: first_ext,
                other: ext,
            });
        }
    }

    Ok(files)
}

/// Lowercased extension of `path`, without the dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Rewrites `path` through a copy.
///
/// `rewrite` edits a sibling copy of the file in place; the copy is then
/// renamed over `path` in one step, so readers see either the old or the new file.
pub fn replace_atomically<F>(path: &Path, rewrite: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = NamedTempFile::new_in(dir)?;
    fs::copy(path, temp.path())?;
    rewrite(temp.path())?;
    File::open(temp.path())?.sync_all()?;

    debug!("Replacing {} with {}", path.display(), temp.path().display());
    temp.persist(path).map_err(|e| TagError::Io(e.error))?;
    Ok(())
}
