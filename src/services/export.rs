use std::path::{Path, PathBuf};

use log::{debug, info};

use super::codec_for_files;
use crate::sidecar::{image, tags_file};
use crate::utils::file_ops::find_audio_files;
use crate::Result;

#[derive(Debug)]
pub struct ExportReport {
    pub track_count: usize,
    pub tags_file: PathBuf,
    pub image_file: Option<PathBuf>,
}

/// Reads the tags of every audio file in `dir` into `dir/tags` and the cover
/// image of the first track into `dir/Folder.<ext>`.
pub fn export(dir: impl AsRef<Path>) -> Result<ExportReport> {
    let dir = dir.as_ref();
    let files = find_audio_files(dir)?;
    let codec = codec_for_files(&files)?;
    info!("Exporting {} {} files from {}", files.len(), codec.name(), dir.display());

    let mut tracks = Vec::with_capacity(files.len());
    for file in &files {
        debug!("Reading {}", file.display());
        tracks.push(codec.read(file)?);
    }

    let tags_file = tags_file::write(dir, &tracks)?;
    let image_file = match tracks.first().and_then(|t| t.image.as_deref()) {
        Some(cover) => image::write(dir, cover)?,
        None => None,
    };

    Ok(ExportReport {
        track_count: tracks.len(),
        tags_file,
        image_file,
    })
}
