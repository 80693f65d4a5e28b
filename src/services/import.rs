use std::path::Path;

use log::{debug, info};

use super::{codec_for_files, ensure_same_count};
use crate::sidecar::{image, tags_file};
use crate::utils::file_ops::find_audio_files;
use crate::Result;

/// Writes the contents of `dir/tags` and the sidecar image into the audio
/// files of `dir`, pairing tracks and files in file name order.
///
/// Returns the number of files written.
pub fn import(dir: impl AsRef<Path>) -> Result<usize> {
    let dir = dir.as_ref();
    let files = find_audio_files(dir)?;
    let mut tracks = tags_file::read(dir)?;
    ensure_same_count(files.len(), tracks.len())?;

    image::attach(dir, &mut tracks)?;
    let codec = codec_for_files(&files)?;
    info!("Importing {} tracks into {} files", tracks.len(), codec.name());

    for (track, file) in tracks.iter_mut().zip(&files) {
        track.file_path = file.clone();
        debug!("Writing {}", file.display());
        codec.write(track)?;
    }

    Ok(files.len())
}
