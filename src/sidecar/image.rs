use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::{Image, Result, Track};

/// Sidecar names in lookup order, with the MIME type each one implies.
const CANDIDATES: &[(&str, &str)] = &[
    ("Folder.jpg", "image/jpeg"),
    ("Folder.jpeg", "image/jpeg"),
    ("Folder.png", "image/png"),
    ("Folder.gif", "image/gif"),
];

/// Loads the first sidecar image found in `dir`.
pub fn read(dir: impl AsRef<Path>) -> Result<Option<Arc<Image>>> {
    let dir = dir.as_ref();
    for (name, mime_type) in CANDIDATES {
        let path = dir.join(name);
        if !path.is_file() {
            continue;
        }

        let data = fs::read(&path)?;
        info!("Using cover image {}", path.display());
        return Ok(Some(Arc::new(Image::new(*mime_type, data))));
    }

    debug!("No cover image in {}", dir.display());
    Ok(None)
}

/// Sets the sidecar image of `dir`, if any, on every track.
pub fn attach(dir: impl AsRef<Path>, tracks: &mut [Track]) -> Result<()> {
    if let Some(image) = read(dir)? {
        for track in tracks.iter_mut() {
            track.image = Some(Arc::clone(&image));
        }
    }
    Ok(())
}

/// Sidecar file name for a MIME type, `None` for types without one.
pub fn file_name_for(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/jpeg" | "image/jpg" => Some("Folder.jpg"),
        "image/png" => Some("Folder.png"),
        "image/gif" => Some("Folder.gif"),
        _ => None,
    }
}

/// Writes `image` into `dir`. Images of other types are skipped.
pub fn write(dir: impl AsRef<Path>, image: &Image) -> Result<Option<PathBuf>> {
    let Some(name) = file_name_for(&image.mime_type) else {
        warn!("Not saving cover image of type {}", image.mime_type);
        return Ok(None);
    };

    let path = dir.as_ref().join(name);
    fs::write(&path, &image.data)?;
    info!("Wrote cover image {}", path.display());
    Ok(Some(path))
}
