use std::path::Path;

use crate::{Result, Track};

pub mod flac;
pub mod id3v2;
pub mod mp4;

use flac::FlacCodec;
use id3v2::Id3v2Codec;
use mp4::Mp4Codec;

/// File extensions (lowercase, without dot) a codec exists for.
pub const AUDIO_EXTENSIONS: &[&str] = &["flac", "m4a", "mp3", "dsf"];

/// Read and write the embedded metadata of one container format.
pub trait Codec {
    /// Reads the tags of `path`. The returned track carries `path` as its file path.
    fn read(&self, path: &Path) -> Result<Track>;

    /// Replaces the tags of `track.file_path` with the contents of `track`.
    fn write(&self, track: &Track) -> Result<()>;

    fn name(&self) -> &'static str;
}

static FLAC: FlacCodec = FlacCodec;
static MP3: Id3v2Codec = Id3v2Codec::standard();
static DSF: Id3v2Codec = Id3v2Codec::dsf();
static M4A: Mp4Codec = Mp4Codec;

/// Returns the codec handling the extension of `path`, or `None` when unsupported.
pub fn codec_for_path(path: &Path) -> Option<&'static dyn Codec> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp3" => Some(&MP3),
        "dsf" => Some(&DSF),
        "flac" => Some(&FLAC),
        "m4a" => Some(&M4A),
        _ => None,
    }
}

/// Guess an image MIME type from its magic bytes.
pub fn sniff_mime_type(data: &[u8]) -> &'static str {
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }

    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return "image/gif";
    }

    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return "image/webp";
    }

    if data.starts_with(b"BM") {
        return "image/bmp";
    }

    "application/octet-stream"
}
