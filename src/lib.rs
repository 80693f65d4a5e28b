use std::path::PathBuf;
use std::sync::Arc;

pub mod audio;
pub mod cli;
pub mod services;
pub mod sidecar;
pub mod utils;

#[cfg(test)]
mod testing;

/// Vendor string written into every vorbis comment block.
pub const VENDOR: &str = concat!("utag ", env!("CARGO_PKG_VERSION"));

/// Metadata of a single audio file.
///
/// Numeric fields use `0` for "not present"; text fields use the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub file_path: PathBuf,
    pub album: String,
    pub album_artist: String,
    pub date: String,
    pub image: Option<Arc<Image>>,
    pub disc_number: u32,
    pub total_discs: u32,
    pub track_number: u32,
    pub total_tracks: u32,
    pub title: String,
    pub artists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ID3v2 error: {0}")]
    Id3(#[from] id3::Error),
    #[error("FLAC error: {0}")]
    Flac(#[from] metaflac::Error),
    #[error("MP4 error: {0}")]
    Mp4(#[from] mp4ameta::Error),
    #[error("Malformed {format} file: {reason}")]
    Format { format: &'static str, reason: String },
    #[error("Malformed tags file: {0}")]
    TagsFile(String),
    #[error("No audio files found in {0}")]
    NoAudioFiles(PathBuf),
    #[error("Audio file types are mixed: .{first} and .{other}")]
    MixedFileTypes { first: String, other: String },
    #[error("Found {files} audio files but the tags file describes {tracks} tracks")]
    CountMismatch { files: usize, tracks: usize },
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

impl TagError {
    pub(crate) fn format(format: &'static str, reason: impl Into<String>) -> Self {
        TagError::Format {
            format,
            reason: reason.into(),
        }
    }

    /// True for errors raised before any file is touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TagError::NoAudioFiles(_)
                | TagError::MixedFileTypes { .. }
                | TagError::CountMismatch { .. }
                | TagError::UnsupportedFormat(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TagError>;

// Re-exports for convenience
pub use audio::{codec_for_path, Codec};
pub use services::{export::export, import::import, rename::rename};
