use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;

use id3::frame::{Picture, PictureType};
use id3::{ErrorKind, Tag, TagLike, Version};
use log::debug;

use super::{sniff_mime_type, Codec};
use crate::{Image, Result, TagError, Track};

/// "DSD " magic, chunk size and total file size precede the tag pointer.
const DSF_PREAMBLE_LEN: u64 = 20;
const DSF_HEADER_LEN: u64 = 28;
const DSF_FILE_SIZE_FIELD: u64 = 12;
const DSF_POINTER_FIELD: u64 = 20;

const ID3V1_LEN: u64 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Tag at offset 0.
    Standard,
    /// Tag at the offset stored in the DSD chunk header.
    Dsf,
}

pub struct Id3v2Codec {
    layout: Layout,
}

impl Id3v2Codec {
    pub const fn standard() -> Self {
        Self {
            layout: Layout::Standard,
        }
    }

    pub const fn dsf() -> Self {
        Self {
            layout: Layout::Dsf,
        }
    }
}

impl Codec for Id3v2Codec {
    fn read(&self, path: &Path) -> Result<Track> {
        let tag = match self.layout {
            Layout::Standard => or_empty(Tag::read_from_path(path))?,
            Layout::Dsf => {
                let mut file = File::open(path)?;
                let pointer = read_dsf_pointer(&mut file)?;
                if pointer == 0 {
                    debug!("{} carries no ID3v2 tag", path.display());
                    return Ok(Track {
                        file_path: path.to_path_buf(),
                        ..Track::default()
                    });
                }
                file.seek(SeekFrom::Start(pointer))?;
                let mut buf = Vec::new();
                file.read_to_end(&mut buf)?;
                or_empty(Tag::read_from2(Cursor::new(buf)))?
            }
        };

        Ok(track_from_tag(path, &tag))
    }

    fn write(&self, track: &Track) -> Result<()> {
        let tag = tag_from_track(track);
        match self.layout {
            Layout::Standard => {
                tag.write_to_path(&track.file_path, Version::Id3v24)?;
                if strip_id3v1(&track.file_path)? {
                    debug!("Removed ID3v1 trailer from {}", track.file_path.display());
                }
                Ok(())
            }
            Layout::Dsf => {
                let mut bytes = Vec::new();
                tag.write_to(&mut bytes, Version::Id3v24)?;
                append_dsf_tag(&track.file_path, &bytes)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self.layout {
            Layout::Standard => "ID3v2",
            Layout::Dsf => "DSF",
        }
    }
}

/// Treats "no tag in this file" as an empty tag.
fn or_empty(result: id3::Result<Tag>) -> Result<Tag> {
    match result {
        Ok(tag) => Ok(tag),
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Ok(Tag::new()),
        Err(e) => Err(e.into()),
    }
}

fn track_from_tag(path: &Path, tag: &Tag) -> Track {
    let (disc_number, total_discs) = parse_position(text_frame(tag, "TPOS"));
    let (track_number, total_tracks) = parse_position(text_frame(tag, "TRCK"));

    let artists = tag
        .artist()
        .map(|artist| split_artists(tag.version(), artist))
        .unwrap_or_default();

    Track {
        file_path: path.to_path_buf(),
        album: tag.album().unwrap_or_default().to_string(),
        album_artist: text_frame(tag, "TPE2").to_string(),
        date: text_frame(tag, "TDRL").to_string(),
        image: cover(tag).map(Arc::new),
        disc_number,
        total_discs,
        track_number,
        total_tracks,
        title: tag.title().unwrap_or_default().to_string(),
        artists,
    }
}

fn tag_from_track(track: &Track) -> Tag {
    let mut tag = Tag::new();
    tag.set_album(track.album.as_str());
    tag.set_text("TPE2", track.album_artist.as_str());
    tag.set_text("TDRL", track.date.as_str());

    if let Some(image) = &track.image {
        tag.add_frame(Picture {
            mime_type: image.mime_type.clone(),
            picture_type: PictureType::CoverFront,
            description: "Cover".to_string(),
            data: image.data.clone(),
        });
    }

    tag.set_text(
        "TPOS",
        format_position(track.disc_number, track.total_discs),
    );
    tag.set_text(
        "TRCK",
        format_position(track.track_number, track.total_tracks),
    );
    tag.set_title(track.title.as_str());

    // v2.4 separates multiple values with NUL
    let artists: Vec<&str> = std::iter::once(track.album_artist.as_str())
        .filter(|a| !a.is_empty())
        .chain(track.artists.iter().map(String::as_str))
        .collect();
    let joined = artists.join("\0");
    if !joined.is_empty() {
        tag.set_artist(joined);
    }

    tag
}

fn text_frame<'a>(tag: &'a Tag, id: &str) -> &'a str {
    tag.get(id)
        .and_then(|frame| frame.content().text())
        .unwrap_or_default()
}

/// The artist frame separator depends on the tag version it was read from.
fn split_artists(version: Version, artist: &str) -> Vec<String> {
    let parts: Vec<&str> = match version {
        // the id3 crate already turns v2.3 slashes into NUL while decoding
        Version::Id3v23 => artist.split(['/', '\0']).collect(),
        Version::Id3v24 => artist.split('\0').collect(),
        _ => vec![artist],
    };
    parts.into_iter().map(str::to_string).collect()
}

/// The first front cover, otherwise the first picture.
fn cover(tag: &Tag) -> Option<Image> {
    let picture = tag
        .pictures()
        .find(|p| p.picture_type == PictureType::CoverFront)
        .or_else(|| tag.pictures().next())?;

    let mime_type = if picture.mime_type.is_empty() {
        sniff_mime_type(&picture.data).to_string()
    } else {
        picture.mime_type.clone()
    };
    Some(Image::new(mime_type, picture.data.clone()))
}

/// Parses "pos" or "pos/total". Anything non-numeric yields `(0, 0)`.
fn parse_position(s: &str) -> (u32, u32) {
    if s.is_empty() {
        return (0, 0);
    }

    let mut parts = s.split('/');
    let Some(Ok(pos)) = parts.next().map(|p| p.trim().parse::<u32>()) else {
        return (0, 0);
    };
    match parts.next().map(|t| t.trim().parse::<u32>()) {
        None => (pos, 0),
        Some(Ok(total)) => (pos, total),
        Some(Err(_)) => (0, 0),
    }
}

fn format_position(pos: u32, total: u32) -> String {
    if total == 0 {
        pos.to_string()
    } else {
        format!("{}/{}", pos, total)
    }
}

/// Removes a trailing 128-byte ID3v1 block. Returns whether one was found.
fn strip_id3v1(path: &Path) -> Result<bool> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let len = file.metadata()?.len();
    if len <= ID3V1_LEN {
        return Ok(false);
    }

    file.seek(SeekFrom::Start(len - ID3V1_LEN))?;
    let mut marker = [0u8; 3];
    file.read_exact(&mut marker)?;
    if &marker != b"TAG" {
        return Ok(false);
    }

    file.set_len(len - ID3V1_LEN)?;
    file.sync_all()?;
    Ok(true)
}

/// Reads the metadata pointer of a DSF file. `0` means the file has no tag.
fn read_dsf_pointer<R: Read + Seek>(reader: &mut R) -> Result<u64> {
    reader.seek(SeekFrom::Start(0))?;
    let mut header = [0u8; (DSF_PREAMBLE_LEN + 4) as usize];
    reader.read_exact(&mut header).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => TagError::format("DSF", "truncated DSD chunk header"),
        _ => TagError::Io(e),
    })?;
    if &header[..4] != b"DSD " {
        return Err(TagError::format("DSF", "missing DSD chunk"));
    }

    let pointer = u32::from_le_bytes([header[20], header[21], header[22], header[23]]);
    Ok(u64::from(pointer))
}

/// Replaces the trailing tag of a DSF file with `tag`.
///
/// Runs truncate, append, file size patch, pointer patch in that order. A
/// crash between the truncate and the pointer patch leaves a header pointing
/// past the end of the file; the flushes below narrow that window but the
/// layout cannot close it.
fn append_dsf_tag(path: &Path, tag: &[u8]) -> Result<()> {
    let pointer = {
        let mut file = File::open(path)?;
        let pointer = read_dsf_pointer(&mut file)?;
        let len = file.metadata()?.len();
        if pointer != 0 && (pointer < DSF_HEADER_LEN || pointer > len) {
            return Err(TagError::format(
                "DSF",
                format!("metadata pointer {} outside of file ({} bytes)", pointer, len),
            ));
        }
        pointer
    };

    let mut file = OpenOptions::new().write(true).open(path)?;
    if pointer != 0 {
        debug!("Truncating old tag of {} at {}", path.display(), pointer);
        file.set_len(pointer)?;
    }

    let old_end = file.seek(SeekFrom::End(0))?;
    file.write_all(tag)?;
    file.flush()?;
    file.sync_data()?;

    file.seek(SeekFrom::Start(DSF_FILE_SIZE_FIELD))?;
    file.write_all(&(old_end + tag.len() as u64).to_le_bytes())?;
    file.seek(SeekFrom::Start(DSF_POINTER_FIELD))?;
    file.write_all(&old_end.to_le_bytes())?;
    file.flush()?;
    file.sync_all()?;

    debug!(
        "Appended {} byte tag to {} at {}",
        tag.len(),
        path.display(),
        old_end
    );
    Ok(())
}
