use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use metaflac::block::{Block, BlockType, PictureType, VorbisComment};

use super::{sniff_mime_type, Codec};
use crate::utils::file_ops::replace_atomically;
use crate::{Image, Result, Track, VENDOR};

const PADDING_LEN: u32 = 64;

pub struct FlacCodec;

impl Codec for FlacCodec {
    fn read(&self, path: &Path) -> Result<Track> {
        let tag = metaflac::Tag::read_from_path(path)?;
        let comments = Comments::from(tag.vorbis_comments());

        Ok(Track {
            file_path: path.to_path_buf(),
            album: comments.string("ALBUM"),
            album_artist: comments.string("ALBUMARTIST"),
            date: comments.string("DATE"),
            image: cover(&tag).map(Arc::new),
            disc_number: comments.number("DISCNUMBER"),
            total_discs: comments.number("DISCTOTAL"),
            track_number: comments.number("TRACKNUMBER"),
            total_tracks: comments.number("TRACKTOTAL"),
            title: comments.string("TITLE"),
            artists: comments.values("ARTIST").to_vec(),
        })
    }

    fn write(&self, track: &Track) -> Result<()> {
        replace_atomically(&track.file_path, |temp| {
            let mut tag = metaflac::Tag::read_from_path(temp)?;
            tag.remove_blocks(BlockType::VorbisComment);
            tag.remove_blocks(BlockType::Picture);
            tag.remove_blocks(BlockType::Padding);

            tag.push_block(Block::VorbisComment(build_comment(track)));
            if let Some(image) = &track.image {
                tag.add_picture(
                    image.mime_type.clone(),
                    PictureType::CoverFront,
                    image.data.clone(),
                );
            }
            tag.push_block(Block::Padding(PADDING_LEN));

            debug!("Writing FLAC metadata of {}", track.file_path.display());
            tag.write_to_path(temp)?;
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "FLAC"
    }
}

fn build_comment(track: &Track) -> VorbisComment {
    let mut comment = VorbisComment::new();
    comment.vendor_string = VENDOR.to_string();

    let mut set = |key: &str, values: Vec<String>| {
        comment.comments.insert(key.to_string(), values);
    };
    set("ALBUM", vec![track.album.clone()]);
    set("ALBUMARTIST", vec![track.album_artist.clone()]);
    set("DATE", vec![track.date.clone()]);
    set("TITLE", vec![track.title.clone()]);
    for (key, value) in [
        ("DISCNUMBER", track.disc_number),
        ("DISCTOTAL", track.total_discs),
        ("TRACKNUMBER", track.track_number),
        ("TRACKTOTAL", track.total_tracks),
    ] {
        if value != 0 {
            set(key, vec![value.to_string()]);
        }
    }

    let artists = std::iter::once(&track.album_artist)
        .chain(&track.artists)
        .cloned()
        .collect();
    set("ARTIST", artists);
    comment
}

/// The first front cover, otherwise the first picture.
fn cover(tag: &metaflac::Tag) -> Option<Image> {
    let picture = tag
        .pictures()
        .find(|p| matches!(p.picture_type, PictureType::CoverFront))
        .or_else(|| tag.pictures().next())?;

    let mime_type = if picture.mime_type.is_empty() {
        sniff_mime_type(&picture.data).to_string()
    } else {
        picture.mime_type.clone()
    };
    Some(Image::new(mime_type, picture.data.clone()))
}

/// Vorbis comment values keyed by upper-cased field name.
struct Comments(HashMap<String, Vec<String>>);

impl From<Option<&VorbisComment>> for Comments {
    fn from(comment: Option<&VorbisComment>) -> Self {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (key, values) in comment.iter().flat_map(|c| &c.comments) {
            map.entry(key.to_ascii_uppercase())
                .or_default()
                .extend(values.iter().cloned());
        }
        Comments(map)
    }
}

impl Comments {
    fn values(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    fn string(&self, key: &str) -> String {
        self.values(key).first().cloned().unwrap_or_default()
    }

    fn number(&self, key: &str) -> u32 {
        self.values(key)
            .first()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }
}
