use std::path::Path;
use std::sync::Arc;

use log::debug;
use mp4ameta::{Data, Fourcc};

use super::{sniff_mime_type, Codec};
use crate::utils::file_ops::replace_atomically;
use crate::{Image, Result, TagError, Track};

const TITLE: Fourcc = Fourcc(*b"\xa9nam");
const ARTIST: Fourcc = Fourcc(*b"\xa9ART");
const ALBUM: Fourcc = Fourcc(*b"\xa9alb");
const DATE: Fourcc = Fourcc(*b"\xa9day");
const ALBUM_ARTIST: Fourcc = Fourcc(*b"aART");
const TRACK_NUMBER: Fourcc = Fourcc(*b"trkn");
const DISC_NUMBER: Fourcc = Fourcc(*b"disk");
const COVER: Fourcc = Fourcc(*b"covr");

/// Items owned by this codec; everything else in `ilst` is left alone.
const ITEMS: [Fourcc; 8] = [
    ALBUM,
    ALBUM_ARTIST,
    DATE,
    TRACK_NUMBER,
    DISC_NUMBER,
    TITLE,
    ARTIST,
    COVER,
];

pub struct Mp4Codec;

impl Codec for Mp4Codec {
    fn read(&self, path: &Path) -> Result<Track> {
        let tag = mp4ameta::Tag::read_from_path(path)?;
        let text = |ident: &Fourcc| tag.strings_of(ident).next().unwrap_or_default().to_string();

        let (track_number, total_tracks) = position(&tag, &TRACK_NUMBER)?;
        let (disc_number, total_discs) = position(&tag, &DISC_NUMBER)?;

        let track = Track {
            file_path: path.to_path_buf(),
            album: text(&ALBUM),
            album_artist: text(&ALBUM_ARTIST),
            date: text(&DATE),
            image: tag.data_of(&COVER).find_map(cover).map(Arc::new),
            disc_number,
            total_discs,
            track_number,
            total_tracks,
            title: text(&TITLE),
            artists: tag.strings_of(&ARTIST).map(str::to_string).collect(),
        };
        Ok(track)
    }

    fn write(&self, track: &Track) -> Result<()> {
        replace_atomically(&track.file_path, |temp| {
            let mut tag = mp4ameta::Tag::read_from_path(temp)?;
            for ident in &ITEMS {
                tag.remove_data_of(ident);
            }

            tag.add_data(ALBUM, Data::Utf8(track.album.clone()));
            tag.add_data(ALBUM_ARTIST, Data::Utf8(track.album_artist.clone()));
            tag.add_data(DATE, Data::Utf8(track.date.clone()));
            tag.add_data(TRACK_NUMBER, number_pair(track.track_number, track.total_tracks));
            tag.add_data(DISC_NUMBER, number_pair(track.disc_number, track.total_discs));
            tag.add_data(TITLE, Data::Utf8(track.title.clone()));
            for artist in &track.artists {
                tag.add_data(ARTIST, Data::Utf8(artist.clone()));
            }
            if let Some(image) = &track.image {
                let data = image.data.clone();
                let data = match image.mime_type.as_str() {
                    "image/jpeg" | "image/jpg" => Data::Jpeg(data),
                    "image/png" => Data::Png(data),
                    "image/bmp" => Data::Bmp(data),
                    _ => Data::Reserved(data),
                };
                tag.add_data(COVER, data);
            }

            debug!("Writing MP4 metadata of {}", track.file_path.display());
            tag.write_to_path(temp)?;
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "MP4"
    }
}

fn cover(data: &Data) -> Option<Image> {
    let bytes = match data {
        Data::Jpeg(b) | Data::Png(b) | Data::Bmp(b) | Data::Reserved(b) => b,
        _ => return None,
    };
    Some(Image::new(sniff_mime_type(bytes), bytes.clone()))
}

/// Big-endian position at `[2..4]` and total at `[4..6]`; `(0, 0)` when absent.
fn position(tag: &mp4ameta::Tag, ident: &Fourcc) -> Result<(u32, u32)> {
    let Some(value) = tag.data_of(ident).find_map(|d| match d {
        Data::Reserved(v) => Some(v),
        _ => None,
    }) else {
        return Ok((0, 0));
    };

    if value.len() < 6 {
        return Err(TagError::format(
            "MP4",
            format!("number pair of {} bytes", value.len()),
        ));
    }
    let pos = u16::from_be_bytes([value[2], value[3]]);
    let total = u16::from_be_bytes([value[4], value[5]]);
    Ok((u32::from(pos), u32::from(total)))
}

fn number_pair(pos: u32, total: u32) -> Data {
    let mut record = vec![0u8; 8];
    record[2..4].copy_from_slice(&u16::try_from(pos).unwrap_or(u16::MAX).to_be_bytes());
    record[4..6].copy_from_slice(&u16::try_from(total).unwrap_or(u16::MAX).to_be_bytes());
    Data::Reserved(record)
}
