use std::fs;
use std::path::{Path, PathBuf};

pub const AUDIO: &[u8] = &[0xFF, 0xF8, 0x69, 0x08, 0x00, 0x01, 0x02, 0x03];

pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3];
pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2];

/// `fLaC`, a 44.1 kHz stereo 16-bit STREAMINFO flagged as last, then frames.
pub fn flac_bytes() -> Vec<u8> {
    let mut out = b"fLaC".to_vec();
    out.extend_from_slice(&[0x80, 0x00, 0x00, 34]);
    out.extend_from_slice(&[0x10, 0x00, 0x10, 0x00, 0, 0, 0, 0, 0, 0]);
    out.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0, 0, 0, 0]);
    out.extend_from_slice(&[0; 16]);
    out.extend_from_slice(AUDIO);
    out
}

pub fn mp3_bytes() -> Vec<u8> {
    let mut out = vec![0xFF, 0xFB, 0x90, 0x64];
    out.extend(std::iter::repeat(0x55).take(400));
    out
}

/// DSD chunk with a null metadata pointer, followed by `audio_len` sample bytes.
pub fn dsf_bytes(audio_len: usize) -> Vec<u8> {
    let total = 28 + audio_len as u64;
    let mut out = b"DSD ".to_vec();
    out.extend_from_slice(&28u64.to_le_bytes());
    out.extend_from_slice(&total.to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend(std::iter::repeat(0x69).take(audio_len));
    out
}

fn make_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

fn ftyp() -> Vec<u8> {
    make_box(b"ftyp", b"M4A \x00\x00\x02\x00M4A mp42isom")
}

fn moov(chunk_offset: u32) -> Vec<u8> {
    let mut mvhd = vec![0u8; 12];
    mvhd.extend_from_slice(&1000u32.to_be_bytes());
    mvhd.extend_from_slice(&1000u32.to_be_bytes());
    mvhd.resize(100, 0);

    let mut stco = vec![0, 0, 0, 0, 0, 0, 0, 1];
    stco.extend_from_slice(&chunk_offset.to_be_bytes());
    let stbl = make_box(b"stbl", &make_box(b"stco", &stco));
    let trak = make_box(b"trak", &make_box(b"mdia", &make_box(b"minf", &stbl)));

    let mut body = make_box(b"mvhd", &mvhd);
    body.extend(trak);
    make_box(b"moov", &body)
}

/// `ftyp`, `moov`, `mdat` (or `ftyp`, `mdat`, `moov`) with the single chunk
/// offset pointing at the samples.
pub fn m4a_bytes(moov_first: bool) -> Vec<u8> {
    let mut out = ftyp();
    if moov_first {
        let audio_at = out.len() + moov(0).len() + 8;
        out.extend(moov(audio_at as u32));
        out.extend(make_box(b"mdat", AUDIO));
    } else {
        let audio_at = out.len() + 8;
        out.extend(make_box(b"mdat", AUDIO));
        out.extend(moov(audio_at as u32));
    }
    out
}

/// Absolute offset stored in the first `stco` entry.
pub fn chunk_offset(file: &[u8]) -> usize {
    let at = file
        .windows(4)
        .position(|w| w == b"stco")
        .expect("stco box");
    let entry = &file[at + 12..at + 16];
    u32::from_be_bytes([entry[0], entry[1], entry[2], entry[3]]) as usize
}

/// Writes `count` untagged files of type `ext` into `dir`.
pub fn album(dir: &Path, ext: &str, count: usize) -> Vec<PathBuf> {
    (1..=count)
        .map(|n| {
            let path = dir.join(format!("{:02}.{}", n, ext));
            let bytes = match ext {
                "flac" => flac_bytes(),
                "m4a" => m4a_bytes(true),
                "dsf" => dsf_bytes(64),
                _ => mp3_bytes(),
            };
            fs::write(&path, bytes).expect("write fixture");
            path
        })
        .collect()
}
