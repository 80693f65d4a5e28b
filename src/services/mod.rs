use std::path::PathBuf;

use crate::audio::{codec_for_path, Codec};
use crate::{Result, TagError};

pub mod export;
pub mod import;
pub mod rename;

/// The codec for a directory's audio files; they all share one extension.
pub(crate) fn codec_for_files(files: &[PathBuf]) -> Result<&'static dyn Codec> {
    let first = files
        .first()
        .ok_or_else(|| TagError::UnsupportedFormat("no files".into()))?;
    codec_for_path(first).ok_or_else(|| TagError::UnsupportedFormat(first.display().to_string()))
}

/// Tracks from the tags file are paired with audio files by position.
pub(crate) fn ensure_same_count(files: usize, tracks: usize) -> Result<()> {
    if files != tracks {
        return Err(TagError::CountMismatch { files, tracks });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing, Track};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const AUDIO: &[u8] = b"not really mpeg frames";

    fn album(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), AUDIO).unwrap();
        }
    }

    fn read_all(dir: &Path) -> Vec<Track> {
        let files = crate::utils::file_ops::find_audio_files(dir).unwrap();
        let codec = codec_for_files(&files).unwrap();
        files.iter().map(|f| codec.read(f).unwrap()).collect()
    }

    /// import → export → import leaves every readable field unchanged.
    fn export_import_round_trip(ext: &str) {
        let dir = tempdir().unwrap();
        testing::album(dir.path(), ext, 3);
        let tags = "Album\nBand\n2020\n\nFirst//Guest\nSecond//A//B\n\nThird\n";
        fs::write(dir.path().join("tags"), tags).unwrap();
        fs::write(dir.path().join("Folder.jpg"), testing::JPEG).unwrap();

        import::import(dir.path()).unwrap();
        let imported = read_all(dir.path());

        let third = &imported[2];
        assert_eq!(third.album, "Album");
        assert_eq!(third.album_artist, "Band");
        assert_eq!(third.date, "2020");
        assert_eq!(third.title, "Third");
        assert_eq!((third.disc_number, third.total_discs), (2, 2));
        assert_eq!((third.track_number, third.total_tracks), (1, 1));
        assert_eq!(third.image.as_ref().unwrap().data, testing::JPEG);

        fs::remove_file(dir.path().join("tags")).unwrap();
        fs::remove_file(dir.path().join("Folder.jpg")).unwrap();
        let report = export::export(dir.path()).unwrap();
        assert_eq!(fs::read_to_string(&report.tags_file).unwrap(), tags);
        assert_eq!(report.image_file, Some(dir.path().join("Folder.jpg")));
        assert_eq!(fs::read(dir.path().join("Folder.jpg")).unwrap(), testing::JPEG);

        import::import(dir.path()).unwrap();
        assert_eq!(read_all(dir.path()), imported);
    }

    #[test]
    fn flac_export_import_round_trip() {
        export_import_round_trip("flac");
    }

    #[test]
    fn m4a_export_import_round_trip() {
        export_import_round_trip("m4a");
    }

    #[test]
    fn dsf_export_import_round_trip() {
        export_import_round_trip("dsf");
    }

    #[test]
    fn mp3_export_import_round_trip() {
        export_import_round_trip("mp3");
    }

    #[test]
    fn import_then_rename_then_export_round_trips() {
        let dir = tempdir().unwrap();
        album(dir.path(), &["a.mp3", "b.mp3", "c.mp3"]);
        let tags = "Album\nBand\n2020\n\nFirst//Guest\nSecond\n\nThird: Part?\n";
        fs::write(dir.path().join("tags"), tags).unwrap();
        fs::write(dir.path().join("Folder.png"), b"\x89PNG\r\n\x1a\ncover").unwrap();

        assert_eq!(import::import(dir.path()).unwrap(), 3);

        let tracks = read_all(dir.path());
        assert_eq!(tracks[0].artists, vec!["Band", "Guest"]);
        assert_eq!((tracks[2].disc_number, tracks[2].total_discs), (2, 2));
        assert_eq!(tracks[2].image.as_ref().unwrap().mime_type, "image/png");

        let renamed = rename::rename(dir.path()).unwrap();
        let names: Vec<_> = renamed
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1.1.First.mp3", "1.2.Second.mp3", "2.1.Third Part.mp3"]);

        fs::remove_file(dir.path().join("tags")).unwrap();
        fs::remove_file(dir.path().join("Folder.png")).unwrap();
        let report = export::export(dir.path()).unwrap();
        assert_eq!(report.track_count, 3);
        assert_eq!(report.image_file, Some(dir.path().join("Folder.png")));
        assert_eq!(fs::read_to_string(report.tags_file).unwrap(), tags);

        // a second pass changes nothing
        assert!(rename::rename(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn import_with_count_mismatch_leaves_files_alone() {
        let dir = tempdir().unwrap();
        album(dir.path(), &["1.mp3", "2.mp3", "3.mp3"]);
        fs::write(dir.path().join("tags"), "A\nB\nC\n\nOne\nTwo\n").unwrap();

        let err = import::import(dir.path()).unwrap_err();
        assert!(matches!(err, TagError::CountMismatch { files: 3, tracks: 2 }));
        for name in ["1.mp3", "2.mp3", "3.mp3"] {
            assert_eq!(fs::read(dir.path().join(name)).unwrap(), AUDIO);
        }
        assert!(rename::rename(dir.path()).is_err());
    }

    #[test]
    fn export_rejects_mixed_and_missing_audio() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            export::export(dir.path()),
            Err(TagError::NoAudioFiles(_))
        ));

        album(dir.path(), &["1.mp3", "2.flac"]);
        assert!(matches!(
            export::export(dir.path()),
            Err(TagError::MixedFileTypes { .. })
        ));
        assert!(!dir.path().join("tags").exists());
    }

    #[test]
    fn export_of_untagged_files_writes_empty_header() {
        let dir = tempdir().unwrap();
        album(dir.path(), &["1.mp3"]);

        let report = export::export(dir.path()).unwrap();
        assert!(report.image_file.is_none());
        assert_eq!(fs::read_to_string(report.tags_file).unwrap(), "\n\n\n\n\n");
    }

    #[test]
    fn ensure_same_count_reports_both_sides() {
        assert!(ensure_same_count(2, 2).is_ok());
        let err = ensure_same_count(3, 2).unwrap_err();
        assert!(matches!(err, TagError::CountMismatch { files: 3, tracks: 2 }));
        assert!(err.is_validation());
    }

    #[test]
    fn codec_for_files_uses_first_extension() {
        let files = vec![PathBuf::from("01.m4a"), PathBuf::from("02.m4a")];
        assert_eq!(codec_for_files(&files).unwrap().name(), "MP4");

        let files = vec![PathBuf::from("01.ogg")];
        assert!(matches!(
            codec_for_files(&files),
            Err(TagError::UnsupportedFormat(_))
        ));
    }
}
