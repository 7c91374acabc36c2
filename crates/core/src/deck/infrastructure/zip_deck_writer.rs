use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::deck::domain::deck_package::DeckPackage;
use crate::deck::domain::deck_writer::DeckWriter;
use crate::shared::error::SongError;

pub const MANIFEST_ENTRY: &str = "deck.json";
pub const MEDIA_MAP_ENTRY: &str = "media";

/// Writes a deck as a zip archive laid out like an Anki package: a JSON
/// manifest of the deck, a `media` map from numeric entry names to clip file
/// names, and each clip stored under its number.
pub struct ZipDeckWriter;

#[derive(Serialize)]
struct DeckManifest<'a> {
    deck_id: i64,
    deck_name: &'a str,
    model: ModelManifest<'a>,
    notes: Vec<NoteManifest>,
}

#[derive(Serialize)]
struct ModelManifest<'a> {
    id: i64,
    name: &'a str,
    fields: &'a [&'static str],
    templates: [TemplateManifest<'a>; 1],
}

#[derive(Serialize)]
struct TemplateManifest<'a> {
    name: &'a str,
    qfmt: &'a str,
    afmt: &'a str,
}

#[derive(Serialize)]
struct NoteManifest {
    fields: [String; 3],
}

impl DeckWriter for ZipDeckWriter {
    fn write(&self, package: &DeckPackage, path: &Path) -> Result<(), SongError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SongError::io(parent, e))?;
        }

        let temp_path = part_path(path);
        let result = write_archive(package, &temp_path);
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result?;

        fs::rename(&temp_path, path).map_err(|e| SongError::io(path, e))?;
        log::info!(
            "Wrote deck '{}' ({} cards) to {}",
            package.deck_name,
            package.records.len(),
            path.display()
        );
        Ok(())
    }
}

fn write_archive(package: &DeckPackage, path: &Path) -> Result<(), SongError> {
    let file = fs::File::create(path).map_err(|e| SongError::io(path, e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let zip_err = |e: zip::result::ZipError| SongError::io(path, std::io::Error::other(e));

    let manifest = manifest(package);
    let manifest_json =
        serde_json::to_vec_pretty(&manifest).map_err(|e| SongError::io(path, e.into()))?;
    zip.start_file(MANIFEST_ENTRY, options).map_err(zip_err)?;
    zip.write_all(&manifest_json)
        .map_err(|e| SongError::io(path, e))?;

    let media_map: BTreeMap<String, String> = package
        .records
        .iter()
        .enumerate()
        .map(|(i, record)| (i.to_string(), record.audio_file.clone()))
        .collect();
    let media_json = serde_json::to_vec(&media_map).map_err(|e| SongError::io(path, e.into()))?;
    zip.start_file(MEDIA_MAP_ENTRY, options).map_err(zip_err)?;
    zip.write_all(&media_json)
        .map_err(|e| SongError::io(path, e))?;

    for (i, media_path) in package.media.iter().enumerate() {
        let bytes = fs::read(media_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SongError::MissingMedia {
                index: i + 1,
                path: media_path.clone(),
            },
            _ => SongError::io(media_path, e),
        })?;
        zip.start_file(i.to_string(), options).map_err(zip_err)?;
        zip.write_all(&bytes).map_err(|e| SongError::io(path, e))?;
    }

    zip.finish().map_err(zip_err)?;
    Ok(())
}

fn manifest(package: &DeckPackage) -> DeckManifest<'_> {
    let model = &package.model;
    DeckManifest {
        deck_id: package.deck_id,
        deck_name: &package.deck_name,
        model: ModelManifest {
            id: model.id,
            name: model.name,
            fields: &model.fields,
            templates: [TemplateManifest {
                name: model.template_name,
                qfmt: &model.front_template,
                afmt: &model.back_template,
            }],
        },
        notes: package
            .records
            .iter()
            .map(|record| NoteManifest {
                fields: record.fields(),
            })
            .collect(),
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::domain::flashcard::FlashcardRecord;
    use std::io::Read;
    use tempfile::TempDir;

    fn package_with_clips(dir: &Path) -> DeckPackage {
        let mut records = Vec::new();
        let mut media = Vec::new();
        for (i, (front, back)) in [("un", "one"), ("deux", "two")].iter().enumerate() {
            let name = format!("clip_{}.wav", i + 1);
            let path = dir.join(&name);
            fs::write(&path, format!("audio {}", i + 1)).unwrap();
            records.push(FlashcardRecord {
                audio_file: name,
                front: front.to_string(),
                back: back.to_string(),
            });
            media.push(path);
        }
        DeckPackage::new("Chanson", records, media)
    }

    fn read_entry(archive: &mut zip::ZipArchive<fs::File>, name: &str) -> String {
        let mut entry = archive.by_name(name).unwrap();
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_writes_manifest_media_map_and_clips() {
        let tmp = TempDir::new().unwrap();
        let package = package_with_clips(tmp.path());
        let out = tmp.path().join("decks").join("Chanson.deck.zip");

        ZipDeckWriter.write(&package, &out).unwrap();

        let mut archive = zip::ZipArchive::new(fs::File::open(&out).unwrap()).unwrap();
        assert_eq!(archive.len(), 4);

        let manifest: serde_json::Value =
            serde_json::from_str(&read_entry(&mut archive, MANIFEST_ENTRY)).unwrap();
        assert_eq!(manifest["deck_name"], "Song Lyrics::Chanson");
        assert_eq!(manifest["model"]["fields"][2], "Translation");
        assert_eq!(
            manifest["notes"][1]["fields"],
            serde_json::json!(["[sound:clip_2.wav]", "deux", "two"])
        );

        let media: BTreeMap<String, String> =
            serde_json::from_str(&read_entry(&mut archive, MEDIA_MAP_ENTRY)).unwrap();
        assert_eq!(media["0"], "clip_1.wav");
        assert_eq!(media["1"], "clip_2.wav");

        assert_eq!(read_entry(&mut archive, "1"), "audio 2");
        assert!(!part_path(&out).exists());
    }

    #[test]
    fn test_rewrite_overwrites_existing_deck() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("Chanson.deck.zip");
        fs::write(&out, b"stale").unwrap();

        ZipDeckWriter
            .write(&package_with_clips(tmp.path()), &out)
            .unwrap();

        assert!(zip::ZipArchive::new(fs::File::open(&out).unwrap()).is_ok());
    }

    #[test]
    fn test_missing_media_aborts_without_output() {
        let tmp = TempDir::new().unwrap();
        let package = package_with_clips(tmp.path());
        fs::remove_file(&package.media[0]).unwrap();
        let out = tmp.path().join("Chanson.deck.zip");

        let result = ZipDeckWriter.write(&package, &out);
        assert!(matches!(
            result,
            Err(SongError::MissingMedia { index: 1, .. })
        ));
        assert!(!out.exists());
        assert!(!part_path(&out).exists());
    }

    #[test]
    fn test_part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("decks/Song.deck.zip")),
            PathBuf::from("decks/Song.deck.zip.part")
        );
    }
}
