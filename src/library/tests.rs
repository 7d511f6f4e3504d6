use super::tags;
use super::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use crate::config::LibrarySettings;

#[test]
fn from_path_uses_the_file_name() {
    let t = Track::from_path(Path::new("/tmp/music/Some Song.mp3"));
    assert_eq!(t.name, "Some Song.mp3");
    assert_eq!(t.path, PathBuf::from("/tmp/music/Some Song.mp3"));
}

#[test]
fn collect_keeps_explicit_files_in_argument_order() {
    let dir = tempdir().unwrap();
    let b = dir.path().join("b.mp3");
    let a = dir.path().join("a.mp3");
    fs::write(&b, b"not real").unwrap();
    fs::write(&a, b"not real").unwrap();

    // Argument order wins over any lexicographic order.
    let tracks = collect(&[&b, &a], &LibrarySettings::default());
    let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["b.mp3", "a.mp3"]);
}

#[test]
fn collect_takes_explicit_files_without_extension_check() {
    let dir = tempdir().unwrap();
    let odd = dir.path().join("mislabeled.xyz");
    fs::write(&odd, b"who knows").unwrap();

    let tracks = collect(&[&odd], &LibrarySettings::default());
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].name, "mislabeled.xyz");
}

#[test]
fn collect_expands_directories_and_skips_missing_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("two.ogg"), b"not real").unwrap();
    fs::write(dir.path().join("skip.txt"), b"not audio").unwrap();
    let missing = dir.path().join("does-not-exist.mp3");

    let tracks = collect(
        &[dir.path().to_path_buf(), missing],
        &LibrarySettings::default(),
    );
    let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["one.mp3", "two.ogg"]);
}

#[test]
fn tags_read_fails_on_garbage_and_default_record_is_blank() {
    let dir = tempdir().unwrap();
    let junk = dir.path().join("junk.mp3");
    fs::write(&junk, b"definitely not an mp3").unwrap();

    assert!(tags::read(&junk).is_err());

    let fallback = TagRecord::default();
    assert_eq!(fallback.title, "");
    assert_eq!(fallback.artist, "");
    assert_eq!(fallback.album, "");
    assert_eq!(fallback.year, "");
}
