use std::path::Path;
use std::time::Duration;

use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};
use thiserror::Error;

/// Tag fields of the currently loaded track.
///
/// Fields are plain strings with `""` meaning "missing or unreadable".
/// The default record doubles as the fallback when extraction fails.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
}

#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to read tags: {0}")]
    Read(#[from] lofty::error::LoftyError),
}

/// Read tags and container duration from an audio file.
///
/// Missing fields come back blank. An unreadable file is an `Err` the
/// caller recovers from with `TagRecord::default()`; tag trouble must
/// never block playback.
pub fn read(path: &Path) -> Result<(TagRecord, Option<Duration>), TagError> {
    let tagged = lofty::read_from_path(path)?;
    let duration = Some(tagged.properties().duration());

    let mut record = TagRecord::default();

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
            record.title = v.trim().to_string();
        }
        if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
            record.artist = v.trim().to_string();
        }
        if let Some(v) = tag.get_string(&ItemKey::AlbumTitle) {
            record.album = v.trim().to_string();
        }

        // Year tagging is messy: prefer an explicit year frame, otherwise
        // take the leading year of a recording date like "2003-07-01".
        if let Some(v) = tag.get_string(&ItemKey::Year).map(str::trim) {
            if !v.is_empty() {
                record.year = v.to_string();
            }
        }
        if record.year.is_empty() {
            if let Some(v) = tag.get_string(&ItemKey::RecordingDate).map(str::trim) {
                let lead: String = v.chars().take_while(|c| c.is_ascii_digit()).collect();
                if lead.len() == 4 {
                    record.year = lead;
                } else {
                    record.year = v.to_string();
                }
            }
        }
    }

    Ok((record, duration))
}
