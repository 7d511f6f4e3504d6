//! Controller state: `App` and its small derived views.

use std::time::Duration;

use crate::library::{TagRecord, Track};

/// The playback state of the application, as shown to the UI and MPRIS.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Phase of the engine handle for the selected track.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No handle exists.
    Idle,
    /// A stamped load is in flight on the engine thread.
    Loading,
    /// The handle is built and playable.
    Ready,
}

/// Metadata record for the loaded track.
///
/// Replaced atomically with the handle; tag fields are blank when
/// extraction failed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NowPlaying {
    /// File name of the loaded track.
    pub name: String,
    pub tags: TagRecord,
}

/// The player controller state.
///
/// Mutated only by [`App::apply`](super::update) and the cursor helpers;
/// the rendering and engine layers read it but never write it.
pub struct App {
    pub tracks: Vec<Track>,

    /// Index of the loaded/active track. Invariant: in range whenever
    /// `tracks` is non-empty, pinned to 0 otherwise.
    pub selected: usize,
    /// Playlist row highlighted in the UI. Moves freely with j/k and snaps
    /// back to `selected` whenever a track is (re)loaded.
    pub cursor: usize,

    pub phase: Phase,
    /// True exactly while the engine handle is playing.
    pub playing: bool,
    /// Whether the in-flight load should start playback once ready.
    pub play_when_ready: bool,

    /// Elapsed percentage of the current track, `0..=100`.
    pub progress: u8,
    /// Track duration reported by the engine for the loaded handle.
    pub duration: Option<Duration>,
    pub now_playing: Option<NowPlaying>,

    /// Stamp of the most recent load request. Engine replies carry the
    /// stamp of the load that produced them; anything older is stale and
    /// gets dropped.
    pub generation: u64,

    /// Last load failure, shown in the status line.
    pub status: Option<String>,
}

impl App {
    /// Create a new `App` over the provided `tracks`. Nothing is loaded
    /// and nothing plays until the user asks.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            cursor: 0,
            phase: Phase::Idle,
            playing: false,
            play_when_ready: false,
            progress: 0,
            duration: None,
            now_playing: None,
            generation: 0,
            status: None,
        }
    }

    /// Return true if the track list contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Coarse state for the status line and MPRIS `PlaybackStatus`.
    pub fn playback_state(&self) -> PlaybackState {
        match self.phase {
            Phase::Idle => PlaybackState::Stopped,
            Phase::Ready if self.playing => PlaybackState::Playing,
            _ => PlaybackState::Paused,
        }
    }

    /// Move the playlist cursor down one row.
    pub fn cursor_next(&mut self) {
        if self.cursor + 1 < self.tracks.len() {
            self.cursor += 1;
        }
    }

    /// Move the playlist cursor up one row.
    pub fn cursor_prev(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }
}
